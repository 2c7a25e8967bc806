// handlers/mod.rs - HTTP handlers
//
// public/    no token required (token acquisition, registration)
// protected/ behind the CallAuthorizer
// system     service info and health

pub mod protected;
pub mod public;
pub mod system;
