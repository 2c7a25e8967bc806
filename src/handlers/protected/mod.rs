// handlers/protected/mod.rs - Handlers behind the CallAuthorizer
//
// Every handler here may rely on a `UserIdentity` in the request extensions.

pub mod sections;

pub use sections::update_section;
