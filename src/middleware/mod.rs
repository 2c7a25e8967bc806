pub mod auth;
pub mod response;

pub use auth::{authorize_call, CallAuthorizer};
pub use response::{ApiResponse, ApiResult, JsonBody};
