pub mod authenticator;
pub mod password;
pub mod register;
pub mod token;

pub use authenticator::Authenticator;
pub use password::{PasswordError, PasswordHasher};
pub use register::{register_user, RegistrationError};
pub use token::{AuthToken, Claims, InvalidToken, TokenIssueError, TokenIssuer, TokenValidator};
