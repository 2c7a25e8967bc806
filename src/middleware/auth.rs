use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{InvalidToken, TokenValidator};
use crate::error::ApiError;
use crate::types::UserIdentity;

const BEARER_PREFIX: &str = "Bearer ";

/// Gatekeeper for operations that require a signed-in caller.
///
/// Only the token's signature and claims are checked; no store is consulted.
#[derive(Clone)]
pub struct CallAuthorizer {
    validator: Arc<TokenValidator>,
}

impl CallAuthorizer {
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        Self { validator }
    }

    /// Validate the bearer token carried in `headers`.
    ///
    /// The header value must start with exactly `Bearer ` (one space).
    pub fn authorize(&self, headers: &HeaderMap) -> Result<UserIdentity, InvalidToken> {
        let token = extract_bearer_token(headers)?;
        self.validator.validate(token)
    }
}

/// Extract the token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, InvalidToken> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(InvalidToken::Missing)?
        .to_str()
        .map_err(|_| InvalidToken::Missing)?;

    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(InvalidToken::Missing),
    }
}

/// Middleware placed on every gated route: rejects with 401 before the handler
/// runs, otherwise injects the caller's `UserIdentity` into request extensions.
pub async fn authorize_call(
    State(authorizer): State<CallAuthorizer>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match authorizer.authorize(request.headers()) {
        Ok(identity) => identity,
        Err(reason) => {
            tracing::info!(
                "Rejected {} {}: {}",
                request.method(),
                request.uri().path(),
                reason
            );
            return Err(reason.into());
        }
    };

    tracing::debug!("Authorized '{}' for {}", identity.user_name, request.uri().path());
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
