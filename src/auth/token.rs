use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::types::UserIdentity;

/// JWT claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, always the user name
    pub sub: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    /// Numeric user id, so validation can yield a full identity without I/O
    pub uid: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Unique per token
    pub jti: Uuid,
}

/// Reasons a bearer token is refused. All of them surface as 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidToken {
    #[error("Missing or malformed Authorization header")]
    Missing,

    #[error("Malformed token")]
    Malformed,

    #[error("Token signature does not verify")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token claims are inconsistent")]
    ClaimMismatch,
}

#[derive(Debug, Error)]
#[error("Token generation failed: {0}")]
pub struct TokenIssueError(String);

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
    /// Seconds until expiry, when expiry is enabled
    pub expires_in: Option<i64>,
}

/// Signs access tokens with the configured HS256 key.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    expiry_hours: Option<u64>,
}

impl TokenIssuer {
    pub fn new(security: &SecurityConfig) -> Self {
        Self::from_secret(&security.jwt_secret, security.jwt_expiry_hours)
    }

    pub fn from_secret(secret: &str, expiry_hours: Option<u64>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    fn lifetime(&self) -> Result<Option<Duration>, TokenIssueError> {
        self.expiry_hours
            .map(|hours| {
                i64::try_from(hours)
                    .ok()
                    .and_then(Duration::try_hours)
                    .ok_or_else(|| {
                        TokenIssueError(format!("token lifetime of {} hours is out of range", hours))
                    })
            })
            .transpose()
    }

    pub fn issue(&self, identity: &UserIdentity) -> Result<AuthToken, TokenIssueError> {
        let now = Utc::now();
        let lifetime = self.lifetime()?;
        let exp = lifetime
            .map(|ttl| {
                now.checked_add_signed(ttl)
                    .map(|at| at.timestamp())
                    .ok_or_else(|| TokenIssueError("token expiry overflows the clock".to_string()))
            })
            .transpose()?;

        let claims = Claims {
            sub: identity.user_name.clone(),
            user_name: identity.user_name.clone(),
            uid: identity.user_id,
            iat: now.timestamp(),
            exp,
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenIssueError(e.to_string()))?;

        Ok(AuthToken {
            token,
            expires_in: lifetime.map(|ttl| ttl.num_seconds()),
        })
    }
}

/// Verifies access tokens against the configured HS256 key. Pure, no I/O.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(security: &SecurityConfig) -> Self {
        Self::from_secret(&security.jwt_secret, security.jwt_expiry_hours.is_some())
    }

    /// `require_expiry` rejects tokens without an `exp` claim. An `exp` that is
    /// present is always enforced.
    pub fn from_secret(secret: &str, require_expiry: bool) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("sub".to_string());
        if require_expiry {
            validation.required_spec_claims.insert("exp".to_string());
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<UserIdentity, InvalidToken> {
        let claims = self.decode_claims(token)?;

        if claims.sub != claims.user_name || claims.user_name.is_empty() {
            return Err(InvalidToken::ClaimMismatch);
        }

        Ok(UserIdentity::new(claims.uid, claims.user_name))
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, InvalidToken> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => InvalidToken::BadSignature,
                ErrorKind::ExpiredSignature => InvalidToken::Expired,
                _ => InvalidToken::Malformed,
            })
    }
}
