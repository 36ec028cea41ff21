//! JWT token issuance and verification
//!
//! Tokens are HS256 JWS strings carrying `{id, username, iat, exp}`. The
//! expiry check is done here rather than inside `jsonwebtoken` so that it has
//! no leeway and so tests can supply their own clock.

use crate::core::error::{GateError, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default token lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: u64,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: u64,
    pub username: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// Why a token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("no token supplied")]
    Missing,

    #[error("token is malformed or its signature does not verify")]
    Invalid,

    #[error("token has expired")]
    Expired,
}

/// Signs and verifies tokens with one process-wide secret
#[derive(Clone)]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Issue a token for a user, valid for the configured lifetime from now
    pub fn issue(&self, id: u64, username: &str) -> Result<String> {
        self.issue_at(id, username, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds)
    pub fn issue_at(&self, id: u64, username: &str, now: i64) -> Result<String> {
        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or_else(|| GateError::TokenIssue("Failed to calculate expiration".to_string()))?;

        let claims = Claims {
            id,
            username: username.to_string(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| GateError::TokenIssue(format!("Failed to generate token: {}", e)))
    }

    /// Verify a token against the secret and the current time
    pub fn verify(&self, token: Option<&str>) -> std::result::Result<Identity, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as if the current time were `now` (Unix seconds).
    ///
    /// A token is expired once `now` is past `exp`; there is no grace period.
    pub fn verify_at(
        &self,
        token: Option<&str>,
        now: i64,
    ) -> std::result::Result<Identity, TokenError> {
        let token = match token.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Err(TokenError::Missing),
        };

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::Invalid
            })?
            .claims;

        if now > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims.into())
    }
}
