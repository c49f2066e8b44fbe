pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret is not configured")]
    InvalidSecret,

    #[error("JWT expiry must be between 1 and {max} hours, got {0}", max = MAX_EXPIRY_HOURS)]
    InvalidExpiry(u64),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Upper bound for `JWT_EXPIRY_HOURS` (ten years).
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365 * 10;

/// Signing and verification keys, built once from config and shared through
/// application state.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }
        if expiry_hours == 0 || expiry_hours > MAX_EXPIRY_HOURS {
            return Err(AuthError::InvalidExpiry(expiry_hours));
        }
        let expiry = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or(AuthError::InvalidExpiry(expiry_hours))?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    /// Token lifetime in seconds, reported to clients as `expires_in`.
    pub fn expires_in(&self) -> i64 {
        self.expiry.num_seconds()
    }

    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.expiry)
            .ok_or_else(|| AuthError::TokenGeneration("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };
        self.encode(&claims)
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let keys = TokenKeys::new("secret", 1).unwrap();
        let id = Uuid::new_v4();
        let token = keys.issue(id, "alice").unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "alice");
        assert_eq!(keys.expires_in(), 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenKeys::new("secret-a", 1).unwrap();
        let verifier = TokenKeys::new("secret-b", 1).unwrap();
        let token = issuer.issue(Uuid::new_v4(), "alice").unwrap();
        assert!(matches!(verifier.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new("secret", 1).unwrap();
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "alice".into(),
            exp: (past + Duration::hours(1)).timestamp(),
            iat: past.timestamp(),
        };
        let token = keys.encode(&claims).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn out_of_range_expiry_is_refused() {
        for hours in [0, MAX_EXPIRY_HOURS + 1, 2_000_000_000_000, 10u64.pow(16), u64::MAX] {
            assert!(
                matches!(TokenKeys::new("secret", hours), Err(AuthError::InvalidExpiry(h)) if h == hours),
                "{} hours should be refused",
                hours
            );
        }
    }

    #[test]
    fn longest_expiry_still_issues() {
        let keys = TokenKeys::new("secret", MAX_EXPIRY_HOURS).unwrap();
        let token = keys.issue(Uuid::new_v4(), "alice").unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(TokenKeys::new("", 1), Err(AuthError::InvalidSecret)));
    }
}
