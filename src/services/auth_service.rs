use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password, Claims, TokenKeys};
use crate::database::models::{NewUser, UserInfo};
use crate::database::repository::UserStore;
use crate::error::ApiError;
use crate::middleware::AuthUser;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token response for register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserInfo,
    pub expires_in: i64,
}

/// Validate username format and requirements
pub fn validate_username_format(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }

    if username.len() > 50 {
        return Err("Username must be less than 50 characters".to_string());
    }

    // Allow alphanumeric, underscore, hyphen
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err("Username can only contain letters, numbers, underscore, and hyphen".to_string());
    }

    if !username.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err("Username must start with a letter or number".to_string());
    }

    Ok(())
}

pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Registration, login and bearer-token resolution.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: TokenKeys,
    allow_registration: bool,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: TokenKeys, allow_registration: bool) -> Self {
        Self {
            users,
            keys,
            allow_registration,
        }
    }

    pub async fn register(&self, credentials: Credentials) -> Result<TokenResponse, ApiError> {
        if !self.allow_registration {
            return Err(ApiError::forbidden("Registration is disabled"));
        }

        let username = credentials.username.trim().to_string();
        validate_username_format(&username).map_err(|msg| ApiError::invalid_field("username", msg))?;
        validate_password_strength(&credentials.password)
            .map_err(|msg| ApiError::invalid_field("password", msg))?;

        let password_hash = hash_password(&credentials.password)?;
        let user = self
            .users
            .create_user(NewUser {
                username,
                password_hash,
            })
            .await?;

        tracing::info!("Registered user {} ({})", user.username, user.id);
        self.token_for(UserInfo::from(&user))
    }

    /// Unknown user and wrong password produce the same 401.
    pub async fn login(&self, credentials: Credentials) -> Result<TokenResponse, ApiError> {
        let rejected = || ApiError::unauthorized("Invalid username or password");

        let user = self
            .users
            .find_by_username(credentials.username.trim())
            .await?
            .ok_or_else(rejected)?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            tracing::warn!("Failed login for user {}", user.username);
            return Err(rejected());
        }

        self.token_for(UserInfo::from(&user))
    }

    /// Verify a bearer token and resolve its subject to a live user.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, ApiError> {
        let claims: Claims = self.keys.verify(token)?;
        let user = self.users.find_by_id(claims.sub).await?.ok_or_else(|| {
            tracing::warn!("Token subject {} no longer exists", claims.sub);
            ApiError::unauthorized("User no longer exists")
        })?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
        })
    }

    fn token_for(&self, user: UserInfo) -> Result<TokenResponse, ApiError> {
        let token = self.keys.issue(user.id, &user.username)?;
        Ok(TokenResponse {
            token,
            user,
            expires_in: self.keys.expires_in(),
        })
    }
}
