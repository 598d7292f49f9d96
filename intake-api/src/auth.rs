use crate::error::{AppError, AppResult};
use chrono::Utc;
use intake_core::User;
use intake_types::{UserInfo, UserRole};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims for session tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User, ttl_hours: i64) -> Self {
        Self::new_with_duration(user, ttl_hours * 60 * 60)
    }

    /// Claims expiring `duration_seconds` from now
    pub fn new_with_duration(user: &User, duration_seconds: i64) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            exp: now + duration_seconds,
            iat: now,
        }
    }

    pub fn user_info(&self) -> AppResult<UserInfo> {
        let id = self
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(UserInfo {
            id,
            username: self.username.clone(),
            role: self.role,
        })
    }
}

/// Generate a JWT token from claims
pub fn generate_token(claims: &Claims, secret: &str) -> AppResult<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate JWT token: {}", e)))?;

    Ok(token)
}

/// Validate and decode a JWT token
pub fn validate_token(token: &str, secret: &str) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}
