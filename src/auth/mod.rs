pub mod api_key;
pub mod extractors;
pub mod middleware;
pub mod password;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::models::{ApiKey, User};

// Re-export necessary items
pub use api_key::{generate_api_key, API_KEY_HEADER};
pub use extractors::Principal;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email)]
    pub email: String,
    /// User's password. Only checked for presence here; the real check is the hash comparison.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username for the new account.
    /// Must be between 3 and 50 characters, alphanumeric, and can include underscores or hyphens.
    #[validate(
        length(min = 3, max = 50),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    /// Email address for the new account.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// At least 6 characters and at most 72 bytes; bcrypt ignores anything past 72 bytes.
    #[validate(length(min = 6), custom = "validate_password_bytes")]
    pub password: String,
}

/// Longest password bcrypt hashes in full.
pub const MAX_PASSWORD_BYTES: usize = 72;

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("password_too_long");
        error.message = Some(Cow::from("Password must be at most 72 bytes"));
        return Err(error);
    }
    Ok(())
}

/// Response body for successful registration and login.
///
/// `api_key` is the freshly issued key; clients send it back in the `X-API-Key` header.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

impl AuthResponse {
    pub fn new(user: &User, key: ApiKey) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            api_key: key.api_key,
            created_at: user.created_at,
        }
    }
}
