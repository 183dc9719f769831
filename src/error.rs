//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Domain failures (missing entities, foreign ownership, duplicate accounts, bad credentials)
//! are raised by the service layer as `AppError` values and travel unmodified to the HTTP
//! boundary, where the `actix_web::error::ResponseError` implementation renders them as a
//! status code plus a `{"error": "..."}` JSON body.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors` and
//! `bcrypt::BcryptError` allow the `?` operator to be used at every layer.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use log::error;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned for every failed login, whichever check rejected it.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing or unknown API key, or a key whose user no longer exists (HTTP 401).
    Unauthenticated(String),
    /// Login rejected (HTTP 401).
    /// Carries no detail so an unknown email and a wrong password look identical.
    InvalidCredentials,
    /// Username or email already registered, or any other unique-constraint clash (HTTP 400).
    Conflict(String),
    /// The requested entity does not exist (HTTP 404).
    NotFound(String),
    /// The entity exists but belongs to another user (HTTP 403).
    Forbidden(String),
    /// A required field is missing or empty (HTTP 400).
    InvalidArgument(String),
    /// A request body failed format validation (HTTP 422 Unprocessable Entity).
    ValidationError(String),
    /// An error originating from the data store (HTTP 500).
    DatabaseError(String),
    /// Any other unexpected server-side failure (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::InvalidCredentials => write!(f, "{}", INVALID_CREDENTIALS_MESSAGE),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::InvalidArgument(msg) => write!(f, "Invalid Argument: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Server-side failures are logged here and replaced by a generic message so that
/// store internals never reach the client.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) | AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthenticated(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::InvalidArgument(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AppError::DatabaseError(msg) | AppError::InternalServerError(msg) => {
                error!("request failed: {}", msg);
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations become `AppError::Conflict`; everything else is a
/// `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Conflict(
                format!(
                    "Duplicate value violates {}",
                    db_err.constraint().unwrap_or("a unique constraint")
                ),
            ),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
