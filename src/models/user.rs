use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A registered account as stored in the `users` table.
///
/// Deliberately not `Serialize`: the password hash must never leave the server.
/// Responses expose users through `AuthResponse` instead.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    /// bcrypt hash of the password; only ever compared through `bcrypt::verify`.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
