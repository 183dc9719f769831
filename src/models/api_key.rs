use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// An issued API key, as stored in the `api_keys` table.
///
/// A user accumulates one key per registration or login. Keys never expire and
/// are never revoked, so any of them resolves to the owning user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ApiKey {
    pub api_key_id: i32,
    /// Owner of the key.
    pub user_id: i32,
    /// The opaque token clients send in the `X-API-Key` header. Unique across all users.
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}
