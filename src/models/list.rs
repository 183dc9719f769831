use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named task list owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct List {
    /// Unique identifier for the list.
    pub list_id: i32,
    /// The owning user. Fixed at creation, never taken from client input.
    pub user_id: i32,
    /// Display name of the list.
    pub list_name: String,
    /// Timestamp of when the list was created.
    pub created_at: DateTime<Utc>,
}

/// Request body for creating or renaming a list.
///
/// `list_name` is optional at the deserialization level so that a missing name
/// is reported by the list service as an invalid argument rather than as a
/// generic JSON error.
#[derive(Debug, Default, Deserialize)]
pub struct ListInput {
    pub list_name: Option<String>,
}
