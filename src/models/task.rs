use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Represents a task entity as stored in the database and returned by the API.
///
/// A task has no owner column of its own; it belongs to whoever owns `list_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task.
    pub task_id: i32,
    /// The list this task lives in. Fixed at creation.
    pub list_id: i32,
    /// Short name of the task.
    pub task_name: String,
    /// An optional free-text description.
    pub description: Option<String>,
    /// Whether the task has been completed.
    pub is_completed: bool,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskInput {
    /// The list to create the task in. Must be owned by the caller.
    pub list_id: i32,
    /// Required; optional here so that absence is reported as an invalid argument.
    pub task_name: Option<String>,
    pub description: Option<String>,
    /// Defaults to `false` when omitted.
    pub is_completed: Option<bool>,
}

/// A validated task ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub list_id: i32,
    pub task_name: String,
    pub description: Option<String>,
    pub is_completed: bool,
}

/// Request body for `PUT /tasks/{id}`: a partial update.
///
/// Only fields present in the JSON body are changed. `description` distinguishes
/// an absent key (`None`, leave unchanged) from an explicit `null`
/// (`Some(None)`, clear the description).
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskUpdate {
    pub task_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,
    pub is_completed: Option<bool>,
}

impl TaskUpdate {
    /// Returns `true` when the update would not change any field.
    pub fn is_empty(&self) -> bool {
        self.task_name.is_none() && self.description.is_none() && self.is_completed.is_none()
    }

    /// Applies the fields present in this update to `task`, leaving the rest untouched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(task_name) = &self.task_name {
            task.task_name = task_name.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(is_completed) = self.is_completed {
            task.is_completed = is_completed;
        }
    }
}

// Wraps any present value (including `null`) in `Some`; `#[serde(default)]` covers absence.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
