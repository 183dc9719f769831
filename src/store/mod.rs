//! Repository layer.
//!
//! Each entity gets a small async repository trait; `Store` bundles all four so a
//! single `web::Data<dyn Store>` can be shared by every handler. Two backends
//! implement it: `PgStore` (PostgreSQL through `sqlx`) and `MemoryStore`.
//!
//! Contract shared by both backends:
//! - every mutation is durable once it returns and either fully applies or not at all;
//! - `update_*` / `delete_*` on a missing row return `None` / `false`, never an error;
//! - mutations of lists and tasks are scoped by owner, so a row that is missing *or*
//!   owned by someone else is indistinguishable from a missing row at this level;
//! - unique-constraint violations surface as `AppError::Conflict`.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use crate::{
    config::Config,
    error::AppError,
    models::{ApiKey, List, NewTask, Task, TaskUpdate, User},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;

    async fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Removes the user together with their lists, tasks and API keys.
    async fn delete_user(&self, user_id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn create_api_key(&self, user_id: i32, token: &str) -> Result<ApiKey, AppError>;

    async fn find_api_key_by_token(&self, token: &str) -> Result<Option<ApiKey>, AppError>;
}

#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn create_list(&self, user_id: i32, list_name: &str) -> Result<List, AppError>;

    async fn find_list_by_id(&self, list_id: i32) -> Result<Option<List>, AppError>;

    async fn lists_by_user(&self, user_id: i32) -> Result<Vec<List>, AppError>;

    /// Renames the list if it exists and belongs to `owner_id`.
    async fn update_list_name(
        &self,
        list_id: i32,
        owner_id: i32,
        list_name: &str,
    ) -> Result<Option<List>, AppError>;

    /// Deletes the list and all of its tasks if it belongs to `owner_id`.
    async fn delete_list(&self, list_id: i32, owner_id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts the task only if its list exists and belongs to `owner_id`.
    async fn create_task(&self, task: &NewTask, owner_id: i32) -> Result<Option<Task>, AppError>;

    async fn find_task_by_id(&self, task_id: i32) -> Result<Option<Task>, AppError>;

    async fn tasks_by_list(&self, list_id: i32) -> Result<Vec<Task>, AppError>;

    /// All tasks in all lists owned by `user_id`.
    async fn tasks_by_user(&self, user_id: i32) -> Result<Vec<Task>, AppError>;

    /// Applies the present fields of `changes` if the task's list belongs to `owner_id`.
    async fn update_task(
        &self,
        task_id: i32,
        owner_id: i32,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, AppError>;

    async fn delete_task(&self, task_id: i32, owner_id: i32) -> Result<bool, AppError>;
}

/// The full persistence surface used by the services.
pub trait Store: UserRepository + ApiKeyRepository + ListRepository + TaskRepository {}

impl<T> Store for T where T: UserRepository + ApiKeyRepository + ListRepository + TaskRepository {}

/// Opens the store described by `config`.
///
/// Connects to PostgreSQL and runs pending migrations when a database URL is
/// configured, otherwise falls back to an empty in-memory store.
pub async fn connect(config: &Config) -> Result<Arc<dyn Store>, AppError> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.db_max_connections).await?;
            info!("Connected to PostgreSQL store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("No database configured; using the in-memory store (data is lost on exit)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
