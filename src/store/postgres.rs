use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{ApiKeyRepository, ListRepository, TaskRepository, UserRepository};
use crate::{
    error::AppError,
    models::{ApiKey, List, NewTask, Task, TaskUpdate, User},
};

const USER_COLUMNS: &str = "user_id, username, email, password_hash, created_at";
const LIST_COLUMNS: &str = "list_id, user_id, list_name, created_at";
const TASK_COLUMNS: &str =
    "tasks.task_id, tasks.list_id, tasks.task_name, tasks.description, tasks.is_completed, tasks.created_at";

/// PostgreSQL-backed store.
///
/// Referential integrity and cascades are enforced by the schema in `migrations/`.
/// Every method is a single statement, so each mutation commits or rolls back on its own.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ApiKeyRepository for PgStore {
    async fn create_api_key(&self, user_id: i32, token: &str) -> Result<ApiKey, AppError> {
        let key = sqlx::query_as::<_, ApiKey>(
            "INSERT INTO api_keys (user_id, api_key) VALUES ($1, $2)
             RETURNING api_key_id, user_id, api_key, created_at",
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(key)
    }

    async fn find_api_key_by_token(&self, token: &str) -> Result<Option<ApiKey>, AppError> {
        let key = sqlx::query_as::<_, ApiKey>(
            "SELECT api_key_id, user_id, api_key, created_at FROM api_keys WHERE api_key = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(key)
    }
}

#[async_trait]
impl ListRepository for PgStore {
    async fn create_list(&self, user_id: i32, list_name: &str) -> Result<List, AppError> {
        let sql = format!(
            "INSERT INTO lists (user_id, list_name) VALUES ($1, $2) RETURNING {}",
            LIST_COLUMNS
        );
        let list = sqlx::query_as::<_, List>(&sql)
            .bind(user_id)
            .bind(list_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(list)
    }

    async fn find_list_by_id(&self, list_id: i32) -> Result<Option<List>, AppError> {
        let sql = format!("SELECT {} FROM lists WHERE list_id = $1", LIST_COLUMNS);
        let list = sqlx::query_as::<_, List>(&sql)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(list)
    }

    async fn lists_by_user(&self, user_id: i32) -> Result<Vec<List>, AppError> {
        let sql = format!(
            "SELECT {} FROM lists WHERE user_id = $1 ORDER BY list_id",
            LIST_COLUMNS
        );
        let lists = sqlx::query_as::<_, List>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(lists)
    }

    async fn update_list_name(
        &self,
        list_id: i32,
        owner_id: i32,
        list_name: &str,
    ) -> Result<Option<List>, AppError> {
        let sql = format!(
            "UPDATE lists SET list_name = $1 WHERE list_id = $2 AND user_id = $3 RETURNING {}",
            LIST_COLUMNS
        );
        let list = sqlx::query_as::<_, List>(&sql)
            .bind(list_name)
            .bind(list_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(list)
    }

    async fn delete_list(&self, list_id: i32, owner_id: i32) -> Result<bool, AppError> {
        // Tasks go with it through ON DELETE CASCADE, in the same statement.
        let result = sqlx::query("DELETE FROM lists WHERE list_id = $1 AND user_id = $2")
            .bind(list_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn create_task(&self, task: &NewTask, owner_id: i32) -> Result<Option<Task>, AppError> {
        // INSERT ... SELECT writes nothing unless the list is still owned by the caller.
        let sql = format!(
            "INSERT INTO tasks (list_id, task_name, description, is_completed)
             SELECT lists.list_id, $3, $4, $5 FROM lists
             WHERE lists.list_id = $1 AND lists.user_id = $2
             RETURNING {}",
            TASK_COLUMNS
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.list_id)
            .bind(owner_id)
            .bind(&task.task_name)
            .bind(&task.description)
            .bind(task.is_completed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_task_by_id(&self, task_id: i32) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE tasks.task_id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn tasks_by_list(&self, list_id: i32) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE tasks.list_id = $1 ORDER BY tasks.task_id",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(list_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn tasks_by_user(&self, user_id: i32) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks
             JOIN lists ON lists.list_id = tasks.list_id
             WHERE lists.user_id = $1
             ORDER BY tasks.task_id",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update_task(
        &self,
        task_id: i32,
        owner_id: i32,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        // $4 says whether the description key was present at all; $5 is its (nullable) value.
        let sql = format!(
            "UPDATE tasks SET
                 task_name = COALESCE($3, tasks.task_name),
                 description = CASE WHEN $4 THEN $5 ELSE tasks.description END,
                 is_completed = COALESCE($6, tasks.is_completed)
             FROM lists
             WHERE tasks.task_id = $1 AND lists.list_id = tasks.list_id AND lists.user_id = $2
             RETURNING {}",
            TASK_COLUMNS
        );
        let description = changes.description.clone().flatten();
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(owner_id)
            .bind(&changes.task_name)
            .bind(changes.description.is_some())
            .bind(description)
            .bind(changes.is_completed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, task_id: i32, owner_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM tasks USING lists
             WHERE tasks.task_id = $1 AND lists.list_id = tasks.list_id AND lists.user_id = $2",
        )
        .bind(task_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
