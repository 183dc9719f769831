use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ApiKeyRepository, ListRepository, TaskRepository, UserRepository};
use crate::{
    error::AppError,
    models::{ApiKey, List, NewTask, Task, TaskUpdate, User},
};

/// In-process store with the same constraints as the SQL schema.
///
/// Used when no database is configured and throughout the test suite. Uniqueness,
/// foreign keys and cascades are checked under a single write lock, so each call is
/// atomic just like a single SQL statement.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    users: BTreeMap<i32, User>,
    lists: BTreeMap<i32, List>,
    tasks: BTreeMap<i32, Task>,
    api_keys: BTreeMap<i32, ApiKey>,
    user_seq: i32,
    list_seq: i32,
    task_seq: i32,
    api_key_seq: i32,
}

fn next_id(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

fn unique_violation(constraint: &str) -> AppError {
    AppError::Conflict(format!("Duplicate value violates {}", constraint))
}

fn foreign_key_violation(constraint: &str) -> AppError {
    AppError::DatabaseError(format!("insert violates foreign key constraint {}", constraint))
}

impl State {
    fn owns_list(&self, list_id: i32, owner_id: i32) -> bool {
        self.lists
            .get(&list_id)
            .map_or(false, |list| list.user_id == owner_id)
    }

    fn owns_task(&self, task_id: i32, owner_id: i32) -> bool {
        self.tasks
            .get(&task_id)
            .map_or(false, |task| self.owns_list(task.list_id, owner_id))
    }

    fn remove_list_cascade(&mut self, list_id: i32) -> bool {
        if self.lists.remove(&list_id).is_none() {
            return false;
        }
        self.tasks.retain(|_, task| task.list_id != list_id);
        true
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == username) {
            return Err(unique_violation("users_username_key"));
        }
        if state.users.values().any(|u| u.email == email) {
            return Err(unique_violation("users_email_key"));
        }

        let user = User {
            user_id: next_id(&mut state.user_seq),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, AppError> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn delete_user(&self, user_id: i32) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        if state.users.remove(&user_id).is_none() {
            return Ok(false);
        }

        let owned: Vec<i32> = state
            .lists
            .values()
            .filter(|list| list.user_id == user_id)
            .map(|list| list.list_id)
            .collect();
        for list_id in owned {
            state.remove_list_cascade(list_id);
        }
        state.api_keys.retain(|_, key| key.user_id != user_id);
        Ok(true)
    }
}

#[async_trait]
impl ApiKeyRepository for MemoryStore {
    async fn create_api_key(&self, user_id: i32, token: &str) -> Result<ApiKey, AppError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(foreign_key_violation("api_keys_user_id_fkey"));
        }
        if state.api_keys.values().any(|k| k.api_key == token) {
            return Err(unique_violation("api_keys_api_key_key"));
        }

        let key = ApiKey {
            api_key_id: next_id(&mut state.api_key_seq),
            user_id,
            api_key: token.to_string(),
            created_at: Utc::now(),
        };
        state.api_keys.insert(key.api_key_id, key.clone());
        Ok(key)
    }

    async fn find_api_key_by_token(&self, token: &str) -> Result<Option<ApiKey>, AppError> {
        let state = self.state.read().await;
        Ok(state.api_keys.values().find(|k| k.api_key == token).cloned())
    }
}

#[async_trait]
impl ListRepository for MemoryStore {
    async fn create_list(&self, user_id: i32, list_name: &str) -> Result<List, AppError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(foreign_key_violation("lists_user_id_fkey"));
        }

        let list = List {
            list_id: next_id(&mut state.list_seq),
            user_id,
            list_name: list_name.to_string(),
            created_at: Utc::now(),
        };
        state.lists.insert(list.list_id, list.clone());
        Ok(list)
    }

    async fn find_list_by_id(&self, list_id: i32) -> Result<Option<List>, AppError> {
        Ok(self.state.read().await.lists.get(&list_id).cloned())
    }

    async fn lists_by_user(&self, user_id: i32) -> Result<Vec<List>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .lists
            .values()
            .filter(|list| list.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_list_name(
        &self,
        list_id: i32,
        owner_id: i32,
        list_name: &str,
    ) -> Result<Option<List>, AppError> {
        let mut state = self.state.write().await;
        Ok(state
            .lists
            .get_mut(&list_id)
            .filter(|list| list.user_id == owner_id)
            .map(|list| {
                list.list_name = list_name.to_string();
                list.clone()
            }))
    }

    async fn delete_list(&self, list_id: i32, owner_id: i32) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        if !state.owns_list(list_id, owner_id) {
            return Ok(false);
        }
        Ok(state.remove_list_cascade(list_id))
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn create_task(&self, task: &NewTask, owner_id: i32) -> Result<Option<Task>, AppError> {
        let mut state = self.state.write().await;
        if !state.owns_list(task.list_id, owner_id) {
            return Ok(None);
        }

        let created = Task {
            task_id: next_id(&mut state.task_seq),
            list_id: task.list_id,
            task_name: task.task_name.clone(),
            description: task.description.clone(),
            is_completed: task.is_completed,
            created_at: Utc::now(),
        };
        state.tasks.insert(created.task_id, created.clone());
        Ok(Some(created))
    }

    async fn find_task_by_id(&self, task_id: i32) -> Result<Option<Task>, AppError> {
        Ok(self.state.read().await.tasks.get(&task_id).cloned())
    }

    async fn tasks_by_list(&self, list_id: i32) -> Result<Vec<Task>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.list_id == list_id)
            .cloned()
            .collect())
    }

    async fn tasks_by_user(&self, user_id: i32) -> Result<Vec<Task>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|task| state.owns_list(task.list_id, user_id))
            .cloned()
            .collect())
    }

    async fn update_task(
        &self,
        task_id: i32,
        owner_id: i32,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let mut state = self.state.write().await;
        if !state.owns_task(task_id, owner_id) {
            return Ok(None);
        }
        Ok(state.tasks.get_mut(&task_id).map(|task| {
            changes.apply_to(task);
            task.clone()
        }))
    }

    async fn delete_task(&self, task_id: i32, owner_id: i32) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        if !state.owns_task(task_id, owner_id) {
            return Ok(false);
        }
        Ok(state.tasks.remove(&task_id).is_some())
    }
}
