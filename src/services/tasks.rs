use log::info;

use super::lists::required_name;
use crate::{
    error::AppError,
    models::{NewTask, Task, TaskInput, TaskUpdate},
    store::{ListRepository, Store, TaskRepository},
};

/// Ownership-scoped task operations.
///
/// A task is owned through its list, so every check walks task → list → user.
pub struct TaskService<'a> {
    store: &'a dyn Store,
}

impl<'a> TaskService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// All tasks across every list `user_id` owns.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Task>, AppError> {
        self.store.tasks_by_user(user_id).await
    }

    /// Returns the task if its list is owned by `user_id`.
    ///
    /// `NotFound` when no task has this id; `Forbidden` when the task exists but its
    /// list is missing or owned by someone else.
    pub async fn get_owned(&self, task_id: i32, user_id: i32) -> Result<Task, AppError> {
        let task = self
            .store
            .find_task_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        let list = self.store.find_list_by_id(task.list_id).await?;
        match list {
            Some(list) if list.user_id == user_id => Ok(task),
            _ => Err(AppError::Forbidden(
                "Not authorized to access this task".into(),
            )),
        }
    }

    /// Creates a task in one of the caller's lists.
    ///
    /// The list is checked before anything is written; a list that is missing or
    /// belongs to another user is `Forbidden`.
    pub async fn create(&self, user_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let list = self.store.find_list_by_id(input.list_id).await?;
        if !matches!(list, Some(ref list) if list.user_id == user_id) {
            return Err(Self::forbidden_list());
        }

        let new_task = NewTask {
            list_id: input.list_id,
            task_name: required_name(input.task_name.as_deref(), "task_name")?,
            description: input.description,
            is_completed: input.is_completed.unwrap_or(false),
        };

        // The insert is itself owner-scoped; None means the list went away meanwhile.
        let task = self
            .store
            .create_task(&new_task, user_id)
            .await?
            .ok_or_else(Self::forbidden_list)?;
        info!("User {} created task {}", user_id, task.task_id);
        Ok(task)
    }

    /// Applies a partial update; fields absent from `changes` keep their values.
    pub async fn update(
        &self,
        task_id: i32,
        user_id: i32,
        mut changes: TaskUpdate,
    ) -> Result<Task, AppError> {
        let current = self.get_owned(task_id, user_id).await?;

        if let Some(task_name) = changes.task_name.take() {
            changes.task_name = Some(required_name(Some(&task_name), "task_name")?);
        }
        if changes.is_empty() {
            return Ok(current);
        }

        self.store
            .update_task(task_id, user_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn delete(&self, task_id: i32, user_id: i32) -> Result<bool, AppError> {
        self.get_owned(task_id, user_id).await?;
        let deleted = self.store.delete_task(task_id, user_id).await?;
        if deleted {
            info!("User {} deleted task {}", user_id, task_id);
        }
        Ok(deleted)
    }

    fn forbidden_list() -> AppError {
        AppError::Forbidden("Not authorized to create tasks in this list".into())
    }
}
