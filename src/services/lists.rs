use log::info;

use crate::{
    error::AppError,
    models::{List, Task},
    store::{ListRepository, Store, TaskRepository},
};

/// Ownership-scoped list operations.
///
/// Every call re-reads the list from the store before acting on it; there is no
/// cached notion of what a user owns.
pub struct ListService<'a> {
    store: &'a dyn Store,
}

/// Rejects a missing or blank `name`; anything else is kept exactly as given.
pub(crate) fn required_name(name: Option<&str>, field: &str) -> Result<String, AppError> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name.to_string()),
        _ => Err(AppError::InvalidArgument(format!("{} is required", field))),
    }
}

impl<'a> ListService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<List>, AppError> {
        self.store.lists_by_user(user_id).await
    }

    /// Returns the list if `user_id` owns it.
    ///
    /// Existence is checked before ownership so callers can tell `NotFound`
    /// from `Forbidden`.
    pub async fn get_owned(&self, list_id: i32, user_id: i32) -> Result<List, AppError> {
        let list = self
            .store
            .find_list_by_id(list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".into()))?;

        if list.user_id != user_id {
            return Err(AppError::Forbidden(
                "Not authorized to access this list".into(),
            ));
        }
        Ok(list)
    }

    pub async fn create(&self, user_id: i32, list_name: Option<&str>) -> Result<List, AppError> {
        let list_name = required_name(list_name, "list_name")?;
        let list = self.store.create_list(user_id, &list_name).await?;
        info!("User {} created list {}", user_id, list.list_id);
        Ok(list)
    }

    pub async fn update(
        &self,
        list_id: i32,
        user_id: i32,
        list_name: Option<&str>,
    ) -> Result<List, AppError> {
        self.get_owned(list_id, user_id).await?;
        let list_name = required_name(list_name, "list_name")?;

        self.store
            .update_list_name(list_id, user_id, &list_name)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".into()))
    }

    /// Deletes the list and, through the store's cascade, every task in it.
    pub async fn delete(&self, list_id: i32, user_id: i32) -> Result<bool, AppError> {
        self.get_owned(list_id, user_id).await?;
        let deleted = self.store.delete_list(list_id, user_id).await?;
        if deleted {
            info!("User {} deleted list {}", user_id, list_id);
        }
        Ok(deleted)
    }

    /// Tasks of a single list, after the same ownership check as `get_owned`.
    pub async fn tasks_in_list(&self, list_id: i32, user_id: i32) -> Result<Vec<Task>, AppError> {
        self.get_owned(list_id, user_id).await?;
        self.store.tasks_by_list(list_id).await
    }
}
