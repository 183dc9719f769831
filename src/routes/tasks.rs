use crate::{
    auth::Principal,
    error::AppError,
    models::{TaskInput, TaskUpdate},
    services::TaskService,
    store::Store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Retrieves every task across the caller's lists.
///
/// ## Responses:
/// - `200 OK`: A JSON array of `Task` objects, possibly empty.
/// - `401 Unauthorized`: Missing or invalid `X-API-Key`.
#[get("")]
pub async fn get_tasks(
    store: web::Data<dyn Store>,
    principal: Principal,
) -> Result<impl Responder, AppError> {
    let tasks = TaskService::new(store.get_ref())
        .list_for_user(principal.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task in one of the caller's lists.
///
/// ## Request Body:
/// - `list_id`: The target list (required, must be owned by the caller).
/// - `task_name`: Required, non-blank.
/// - `description` (optional).
/// - `is_completed` (optional): Defaults to `false`.
///
/// ## Responses:
/// - `201 Created`: The new `Task`.
/// - `400 Bad Request`: `task_name` missing or blank, or a malformed body.
/// - `403 Forbidden`: The list is missing or belongs to someone else.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    principal: Principal,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = TaskService::new(store.get_ref())
        .create(principal.user_id(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// ## Responses:
/// - `200 OK`: The `Task`.
/// - `403 Forbidden`: The task's list belongs to someone else.
/// - `404 Not Found`: No task with this id.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<dyn Store>,
    principal: Principal,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = TaskService::new(store.get_ref())
        .get_owned(task_id.into_inner(), principal.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task.
///
/// Only the fields present in the body change. `"description": null` clears the
/// description; leaving the key out keeps it.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    principal: Principal,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task = TaskService::new(store.get_ref())
        .update(
            task_id.into_inner(),
            principal.user_id(),
            task_data.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    principal: Principal,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let deleted = TaskService::new(store.get_ref())
        .delete(task_id.into_inner(), principal.user_id())
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
