use crate::{
    auth::Principal, error::AppError, models::ListInput, services::ListService, store::Store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Returns every list owned by the caller, ordered by id.
#[get("")]
pub async fn get_lists(
    store: web::Data<dyn Store>,
    principal: Principal,
) -> Result<impl Responder, AppError> {
    let lists = ListService::new(store.get_ref())
        .list_for_user(principal.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(lists))
}

/// Creates a list owned by the caller.
///
/// ## Responses:
/// - `201 Created`: The new `List`.
/// - `400 Bad Request`: `list_name` missing or blank.
#[post("")]
pub async fn create_list(
    store: web::Data<dyn Store>,
    principal: Principal,
    list_data: web::Json<ListInput>,
) -> Result<impl Responder, AppError> {
    let list = ListService::new(store.get_ref())
        .create(principal.user_id(), list_data.list_name.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(list))
}

/// ## Responses:
/// - `200 OK`: The `List`.
/// - `403 Forbidden`: The list belongs to someone else.
/// - `404 Not Found`: No list with this id.
#[get("/{id}")]
pub async fn get_list(
    store: web::Data<dyn Store>,
    principal: Principal,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let list = ListService::new(store.get_ref())
        .get_owned(list_id.into_inner(), principal.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Renames a list. Ownership is checked before the body is.
#[put("/{id}")]
pub async fn update_list(
    store: web::Data<dyn Store>,
    principal: Principal,
    list_id: web::Path<i32>,
    list_data: web::Json<ListInput>,
) -> Result<impl Responder, AppError> {
    let list = ListService::new(store.get_ref())
        .update(
            list_id.into_inner(),
            principal.user_id(),
            list_data.list_name.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Deletes a list and every task in it.
#[delete("/{id}")]
pub async fn delete_list(
    store: web::Data<dyn Store>,
    principal: Principal,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let deleted = ListService::new(store.get_ref())
        .delete(list_id.into_inner(), principal.user_id())
        .await?;

    if !deleted {
        return Err(AppError::NotFound("List not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "List deleted successfully" })))
}

/// Tasks of one list, under the same ownership rules as `get_list`.
#[get("/{id}/tasks")]
pub async fn get_list_tasks(
    store: web::Data<dyn Store>,
    principal: Principal,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let tasks = ListService::new(store.get_ref())
        .tasks_in_list(list_id.into_inner(), principal.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}
