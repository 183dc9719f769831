mod common;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{call_as, create_list, create_task, init_app, register_user};

#[actix_rt::test]
async fn test_list_crud_flow() {
    let app = init_app().await;
    let alice = register_user(&app, "alice").await;
    let key = alice.api_key.as_str();

    let list = create_list(&app, key, "Groceries").await;
    let list_id = list["list_id"].as_i64().unwrap();
    assert_eq!(list["list_name"], "Groceries");
    assert_eq!(list["user_id"], alice.user_id);
    create_list(&app, key, "Work").await;

    let resp = call_as(&app, key, test::TestRequest::get().uri("/lists"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let lists: Vec<Value> = test::read_body_json(resp).await;
    let names: Vec<&str> = lists
        .iter()
        .map(|l| l["list_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Groceries", "Work"]);

    let resp = call_as(
        &app,
        key,
        test::TestRequest::put().uri(&format!("/lists/{}", list_id)),
        Some(json!({ "list_name": "Supermarket" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let renamed: Value = test::read_body_json(resp).await;
    assert_eq!(renamed["list_name"], "Supermarket");
    assert_eq!(renamed["created_at"], list["created_at"]);

    let resp = call_as(
        &app,
        key,
        test::TestRequest::get().uri(&format!("/lists/{}", list_id)),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched, renamed);

    let resp = call_as(
        &app,
        key,
        test::TestRequest::delete().uri(&format!("/lists/{}", list_id)),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "List deleted successfully");

    let resp = call_as(
        &app,
        key,
        test::TestRequest::get().uri(&format!("/lists/{}", list_id)),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_lists_are_scoped_to_owner() {
    let app = init_app().await;
    let alice = register_user(&app, "alice").await;
    let bob = register_user(&app, "bob").await;

    let list = create_list(&app, &alice.api_key, "Groceries").await;
    let uri = format!("/lists/{}", list["list_id"]);

    let resp = call_as(&app, &bob.api_key, test::TestRequest::get().uri("/lists"), None).await;
    let lists: Vec<Value> = test::read_body_json(resp).await;
    assert!(lists.is_empty());

    let resp = call_as(&app, &bob.api_key, test::TestRequest::get().uri(&uri), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized to access this list");

    let resp = call_as(
        &app,
        &bob.api_key,
        test::TestRequest::put().uri(&uri),
        Some(json!({ "list_name": "Hijacked" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = call_as(&app, &bob.api_key, test::TestRequest::delete().uri(&uri), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Untouched by the rejected requests.
    let resp = call_as(&app, &alice.api_key, test::TestRequest::get().uri(&uri), None).await;
    let current: Value = test::read_body_json(resp).await;
    assert_eq!(current, list);
}

#[actix_rt::test]
async fn test_missing_list_and_bad_input() {
    let app = init_app().await;
    let alice = register_user(&app, "alice").await;
    let key = alice.api_key.as_str();

    let resp = call_as(&app, key, test::TestRequest::get().uri("/lists/9999"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "List not found");

    let resp = call_as(
        &app,
        key,
        test::TestRequest::post().uri("/lists"),
        Some(json!({})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "list_name is required");

    let resp = call_as(
        &app,
        key,
        test::TestRequest::get().uri("/lists/not-a-number"),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_tasks_of_a_list() {
    let app = init_app().await;
    let alice = register_user(&app, "alice").await;
    let bob = register_user(&app, "bob").await;

    let groceries = create_list(&app, &alice.api_key, "Groceries").await;
    let work = create_list(&app, &alice.api_key, "Work").await;
    let groceries_id = groceries["list_id"].as_i64().unwrap();
    create_task(&app, &alice.api_key, groceries_id, "Buy milk").await;
    create_task(&app, &alice.api_key, groceries_id, "Buy eggs").await;
    create_task(&app, &alice.api_key, work["list_id"].as_i64().unwrap(), "Report").await;

    let uri = format!("/lists/{}/tasks", groceries_id);
    let resp = call_as(&app, &alice.api_key, test::TestRequest::get().uri(&uri), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t["list_id"] == groceries["list_id"]));

    let resp = call_as(&app, &bob.api_key, test::TestRequest::get().uri(&uri), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_lists_require_api_key() {
    let app = init_app().await;

    let req = test::TestRequest::get().uri("/lists").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = call_as(&app, "not-a-key", test::TestRequest::get().uri("/lists"), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid API key");
}

#[actix_rt::test]
async fn test_list_name_is_stored_as_given() {
    let app = init_app().await;
    let alice = register_user(&app, "alice").await;

    let list = create_list(&app, &alice.api_key, "  Groceries ").await;
    assert_eq!(list["list_name"], "  Groceries ");

    let resp = call_as(
        &app,
        &alice.api_key,
        test::TestRequest::post().uri("/lists"),
        Some(json!({ "list_name": "   " })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_writes_to_missing_list_are_not_found() {
    let app = init_app().await;
    let alice = register_user(&app, "alice").await;

    let resp = call_as(
        &app,
        &alice.api_key,
        test::TestRequest::delete().uri("/lists/9999"),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "List not found");

    let resp = call_as(
        &app,
        &alice.api_key,
        test::TestRequest::put().uri("/lists/9999"),
        Some(json!({ "list_name": "Renamed" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
