#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test, web, App, Error,
};
use serde_json::{json, Value};
use todoapi::{
    auth::{AuthResponse, PasswordHasher, API_KEY_HEADER},
    routes,
    store::{MemoryStore, Store},
};

/// Shared state for one test application: a fresh in-memory store and a
/// minimum-cost hasher.
pub fn app_state() -> (web::Data<dyn Store>, web::Data<PasswordHasher>) {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let hasher = PasswordHasher::new(4).expect("cost 4 is valid");
    (web::Data::from(store), web::Data::new(hasher))
}

/// Builds the full application the way `main` does, minus CORS and logging.
pub async fn init_app(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let (store, hasher) = app_state();
    test::init_service(
        App::new()
            .app_data(store)
            .app_data(hasher)
            .configure(routes::config),
    )
    .await
}

pub async fn register_user<S, B>(app: &S, username: &str) -> AuthResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::CREATED,
        "registering {} failed",
        username
    );
    test::read_body_json(resp).await
}

/// Sends `method uri` with the caller's key and an optional JSON body.
pub async fn call_as<S, B>(
    app: &S,
    api_key: &str,
    req: test::TestRequest,
    body: Option<Value>,
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = req.insert_header((API_KEY_HEADER, api_key));
    let req = match body {
        Some(body) => req.set_json(body),
        None => req,
    };
    test::call_service(app, req.to_request()).await
}

pub async fn create_list<S, B>(app: &S, api_key: &str, name: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = call_as(
        app,
        api_key,
        test::TestRequest::post().uri("/lists"),
        Some(json!({ "list_name": name })),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    test::read_body_json(resp).await
}

pub async fn create_task<S, B>(app: &S, api_key: &str, list_id: i64, name: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = call_as(
        app,
        api_key,
        test::TestRequest::post().uri("/tasks"),
        Some(json!({ "list_id": list_id, "task_name": name })),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    test::read_body_json(resp).await
}
