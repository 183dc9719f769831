use crate::{
    auth::{AuthResponse, LoginRequest, PasswordHasher, RegisterRequest},
    error::AppError,
    services::AuthService,
    store::Store,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates the account and returns it together with its first API key.
///
/// ## Responses:
/// - `201 Created`: `AuthResponse` with the new key.
/// - `400 Bad Request`: Email or username already in use.
/// - `422 Unprocessable Entity`: Field validation failed.
#[post("/register")]
pub async fn register(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let (user, key) = AuthService::new(store.get_ref(), hasher.get_ref())
        .register(
            &register_data.username,
            &register_data.email,
            &register_data.password,
        )
        .await?;

    Ok(HttpResponse::Created().json(AuthResponse::new(&user, key)))
}

/// Login user
///
/// Checks the credentials and issues a fresh API key. Keys issued earlier stay valid.
///
/// ## Responses:
/// - `200 OK`: `AuthResponse` with the new key.
/// - `401 Unauthorized`: Unknown email or wrong password; both look the same.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let (user, key) = AuthService::new(store.get_ref(), hasher.get_ref())
        .login(&login_data.email, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::new(&user, key)))
}
