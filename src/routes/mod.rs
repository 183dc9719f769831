pub mod auth;
pub mod health;
pub mod lists;
pub mod tasks;

use actix_web::{error::Error as ActixError, web, HttpRequest};

use crate::{auth::AuthMiddleware, error::AppError};

/// Registers every route of the API.
///
/// `/auth/*`, `/` and `/health` are public; `/lists` and `/tasks` sit behind
/// `AuthMiddleware`. The application must provide `web::Data<dyn Store>` and
/// `web::Data<PasswordHasher>`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(health::index)
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login),
        )
        .service(
            web::scope("/lists")
                .wrap(AuthMiddleware)
                .service(lists::get_lists)
                .service(lists::create_list)
                .service(lists::get_list)
                .service(lists::update_list)
                .service(lists::delete_list)
                .service(lists::get_list_tasks),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> ActixError {
    AppError::InvalidArgument(format!("Invalid request body: {}", err)).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> ActixError {
    AppError::InvalidArgument(format!("Invalid path parameter: {}", err)).into()
}
