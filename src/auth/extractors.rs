use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The authenticated user behind the current request.
///
/// `AuthMiddleware` resolves the API key and inserts the `User` into request
/// extensions; this extractor reads it back. Using it on a route outside the
/// middleware yields `AppError::Unauthenticated`.
#[derive(Debug, Clone)]
pub struct Principal(pub User);

impl Principal {
    pub fn user_id(&self) -> i32 {
        self.0.user_id
    }
}

impl FromRequest for Principal {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(Principal(user))),
            None => {
                let err = AppError::Unauthenticated("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
