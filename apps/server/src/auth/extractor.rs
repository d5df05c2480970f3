//! Actix-web extractor resolving the caller through the configured identity provider.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use std::future::{Ready, ready};

use super::{CurrentUser, SharedIdentity};
use crate::error::ErrorResponse;

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires an authenticated caller.
///
/// ```ignore
/// async fn handler(auth: Authenticated) -> impl Responder {
///     // auth.user.id scopes every query
/// }
/// ```
pub struct Authenticated {
    pub user: CurrentUser,
}

impl FromRequest for Authenticated {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let provider = match req.app_data::<web::Data<SharedIdentity>>() {
            Some(provider) => provider,
            None => {
                return ready(Err(AuthError {
                    message: "Internal configuration error".to_string(),
                }));
            }
        };

        match provider.current_user() {
            Some(user) => ready(Ok(Authenticated { user })),
            None => ready(Err(AuthError {
                message: "You must be logged in to perform this action".to_string(),
            })),
        }
    }
}
