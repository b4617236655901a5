//! Actix-web extractor for bearer token authentication.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use std::future::{Ready, ready};

use super::verify_token;
use crate::config::{AUTHORIZATION_HEADER, AuthSettings};
use crate::error::ErrorResponse;
use crate::models::AuthenticatedAdmin;

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
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

/// Extractor that requires a valid session token.
///
/// ```ignore
/// async fn protected_handler(auth: BearerAuth) -> impl Responder {
///     // auth.admin is the verified admin identity
/// }
/// ```
pub struct BearerAuth {
    pub admin: AuthenticatedAdmin,
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequest for BearerAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let settings = match req.app_data::<web::Data<AuthSettings>>() {
            Some(settings) => settings,
            None => return ready(Err(AuthError::new("Internal configuration error"))),
        };

        let token = match bearer_token(req) {
            Some(token) => token,
            None => {
                return ready(Err(AuthError::new(
                    "Missing session token. Provide Authorization: Bearer <token>.",
                )));
            }
        };

        match verify_token(token, &settings.jwt_secret) {
            Ok(claims) => ready(Ok(BearerAuth {
                admin: AuthenticatedAdmin {
                    username: claims.sub,
                },
            })),
            Err(e) => ready(Err(AuthError::new(e))),
        }
    }
}
