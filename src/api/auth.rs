//! Admin login endpoint.

use actix_web::{HttpResponse, web};
use tracing::{info, warn};

use crate::auth::{issue_token, verify_credentials};
use crate::config::AuthSettings;
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, LoginResponse};

/// Exchange admin credentials for a session token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
    )
)]
pub async fn login(
    settings: web::Data<AuthSettings>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();

    if !verify_credentials(&settings, &request.username, &request.password) {
        warn!("Rejected login for user '{}'", request.username);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issue_token(&request.username, &settings)?;
    info!("Admin '{}' logged in", request.username);

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)));
}
