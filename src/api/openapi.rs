//! OpenAPI documentation configuration.

use actix_web::{HttpResponse, get, web};
use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NGO Impact Server",
        version = "0.1.0",
        description = "API server for NGO monthly impact reports with asynchronous CSV bulk import"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Auth endpoints
        api::auth::login,
        // Report endpoints
        api::reports::submit_report,
        api::reports::dashboard,
        // Import endpoints
        api::jobs::upload_reports,
        api::jobs::get_job_status,
        api::jobs::get_job_reports,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Auth
            models::LoginRequest,
            models::LoginResponse,
            // Reports
            models::Region,
            models::Report,
            models::SubmitReportRequest,
            models::SubmitReportResponse,
            models::DashboardStats,
            models::DashboardResponse,
            // Jobs
            models::JobStatus,
            models::RowError,
            models::ImportJob,
            models::UploadResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Admin login"),
        (name = "Reports", description = "Report submission and dashboard"),
        (name = "Jobs", description = "CSV bulk import and job progress")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer token security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serve the OpenAPI document.
#[get("/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure OpenAPI routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}
