//! API endpoint modules.

pub mod auth;
pub mod health;
pub mod jobs;
pub mod openapi;
pub mod reports;

use actix_web::web;

pub use health::configure_health_routes;
pub use jobs::UploadSettings;
pub use openapi::ApiDoc;

/// Register every `/api/v1` route on `cfg`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(auth::configure_routes)
        .configure(reports::configure_routes)
        .configure(jobs::configure_routes)
        .configure(openapi::configure_routes);
}
