//! Report submission and dashboard endpoints.

use actix_web::{HttpResponse, web};
use tracing::{debug, info};

use crate::auth::BearerAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    DashboardQuery, DashboardResponse, Region, Report, SubmitReportRequest, SubmitReportResponse,
};
use crate::services::validate_submission;

/// Submit or overwrite a single monthly report.
///
/// Reports are keyed by `(ngoId, month)`. Submitting the same key again
/// overwrites the counts and region of the stored report.
#[utoipa::path(
    post,
    path = "/api/v1/report",
    tag = "Reports",
    request_body = SubmitReportRequest,
    responses(
        (status = 201, description = "Report stored", body = SubmitReportResponse),
        (status = 400, description = "Missing ngoId or month", body = crate::error::ErrorResponse),
    )
)]
pub async fn submit_report(
    pool: web::Data<DbPool>,
    body: web::Json<SubmitReportRequest>,
) -> AppResult<HttpResponse> {
    let record = validate_submission(&body)?;
    let stored = pool.upsert_report(&record, None).await?;

    info!("Report submitted: ngo_id={}, month={}", stored.ngo_id, stored.month);

    Ok(HttpResponse::Created().json(SubmitReportResponse {
        message: "Report submitted successfully".to_string(),
        report: Report::from(stored),
    }))
}

/// Parse the dashboard region filter. Absent, empty and `All` all mean no filter.
fn region_filter(value: Option<&str>) -> AppResult<Option<Region>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => match Region::parse(v) {
            Some(Region::All) => Ok(None),
            Some(region) => Ok(Some(region)),
            None => Err(AppError::InvalidInput(format!("Invalid region: {}", v))),
        },
    }
}

/// Aggregated totals across reports, optionally filtered by month and region.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Reports",
    params(
        ("month" = Option<String>, Query, description = "Only include this month (YYYY-MM)"),
        ("region" = Option<String>, Query, description = "Only include this region; All disables the filter"),
    ),
    responses(
        (status = 200, description = "Dashboard totals", body = DashboardResponse),
        (status = 400, description = "Invalid region", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn dashboard(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    query: web::Query<DashboardQuery>,
) -> AppResult<HttpResponse> {
    let month = query.month.as_deref().map(str::trim).filter(|m| !m.is_empty());
    let region = region_filter(query.region.as_deref())?;

    debug!(
        "Dashboard requested by '{}': month={:?}, region={:?}",
        auth.admin.username, month, region
    );

    let stats = pool.dashboard_stats(month, region).await?;
    let regions = pool.distinct_regions().await?;

    Ok(HttpResponse::Ok().json(DashboardResponse { stats, regions }))
}

/// Configure report routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/report").route(web::post().to(submit_report)))
        .service(web::resource("/dashboard").route(web::get().to(dashboard)));
}
