//! CSV upload and import job endpoints.

use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ImportJob, JOB_REPORTS_LIMIT, Region, Report, UploadResponse};
use crate::services::spawn_import;

/// Longest accepted value for the `region` form field.
const MAX_REGION_FIELD_LEN: usize = 64;

/// Where uploads are spooled and how large they may be.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub upload_dir: PathBuf,
    pub max_upload_size: usize,
}

/// Stream a multipart field to `dest`, enforcing `max_size`.
///
/// Returns the number of bytes written. The partial file is left behind on
/// error; the caller removes it.
async fn save_field(field: &mut Field, dest: &Path, max_size: usize) -> AppResult<usize> {
    let mut file = tokio::fs::File::create(dest).await?;
    let mut written = 0usize;

    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        written += chunk.len();
        if written > max_size {
            return Err(AppError::InvalidInput(format!(
                "File exceeds maximum upload size of {} bytes",
                max_size
            )));
        }
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(written)
}

/// Read a small text field into a string.
async fn read_text_field(field: &mut Field, max_len: usize) -> AppResult<String> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        data.extend_from_slice(&chunk);
        if data.len() > max_len {
            return Err(AppError::InvalidInput("Form field too long".to_string()));
        }
    }
    String::from_utf8(data).map_err(|_| AppError::InvalidInput("Form field is not UTF-8".into()))
}

async fn discard_upload(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("Failed to remove rejected upload {}: {}", path.display(), e);
    }
}

/// Read the multipart form, spooling `file` to `dest`.
///
/// Returns the optional default region for the job.
async fn receive_upload(
    payload: &mut Multipart,
    dest: &Path,
    max_size: usize,
) -> AppResult<Option<Region>> {
    let mut file_size = None;
    let mut region_value = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") if file_size.is_none() => {
                file_size = Some(save_field(&mut field, dest, max_size).await?);
            }
            Some("region") => {
                region_value = Some(read_text_field(&mut field, MAX_REGION_FIELD_LEN).await?);
            }
            // Drain anything else so the stream can advance
            _ => {
                while field.next().await.is_some() {}
            }
        }
    }

    let size = file_size.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;
    info!("Received CSV upload: {} bytes", size);

    match region_value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => Region::parse(v)
            .map(Some)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid region: {}", v))),
    }
}

/// Upload a CSV file of reports for background import.
///
/// Multipart form fields:
/// - `file` (required): CSV with header `ngoId,month,peopleHelped,eventsConducted,fundsUtilized,region`
/// - `region` (optional): region for rows that leave theirs empty
///
/// Returns immediately with the job id. Poll `/job-status/{id}` for progress.
#[utoipa::path(
    post,
    path = "/api/v1/reports/upload",
    tag = "Jobs",
    request_body(content_type = "multipart/form-data", description = "CSV file and optional default region"),
    responses(
        (status = 202, description = "Import started", body = UploadResponse),
        (status = 400, description = "Missing file, invalid region or file too large", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_reports(
    pool: web::Data<DbPool>,
    settings: web::Data<UploadSettings>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let job_id = Uuid::now_v7();
    let dest = settings.upload_dir.join(format!("{}.csv", job_id));

    tokio::fs::create_dir_all(&settings.upload_dir).await?;

    let default_region = match receive_upload(&mut payload, &dest, settings.max_upload_size).await
    {
        Ok(region) => region,
        Err(e) => {
            discard_upload(&dest).await;
            return Err(e);
        }
    };

    if let Err(e) = pool.insert_import_job(job_id).await {
        discard_upload(&dest).await;
        return Err(e);
    }

    info!(
        "Import job {} created (default region: {})",
        job_id,
        default_region.map(|r| r.as_str()).unwrap_or("none")
    );

    // Fire and forget; the task records its own outcome on the job
    spawn_import(pool.get_ref().clone(), dest, job_id, default_region);

    Ok(HttpResponse::Accepted().json(UploadResponse {
        message: "File processing started".to_string(),
        job_id,
    }))
}

/// Get the progress of an import job.
#[utoipa::path(
    get,
    path = "/api/v1/job-status/{id}",
    tag = "Jobs",
    params(
        ("id" = Uuid, Path, description = "Import job UUID")
    ),
    responses(
        (status = 200, description = "Job snapshot", body = ImportJob),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_job_status(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();

    let job = pool
        .get_import_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

    Ok(HttpResponse::Ok().json(ImportJob::from(job)))
}

/// List the most recent reports last written by an import job.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}/reports",
    tag = "Jobs",
    params(
        ("id" = Uuid, Path, description = "Import job UUID")
    ),
    responses(
        (status = 200, description = "Up to 100 reports, newest first", body = Vec<Report>),
    )
)]
pub async fn get_job_reports(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();

    let reports: Vec<Report> = pool
        .get_reports_by_job_id(job_id, JOB_REPORTS_LIMIT)
        .await?
        .into_iter()
        .map(Report::from)
        .collect();

    Ok(HttpResponse::Ok().json(reports))
}

/// Configure upload and job routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/reports/upload").route(web::post().to(upload_reports)))
        .service(web::resource("/job-status/{id}").route(web::get().to(get_job_status)))
        .service(web::resource("/jobs/{id}/reports").route(web::get().to(get_job_reports)));
}
