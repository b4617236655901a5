//! CSV bulk import pipeline.
//!
//! One job is one sequential pass over an uploaded file:
//!
//! 1. Read every row (blocking I/O, off the async runtime).
//! 2. Move the job to `processing` with the row count.
//! 3. Validate and upsert each row, recording per-row failures.
//! 4. Flush progress on a fixed cadence, then mark the job `completed`.
//!
//! Anything that stops the pass before step 4 finishes marks the job
//! `failed`. The uploaded file is removed in both cases.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ImportError;
use crate::models::{JobProgress, Region, RowError};
use crate::services::csv_parser::read_rows;
use crate::services::store::{JobTracker, ReportStore};
use crate::services::validation::validate_row;

/// Progress is written after the first row and then every this many rows.
pub const FLUSH_INTERVAL: usize = 10;

/// Whether progress should be flushed after the row at 0-based `index`.
pub fn should_flush(index: usize, total: usize) -> bool {
    index % FLUSH_INTERVAL == 0 || index + 1 == total
}

/// Start an import in the background.
///
/// The returned handle is only useful for tests and shutdown; request
/// handlers drop it. Every outcome is logged and recorded on the job.
pub fn spawn_import<S>(
    store: S,
    path: PathBuf,
    job_id: Uuid,
    default_region: Option<Region>,
) -> JoinHandle<()>
where
    S: ReportStore + JobTracker + Clone + 'static,
{
    tokio::spawn(async move {
        match run_import(&store, &path, job_id, default_region).await {
            Ok(progress) => info!(
                "Import job {} completed: {} processed, {} failed",
                job_id, progress.processed, progress.failed
            ),
            Err(e) => error!("Import job {} failed: {}", job_id, e),
        }
    })
}

/// Run an import to completion and return the final counters.
///
/// On error the job has already been marked `failed` (if the tracker allowed
/// it) and the source file removed.
pub async fn run_import<S>(
    store: &S,
    path: &Path,
    job_id: Uuid,
    default_region: Option<Region>,
) -> Result<JobProgress, ImportError>
where
    S: ReportStore + JobTracker,
{
    info!("Starting import job {} from {}", job_id, path.display());

    let result = import_rows(store, path, job_id, default_region).await;

    if let Err(e) = &result {
        error!("Import job {} aborted: {}", job_id, e);
        if let Err(fail_err) = store.fail(job_id, &e.job_message()).await {
            error!(
                "Failed to mark import job {} as failed: {}",
                job_id, fail_err
            );
        }
    }

    remove_source(path).await;
    result
}

async fn import_rows<S>(
    store: &S,
    path: &Path,
    job_id: Uuid,
    default_region: Option<Region>,
) -> Result<JobProgress, ImportError>
where
    S: ReportStore + JobTracker,
{
    let owned_path = path.to_path_buf();
    let rows = tokio::task::spawn_blocking(move || read_rows(&owned_path))
        .await
        .map_err(|e| ImportError::Stream(format!("CSV reader task failed: {}", e)))??;

    let total = rows.len();
    info!("Import job {} has {} rows", job_id, total);

    store
        .initialize(job_id, total as u64)
        .await
        .map_err(|e| ImportError::Tracker(e.to_string()))?;

    let mut progress = JobProgress::default();

    for (index, row) in rows.into_iter().enumerate() {
        let outcome = match validate_row(&row, default_region) {
            Ok(record) => store
                .upsert(&record, job_id)
                .await
                .map(|_| ())
                .map_err(|e| ImportError::StoreWrite(e.to_string())),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => progress.record_success(),
            Err(e) => {
                warn!("Import job {} row {} failed: {}", job_id, index + 1, e);
                progress.record_failure(RowError::for_row(index + 1, e.to_string(), row));
            }
        }

        if should_flush(index, total) {
            store
                .flush(job_id, &progress)
                .await
                .map_err(|e| ImportError::Tracker(e.to_string()))?;
        }
    }

    store
        .finalize(job_id, &progress)
        .await
        .map_err(|e| ImportError::Tracker(e.to_string()))?;

    Ok(progress)
}

/// Delete the uploaded file. A file that is already gone is fine.
async fn remove_source(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove upload {}: {}", path.display(), e),
    }
}
