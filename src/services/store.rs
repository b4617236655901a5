//! Storage seams used by the import pipeline.
//!
//! The pipeline only needs two capabilities from storage: a keyed report
//! upsert and a job progress record. `DbPool` provides both.

use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{ImportJob, JobProgress, NewReport, Report};

/// Idempotent report writes keyed by `(ngo_id, month)`.
#[async_trait::async_trait]
pub trait ReportStore: Send + Sync {
    /// Insert or overwrite the report for the record's key, stamping `job_id`.
    async fn upsert(&self, record: &NewReport, job_id: Uuid) -> AppResult<Report>;
}

/// Progress record for one import job.
///
/// Writes replace the whole counter/error state. Callers must serialize their
/// own counting; the import task is the single writer per job.
#[async_trait::async_trait]
pub trait JobTracker: Send + Sync {
    /// Enter `processing` with `total_rows` known and counters at zero.
    async fn initialize(&self, job_id: Uuid, total_rows: u64) -> AppResult<()>;

    /// Replace the counters and error list of a running job.
    async fn flush(&self, job_id: Uuid, progress: &JobProgress) -> AppResult<()>;

    /// Enter `completed` with the final counters.
    async fn finalize(&self, job_id: Uuid, progress: &JobProgress) -> AppResult<()>;

    /// Enter `failed` with a single job-level error.
    async fn fail(&self, job_id: Uuid, message: &str) -> AppResult<()>;

    /// Current snapshot, or `None` if the job does not exist.
    async fn get(&self, job_id: Uuid) -> AppResult<Option<ImportJob>>;
}

#[async_trait::async_trait]
impl ReportStore for DbPool {
    async fn upsert(&self, record: &NewReport, job_id: Uuid) -> AppResult<Report> {
        self.upsert_report(record, Some(job_id))
            .await
            .map(Report::from)
    }
}

#[async_trait::async_trait]
impl JobTracker for DbPool {
    async fn initialize(&self, job_id: Uuid, total_rows: u64) -> AppResult<()> {
        self.start_import_job(job_id, total_rows).await.map(|_| ())
    }

    async fn flush(&self, job_id: Uuid, progress: &JobProgress) -> AppResult<()> {
        self.update_import_progress(job_id, progress)
            .await
            .map(|_| ())
    }

    async fn finalize(&self, job_id: Uuid, progress: &JobProgress) -> AppResult<()> {
        self.complete_import_job(job_id, progress).await.map(|_| ())
    }

    async fn fail(&self, job_id: Uuid, message: &str) -> AppResult<()> {
        self.fail_import_job(job_id, message).await.map(|_| ())
    }

    async fn get(&self, job_id: Uuid) -> AppResult<Option<ImportJob>> {
        Ok(self.get_import_job(job_id).await?.map(ImportJob::from))
    }
}
