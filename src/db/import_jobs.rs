//! Database queries for CSV import jobs.
//!
//! Every progress write replaces the counters and the error list wholesale.
//! That is only safe because each job has exactly one writer: the import task
//! that owns it.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::entity::import_job::{self, ActiveModel, Entity as ImportJob};
use crate::error::{AppError, AppResult};
use crate::models::{JobProgress, JobStatus, RowError};

use super::DbPool;

fn errors_to_json(errors: &[RowError]) -> AppResult<serde_json::Value> {
    serde_json::to_value(errors)
        .map_err(|e| AppError::Database(format!("Failed to encode job errors: {}", e)))
}

impl DbPool {
    /// Insert a new job in `pending` state.
    pub async fn insert_import_job(&self, id: Uuid) -> AppResult<import_job::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(id),
            status: Set(JobStatus::Pending.as_str().to_string()),
            total_rows: Set(0),
            processed_rows: Set(0),
            failed_rows: Set(0),
            errors: Set(serde_json::Value::Array(Vec::new())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert import job: {}", e)))?;

        Ok(result)
    }

    /// Get a job by ID.
    pub async fn get_import_job(&self, id: Uuid) -> AppResult<Option<import_job::Model>> {
        let result = ImportJob::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get import job: {}", e)))?;

        Ok(result)
    }

    /// Load a job that may still be written to.
    async fn get_open_import_job(&self, id: Uuid) -> AppResult<import_job::Model> {
        let job = self
            .get_import_job(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Import job {}", id)))?;

        if let Some(status) = JobStatus::parse(&job.status)
            && status.is_terminal()
        {
            return Err(AppError::InvalidInput(format!(
                "Import job {} is already {}",
                id, status
            )));
        }

        Ok(job)
    }

    /// Move a job to `processing` once its row count is known.
    pub async fn start_import_job(&self, id: Uuid, total_rows: u64) -> AppResult<import_job::Model> {
        let job = self.get_open_import_job(id).await?;

        let mut active: ActiveModel = job.into();
        active.status = Set(JobStatus::Processing.as_str().to_string());
        active.total_rows = Set(total_rows as i64);
        active.processed_rows = Set(0);
        active.failed_rows = Set(0);
        active.errors = Set(serde_json::Value::Array(Vec::new()));
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to start import job: {}", e)))?;

        Ok(result)
    }

    /// Replace a running job's counters and error list.
    pub async fn update_import_progress(
        &self,
        id: Uuid,
        progress: &JobProgress,
    ) -> AppResult<import_job::Model> {
        let job = self.get_open_import_job(id).await?;
        let errors = errors_to_json(&progress.errors)?;

        let mut active: ActiveModel = job.into();
        active.processed_rows = Set(progress.processed as i64);
        active.failed_rows = Set(progress.failed as i64);
        active.errors = Set(errors);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update import progress: {}", e)))?;

        Ok(result)
    }

    /// Mark a job `completed` with its final counters.
    pub async fn complete_import_job(
        &self,
        id: Uuid,
        progress: &JobProgress,
    ) -> AppResult<import_job::Model> {
        let job = self.get_open_import_job(id).await?;
        let errors = errors_to_json(&progress.errors)?;

        let mut active: ActiveModel = job.into();
        active.status = Set(JobStatus::Completed.as_str().to_string());
        active.processed_rows = Set(progress.processed as i64);
        active.failed_rows = Set(progress.failed as i64);
        active.errors = Set(errors);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to complete import job: {}", e)))?;

        Ok(result)
    }

    /// Mark a job `failed` with a single job-level error. Counters are left as they are.
    pub async fn fail_import_job(&self, id: Uuid, message: &str) -> AppResult<import_job::Model> {
        let job = self.get_open_import_job(id).await?;
        let errors = errors_to_json(&[RowError::job_level(message)])?;

        let mut active: ActiveModel = job.into();
        active.status = Set(JobStatus::Failed.as_str().to_string());
        active.errors = Set(errors);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to mark import job failed: {}", e)))?;

        Ok(result)
    }
}
