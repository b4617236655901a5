//! Import job domain models and DTOs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::import_job;

/// One CSV data row: header name to raw cell value.
pub type RawRow = BTreeMap<String, String>;

/// Import job status.
///
/// `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Upload accepted, file not read yet.
    Pending,
    /// Row count known, rows being imported.
    Processing,
    /// Every row was attempted.
    Completed,
    /// The file could not be imported at all.
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error recorded against a job.
///
/// Row errors carry the 1-based row index and the raw row. A job-level
/// failure carries only a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RowError {
    pub row: Option<usize>,
    pub message: String,
    pub data: Option<RawRow>,
}

impl RowError {
    pub fn for_row(row: usize, message: impl Into<String>, data: RawRow) -> Self {
        Self {
            row: Some(row),
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn job_level(message: impl Into<String>) -> Self {
        Self {
            row: None,
            message: message.into(),
            data: None,
        }
    }
}

/// Running counters for one import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobProgress {
    pub processed: u64,
    pub failed: u64,
    pub errors: Vec<RowError>,
}

impl JobProgress {
    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_failure(&mut self, error: RowError) {
        self.failed += 1;
        self.errors.push(error);
    }

    /// Rows attempted so far.
    pub fn attempted(&self) -> u64 {
        self.processed + self.failed
    }
}

/// Job snapshot returned by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    /// Job UUID.
    pub id: Uuid,
    pub status: JobStatus,
    pub total_rows: u64,
    pub processed_rows: u64,
    pub failed_rows: u64,
    pub errors: Vec<RowError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<import_job::Model> for ImportJob {
    fn from(m: import_job::Model) -> Self {
        let status = JobStatus::parse(&m.status).unwrap_or_else(|| {
            warn!(
                "Import job {} has unknown status '{}', reporting as failed",
                m.id, m.status
            );
            JobStatus::Failed
        });

        let errors: Vec<RowError> = serde_json::from_value(m.errors).unwrap_or_else(|e| {
            warn!("Import job {} has unreadable errors column: {}", m.id, e);
            Vec::new()
        });

        Self {
            id: m.id,
            status,
            total_rows: m.total_rows.max(0) as u64,
            processed_rows: m.processed_rows.max(0) as u64,
            failed_rows: m.failed_rows.max(0) as u64,
            errors,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Response after accepting a CSV upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub job_id: Uuid,
}
