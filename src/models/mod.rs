//! Domain models for the NGO impact server.

pub mod auth;
pub mod import_job;
pub mod report;

// Re-export commonly used types
pub use auth::{AuthenticatedAdmin, LoginRequest, LoginResponse, SessionClaims};
pub use import_job::{ImportJob, JobProgress, JobStatus, RawRow, RowError, UploadResponse};
pub use report::{
    DashboardQuery, DashboardResponse, DashboardStats, NewReport, Region, Report,
    SubmitReportRequest, SubmitReportResponse,
};

/// Maximum number of reports returned for a single import job.
pub const JOB_REPORTS_LIMIT: u64 = 100;
