//! Domain error types for the NGO impact server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Local file system operation failed (upload spooling, cleanup)
    #[error("File system error: {0}")]
    FileSystem(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code, response_message) = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            AppError::InvalidInput(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
            AppError::Unauthorized(_) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
            ),
            AppError::FileSystem(err_str) => {
                tracing::error!("File system error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "FILE_SYSTEM_ERROR",
                    "An internal file system error occurred".to_string(),
                )
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Invalid UUID: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystem(err.to_string())
    }
}

/// Errors raised while importing a CSV file.
///
/// `Stream` and `Tracker` are fatal to a job. `Validation` and `StoreWrite`
/// are recorded against the offending row and processing continues.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The source file could not be opened or read.
    #[error("Failed to read CSV: {0}")]
    Stream(String),

    /// A row is missing a required field or carries an invalid value.
    #[error("{0}")]
    Validation(String),

    /// The report store rejected the write.
    #[error("Failed to save report: {0}")]
    StoreWrite(String),

    /// Job progress could not be recorded.
    #[error("Failed to update job: {0}")]
    Tracker(String),
}

impl ImportError {
    /// Message recorded on a failed job.
    ///
    /// Job status is served without authentication, so I/O and database
    /// details stay in the logs.
    pub fn job_message(&self) -> String {
        match self {
            ImportError::Stream(_) => "Failed to read CSV file".to_string(),
            ImportError::Validation(msg) => msg.clone(),
            ImportError::StoreWrite(_) => "Failed to save report".to_string(),
            ImportError::Tracker(_) => "Failed to update job".to_string(),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Stream(err.to_string())
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Validation(msg) => AppError::InvalidInput(msg),
            ImportError::Stream(msg) => AppError::FileSystem(msg),
            ImportError::StoreWrite(msg) | ImportError::Tracker(msg) => AppError::Database(msg),
        }
    }
}
