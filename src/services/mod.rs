//! Business logic services.

pub mod csv_parser;
pub mod import;
pub mod store;
pub mod validation;

pub use import::{run_import, spawn_import};
pub use store::{JobTracker, ReportStore};
pub use validation::{validate_row, validate_submission};
