//! SeaORM entity definitions.

pub mod import_job;
pub mod report;
