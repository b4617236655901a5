//! End-to-end test suite.
//!
//! Runs the import pipeline and the HTTP API against a throwaway SQLite
//! database per test. No external services are needed.
//!
//! Run with: cargo test --test e2e


mod test_api_auth;
mod test_api_jobs;
mod test_import_pipeline;
