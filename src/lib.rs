//! NGO Impact Server library.
//!
//! Report submission, dashboards and the asynchronous CSV bulk import
//! pipeline, served over actix-web with a sea-orm store.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
