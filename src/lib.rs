//! # vacancydb - HeadHunter vacancy loader
//!
//! Pulls vacancy and employer listings for a fixed set of employers from the
//! HeadHunter job-board API and answers a handful of analytical queries.
//!
//! vacancydb provides:
//! - A blocking API client behind the [`JobSource`] trait
//! - JSON checkpoint files between fetch and load
//! - SQLite schema management with an employers/vacancies foreign key
//! - A query service and an interactive menu over the loaded tables

pub mod record;
pub mod client;
pub mod storage;
pub mod query;
pub mod pipeline;
pub mod menu;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use record::{Employer, Vacancy, normalize_salary};
pub use client::{HeadHunterClient, JobSource};
pub use storage::{JsonSaver, SchemaManager};
pub use query::QueryService;
pub use pipeline::Pipeline;

/// Result type alias for vacancydb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vacancydb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed {kind} record: {source}")]
    Record {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected API response from {url}: {reason}")]
    Api { url: String, reason: String },
}
