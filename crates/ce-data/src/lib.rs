//! Data loading for the chart editor
//!
//! Turns CSV tables and saved chart documents, fetched from a URL or handed
//! over in memory, into the column sets and documents the editor works on.

pub mod config;
pub mod fetch;
pub mod loader;
pub mod sources;

use thiserror::Error;

// Re-exports
pub use config::{LoaderConfig, NullConfig};
pub use fetch::{Fetcher, HttpFetcher};
pub use loader::TableLoader;
pub use sources::{Format, Loaded, Source};

/// Errors that can occur while loading a table or document
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to load the table: {reason}")]
    TableLoad { reason: String },
    
    #[error("Invalid document format: {reason}")]
    InvalidDocumentFormat { reason: String },
    
    #[error("Unsupported file extension `.{extension}`, only .json and .csv are supported")]
    UnsupportedFormat { extension: String },
}

impl DataError {
    pub fn table_load(reason: impl ToString) -> Self {
        DataError::TableLoad { reason: reason.to_string() }
    }
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        DataError::table_load(error)
    }
}

impl From<std::io::Error> for DataError {
    fn from(error: std::io::Error) -> Self {
        DataError::table_load(error)
    }
}

impl From<reqwest::Error> for DataError {
    fn from(error: reqwest::Error) -> Self {
        DataError::table_load(error)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::table_load(error)
    }
}
