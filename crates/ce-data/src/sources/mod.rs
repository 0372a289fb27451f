//! Table and document sources

pub mod csv_source;
pub mod json_source;

pub use csv_source::parse_table;
pub use json_source::parse_document;

use ce_core::{ColumnSet, Document};
use crate::DataError;

/// Where a table or document comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Remote URL, `file://` URL or local path
    Url(String),
    
    /// In-memory file, e.g. one picked in a file dialog
    Blob { name: String, bytes: Vec<u8> },
}

/// Format of a source, decided from its file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

/// Result of a successful load
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// A saved chart that replaces the document
    Document(Document),
    
    /// A table that replaces the data sources
    Table(ColumnSet),
}

impl Source {
    /// URL or file name of the source
    pub fn name(&self) -> &str {
        match self {
            Source::Url(url) => url,
            Source::Blob { name, .. } => name,
        }
    }
    
    pub fn format(&self) -> Result<Format, DataError> {
        classify(self.name())
    }
}

/// Decide the format from the last path segment, ignoring any query string
/// or fragment. A name without an extension is read as CSV.
pub fn classify(name: &str) -> Result<Format, DataError> {
    let path = name.split(['?', '#']).next().unwrap_or_default();
    
    // Skip the authority so `https://example.com` is not read as a `.com` file
    let path = match path.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or_default(),
        None => path,
    };
    let file_name = path.rsplit('/').next().unwrap_or_default();
    
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => {
            match extension.to_ascii_lowercase().as_str() {
                "csv" => Ok(Format::Csv),
                "json" => Ok(Format::Json),
                _ => Err(DataError::UnsupportedFormat {
                    extension: extension.to_string(),
                }),
            }
        }
        _ => Ok(Format::Csv),
    }
}
