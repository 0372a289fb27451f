//! Core functionality for the chart editor
//! 
//! This crate provides the editable document, the data-source catalogue and
//! the named event bus that chart interactions are published on.

pub mod columns;
pub mod document;
pub mod events;
pub mod state;

// Re-export commonly used types
pub use columns::{ColumnSet, DataSourceOption};
pub use document::{Document, StateError};
pub use events::{handler_from_fn, normalize_payload, EventBus, EventHandler};
pub use state::AppState;
