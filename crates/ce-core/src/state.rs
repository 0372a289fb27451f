//! Application state management

use serde_json::Value;
use tracing::debug;

use crate::columns::{ColumnSet, DataSourceOption};
use crate::document::{kind_of, Document, StateError};

const DATA_SOURCES_KEY: &str = "dataSources";
const DATA_SOURCE_OPTIONS_KEY: &str = "dataSourceOptions";

/// The editor's state: the chart document plus the data-source catalogue
/// it draws columns from.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    document: Document,
    data_sources: ColumnSet,
    data_source_options: Vec<DataSourceOption>,
}

impl AppState {
    /// Create a new application state with the given data sources
    pub fn new(data_sources: ColumnSet) -> Self {
        let data_source_options = data_sources.options();
        Self {
            document: Document::default(),
            data_sources,
            data_source_options,
        }
    }
    
    pub fn document(&self) -> &Document {
        &self.document
    }
    
    pub fn data_sources(&self) -> &ColumnSet {
        &self.data_sources
    }
    
    pub fn data_source_options(&self) -> &[DataSourceOption] {
        &self.data_source_options
    }
    
    /// Current state as a JSON object
    pub fn snapshot(&self) -> Value {
        self.document.to_value()
    }
    
    /// Replace the document wholesale
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
    }
    
    /// Shallow-merge a partial state object into the document
    pub fn merge_state(&mut self, patch: Value) -> Result<(), StateError> {
        match patch {
            Value::Object(map) => self.document.merge(map),
            other => Err(StateError::NotAnObject(kind_of(&other))),
        }
    }
    
    /// Apply an edit coming back from the editor widget
    pub fn apply_edit(&mut self, data: Vec<Value>, layout: serde_json::Map<String, Value>, frames: Vec<Value>) {
        self.document.data = data;
        self.document.layout = layout;
        self.document.frames = frames;
    }
    
    /// Replace the data sources and regenerate the option list from column names
    pub fn set_data_sources(&mut self, data_sources: ColumnSet) {
        self.data_source_options = data_sources.options();
        self.data_sources = data_sources;
    }
    
    /// Replace state from a host snapshot.
    ///
    /// `dataSources` and `dataSourceOptions` are lifted out of the snapshot
    /// into the catalogue and never stored inside the document. A missing or
    /// null `dataSources` empties the catalogue; missing or null options are
    /// regenerated from column names. Nothing changes if any part is
    /// malformed.
    pub fn apply_host_snapshot(&mut self, snapshot: Value) -> Result<(), StateError> {
        let mut map = match snapshot {
            Value::Object(map) => map,
            other => return Err(StateError::NotAnObject(kind_of(&other))),
        };
        
        let data_sources: ColumnSet = match map.remove(DATA_SOURCES_KEY).filter(|v| !v.is_null()) {
            Some(value) => serde_json::from_value(value)?,
            None => ColumnSet::new(),
        };
        let options: Option<Vec<DataSourceOption>> = map
            .remove(DATA_SOURCE_OPTIONS_KEY)
            .filter(|v| !v.is_null())
            .map(serde_json::from_value)
            .transpose()?;
        let document = Document::from_map(map)?;
        
        debug!(
            columns = data_sources.len(),
            explicit_options = options.is_some(),
            "applying host snapshot"
        );
        
        self.document = document;
        self.data_source_options = options.unwrap_or_else(|| data_sources.options());
        self.data_sources = data_sources;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    
    #[test]
    fn test_host_snapshot_extracts_data_sources() {
        let mut state = AppState::new(ColumnSet::demo());
        state
            .apply_host_snapshot(json!({
                "dataSources": {"a": [1]},
                "plotSpec": [{"type": "bar"}],
            }))
            .unwrap();
        
        let snapshot = state.snapshot();
        assert!(snapshot.get("dataSources").is_none());
        assert_eq!(snapshot["plotSpec"], json!([{"type": "bar"}]));
        assert_eq!(state.data_sources().get("a"), Some(&[json!(1)][..]));
        assert_eq!(state.data_source_options(), &[DataSourceOption::for_column("a")]);
    }
    
    #[test]
    fn test_host_snapshot_keeps_explicit_options() {
        let mut state = AppState::default();
        state
            .apply_host_snapshot(json!({
                "dataSources": {"a": [1], "b": [2]},
                "dataSourceOptions": [{"value": "b", "label": "Column B"}],
            }))
            .unwrap();
        
        assert!(state.snapshot().get("dataSourceOptions").is_none());
        assert_eq!(state.data_source_options().len(), 1);
        assert_eq!(state.data_source_options()[0].label, "Column B");
    }
    
    #[test]
    fn test_host_snapshot_without_sources_clears_catalogue() {
        let mut state = AppState::new(ColumnSet::demo());
        state.apply_host_snapshot(json!({"data": []})).unwrap();
        
        assert!(state.data_sources().is_empty());
        assert!(state.data_source_options().is_empty());
    }
    
    #[test]
    fn test_null_sources_count_as_absent() {
        let mut state = AppState::new(ColumnSet::demo());
        state
            .apply_host_snapshot(json!({"data": [], "dataSources": null, "dataSourceOptions": null}))
            .unwrap();
        
        assert!(state.data_sources().is_empty());
        assert!(state.data_source_options().is_empty());
        assert!(state.snapshot().get("dataSources").is_none());
        
        state
            .apply_host_snapshot(json!({"dataSources": {"a": [1]}, "dataSourceOptions": null}))
            .unwrap();
        assert_eq!(state.data_source_options(), &[DataSourceOption::for_column("a")]);
    }
    
    #[test]
    fn test_malformed_snapshot_changes_nothing() {
        let mut state = AppState::new(ColumnSet::demo());
        let result = state.apply_host_snapshot(json!({
            "dataSources": {"a": [1]},
            "data": {"not": "a list"},
        }));
        
        assert!(result.is_err());
        assert_eq!(state.data_sources(), &ColumnSet::demo());
    }
    
    #[test]
    fn test_merge_state_keeps_catalogue() {
        let mut state = AppState::new(ColumnSet::demo());
        state.merge_state(json!({"layout": {"title": "x"}})).unwrap();
        
        assert_eq!(state.document().layout.get("title"), Some(&json!("x")));
        assert_eq!(state.data_sources().len(), 3);
    }
    
    #[test]
    fn test_merge_state_rejects_non_object() {
        let mut state = AppState::default();
        assert!(matches!(state.merge_state(json!(3)), Err(StateError::NotAnObject("a number"))));
    }
}
