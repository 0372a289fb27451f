//! Column-oriented data sources

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column-oriented table used as the data-source catalogue for traces.
///
/// Columns keep the order in which they were first seen. They are not
/// required to have equal lengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSet {
    columns: IndexMap<String, Vec<Value>>,
}

/// Display entry for a column in the editor's data-source pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceOption {
    pub value: String,
    pub label: String,
}

impl DataSourceOption {
    /// Option whose label and value are both the column name
    pub fn for_column(name: &str) -> Self {
        Self {
            value: name.to_string(),
            label: name.to_string(),
        }
    }
}

impl ColumnSet {
    /// Create an empty column set
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Transpose row-major records into columns.
    ///
    /// Each row contributes only the fields it carries, so a short row
    /// leaves the missing columns one value shorter.
    pub fn from_rows<R, K>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut set = Self::new();
        for row in rows {
            for (name, value) in row {
                set.push(name, value);
            }
        }
        set
    }
    
    /// The three-column catalogue shown when nothing was loaded at startup
    pub fn demo() -> Self {
        let mut set = Self::new();
        set.insert_column("col1", vec![1.into(), 2.into(), 3.into()]);
        set.insert_column("col2", vec![4.into(), 3.into(), 2.into()]);
        set.insert_column("col3", vec![17.into(), 13.into(), 9.into()]);
        set
    }
    
    /// Append a value to a column, creating the column on first sight
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.entry(column.into()).or_default().push(value);
    }
    
    /// Insert or replace a whole column
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<Value>) {
        self.columns.insert(name.into(), values);
    }
    
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }
    
    /// Column names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
    
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }
    
    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
    
    /// Default option list: one entry per column, same order
    pub fn options(&self) -> Vec<DataSourceOption> {
        self.names().map(DataSourceOption::for_column).collect()
    }
}
