//! The editable chart document

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised when a state payload cannot be applied
#[derive(Error, Debug)]
pub enum StateError {
    #[error("State must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    
    #[error("Malformed state: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Plot specification, layout and animation frames of one chart.
///
/// Keys other than the three well-known ones are kept verbatim so a host
/// can store its own bookkeeping next to the chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Trace list
    #[serde(default)]
    pub data: Vec<Value>,
    
    #[serde(default)]
    pub layout: Map<String, Value>,
    
    #[serde(default)]
    pub frames: Vec<Value>,
    
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Build a document from a JSON object
    pub fn from_value(value: Value) -> Result<Self, StateError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(StateError::NotAnObject(kind_of(&other))),
        }
    }
    
    pub fn from_map(map: Map<String, Value>) -> Result<Self, StateError> {
        Ok(serde_json::from_value(Value::Object(map))?)
    }
    
    /// Flatten into a single JSON object, well-known keys first
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("data".to_string(), Value::Array(self.data.clone()));
        map.insert("layout".to_string(), Value::Object(self.layout.clone()));
        map.insert("frames".to_string(), Value::Array(self.frames.clone()));
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }
    
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
    
    /// Shallow merge: top-level keys of `patch` overwrite ours.
    ///
    /// The document is left untouched if the merged result is malformed.
    pub fn merge(&mut self, patch: Map<String, Value>) -> Result<(), StateError> {
        let mut merged = self.to_map();
        merged.extend(patch);
        *self = Self::from_map(merged)?;
        Ok(())
    }
}

/// Short name of a JSON value's type for error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
