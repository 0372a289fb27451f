use serde_json::Value;
use tracing::debug;

use ce_core::Document;
use crate::DataError;

/// Fields a saved chart must carry
const REQUIRED_FIELDS: [&str; 2] = ["data", "layout"];

/// Parse a saved chart. Both `data` and `layout` must be present and
/// non-null; `frames` is optional.
pub fn parse_document(bytes: &[u8]) -> Result<Document, DataError> {
    let value: Value = serde_json::from_slice(bytes)?;
    
    for field in REQUIRED_FIELDS {
        if value.get(field).map_or(true, Value::is_null) {
            return Err(DataError::InvalidDocumentFormat {
                reason: format!("missing `{}` field", field),
            });
        }
    }
    
    let document = Document::from_value(value).map_err(|e| DataError::InvalidDocumentFormat {
        reason: e.to_string(),
    })?;
    debug!(traces = document.data.len(), frames = document.frames.len(), "parsed chart document");
    
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    
    #[test]
    fn test_parses_saved_chart() {
        let doc = parse_document(br#"{"data":[{"type":"bar"}],"layout":{"title":"t"},"frames":[{}]}"#).unwrap();
        
        assert_eq!(doc.data, vec![json!({"type": "bar"})]);
        assert_eq!(doc.frames.len(), 1);
    }
    
    #[test]
    fn test_missing_layout() {
        match parse_document(br#"{"data":[]}"#) {
            Err(DataError::InvalidDocumentFormat { reason }) => assert!(reason.contains("layout")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
    
    #[test]
    fn test_wrong_shape_is_invalid_format() {
        let err = parse_document(br#"{"data":{"x":1},"layout":{}}"#).unwrap_err();
        assert!(matches!(err, DataError::InvalidDocumentFormat { .. }));
        
        let err = parse_document(b"[1,2]").unwrap_err();
        assert!(matches!(err, DataError::InvalidDocumentFormat { .. }));
    }
    
    #[test]
    fn test_malformed_json_is_a_load_error() {
        let err = parse_document(b"{not json").unwrap_err();
        assert!(matches!(err, DataError::TableLoad { .. }));
    }
}
