use csv::ReaderBuilder;
use serde_json::{Number, Value};
use tracing::{debug, warn};

use ce_core::ColumnSet;
use crate::config::LoaderConfig;
use crate::DataError;

/// Parse delimited text with a header row into columns.
///
/// Rows are transposed as they are read. A row shorter than the header only
/// extends the columns it has values for; fields past the header are dropped.
pub fn parse_table(bytes: &[u8], config: &LoaderConfig) -> Result<ColumnSet, DataError> {
    let delimiter = u8::try_from(config.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| DataError::table_load(format!("delimiter {:?} is not a single ASCII character", config.delimiter)))?;
    
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);
    
    let headers = csv_reader.headers()?.clone();
    let mut columns = ColumnSet::new();
    let mut dropped_fields = 0usize;
    let mut row_count = 0usize;
    
    for result in csv_reader.records() {
        let record = result?;
        row_count += 1;
        
        if record.len() > headers.len() {
            dropped_fields += record.len() - headers.len();
        }
        
        // Duplicate header names behave like repeated object keys: last value wins
        let mut row: Vec<(&str, Value)> = Vec::with_capacity(record.len());
        for (name, raw) in headers.iter().zip(record.iter()) {
            let value = infer_value(raw, config);
            match row.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value,
                None => row.push((name, value)),
            }
        }
        for (name, value) in row {
            columns.push(name, value);
        }
    }
    
    if dropped_fields > 0 {
        warn!(dropped_fields, "ignored fields beyond the header row");
    }
    debug!(rows = row_count, columns = columns.len(), "parsed table");
    
    Ok(columns)
}

/// Infer a typed value for one cell
fn infer_value(raw: &str, config: &LoaderConfig) -> Value {
    if !config.dynamic_typing {
        return Value::String(raw.to_string());
    }
    if config.null_config.is_null(raw) {
        return Value::Null;
    }
    
    // Surrounding whitespace is ignored for both booleans and numbers
    let trimmed = raw.trim();
    match trimmed {
        "true" | "TRUE" => return Value::Bool(true),
        "false" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    
    if looks_numeric(trimmed) {
        if let Ok(int) = trimmed.parse::<i64>() {
            return Value::from(int);
        }
        if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }
    
    Value::String(raw.to_string())
}

/// Only plain decimal notation counts; `f64::from_str` would also accept
/// `inf` and `NaN`.
fn looks_numeric(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
}
