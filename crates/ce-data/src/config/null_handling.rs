//! Null value handling for data loading

use serde::{Serialize, Deserialize};

/// Null value configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Cell contents treated as null
    pub patterns: Vec<String>,
    
    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,
    
    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: vec![String::new()],
            trim_whitespace: false,
            case_sensitive: true,
        }
    }
}

impl NullConfig {
    /// Check if a cell should become null
    pub fn is_null(&self, cell: &str) -> bool {
        let cell = if self.trim_whitespace { cell.trim() } else { cell };
        let same = |pattern: &String| match self.case_sensitive {
            true => cell == pattern,
            false => cell.eq_ignore_ascii_case(pattern),
        };
        self.patterns.iter().any(same)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_default_only_empty_is_null() {
        let config = NullConfig::default();
        assert!(config.is_null(""));
        assert!(!config.is_null(" "));
        assert!(!config.is_null("NULL"));
    }
    
    #[test]
    fn test_custom_patterns() {
        let config = NullConfig {
            patterns: vec![String::new(), "n/a".to_string()],
            trim_whitespace: true,
            case_sensitive: false,
        };
        
        assert!(config.is_null("  N/A "));
        assert!(config.is_null("   "));
        assert!(!config.is_null("na"));
    }
}
