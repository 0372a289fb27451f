//! Loader configuration

pub mod null_handling;

pub use null_handling::*;

use serde::{Deserialize, Serialize};

/// Settings for parsing delimited tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Field delimiter; must be a single ASCII character
    pub delimiter: char,
    
    /// Convert numeric and boolean cells to typed values
    pub dynamic_typing: bool,
    
    /// Null handling configuration
    pub null_config: NullConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            dynamic_typing: true,
            null_config: NullConfig::default(),
        }
    }
}
