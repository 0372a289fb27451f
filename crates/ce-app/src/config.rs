//! Editor configuration and launch parameters

use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ce_bridge::DEFAULT_SESSION_NAME;
use ce_data::LoaderConfig;

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Name announced to the host during the handshake
    pub session_name: String,
    
    /// Options handed to the chart widget
    pub plot: PlotConfig,
    
    /// Table parsing settings
    pub loader: LoaderConfig,
    
    /// Seed the demo columns when nothing is loaded at startup
    pub seed_demo_data: bool,
}

/// Options handed to the chart widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub editable: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            session_name: DEFAULT_SESSION_NAME.to_string(),
            plot: PlotConfig::default(),
            loader: LoaderConfig::default(),
            seed_demo_data: true,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self { editable: true }
    }
}

impl EditorConfig {
    /// Read a configuration file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Parameters the editor was launched with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    /// Table or document to load at startup
    pub load: Option<String>,
}

impl LaunchParams {
    /// Read parameters from a launch URL or a bare query string
    /// (`?load=data.csv`). An empty `load` counts as absent.
    pub fn from_query(input: &str) -> Self {
        let query = match input.split_once('?') {
            Some((_, query)) => query,
            None => input,
        };
        let query = query.split('#').next().unwrap_or_default();
        
        let load = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "load")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());
        
        Self { load }
    }
}
