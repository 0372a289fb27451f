//! Main application entry point

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ce_app::{EditorApp, EditorConfig, HeadlessShell, LaunchParams};
use ce_bridge::{Embedding, LineTransport};

/// Environment variable naming an optional JSON configuration file
const CONFIG_ENV: &str = "CHART_EDITOR_CONFIG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the host bridge
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => EditorConfig::from_file(&PathBuf::from(path))?,
        None => EditorConfig::default(),
    };
    
    // First argument is the launch URL or query, e.g. `?load=data.csv`
    let params = std::env::args()
        .nth(1)
        .map(|arg| LaunchParams::from_query(&arg))
        .unwrap_or_default();
    
    // A host that spawned us owns our stdin; a terminal means we are top-level
    let embedding = if std::io::stdin().is_terminal() {
        Embedding::TopLevel
    } else {
        Embedding::Framed(Box::new(LineTransport::stdio()))
    };
    
    info!(embedded = embedding.is_embedded(), load = ?params.load, "starting chart editor");
    
    let app = Arc::new(EditorApp::new(config, Arc::new(HeadlessShell)));
    let served = app.launch(&params, embedding).await?;
    
    if !served {
        info!("running standalone, press Ctrl+C to quit");
        tokio::signal::ctrl_c().await?;
    }
    
    Ok(())
}
