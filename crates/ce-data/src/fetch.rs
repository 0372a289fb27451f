//! Fetching source bytes

use std::path::Path;
use async_trait::async_trait;
use tracing::debug;

use crate::DataError;

/// Capability to read the bytes behind a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DataError>;
}

/// Fetches `http(s)://` URLs over the network and reads `file://` URLs and
/// bare paths from disk.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DataError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            debug!(url, "fetching over http");
            let response = self.client.get(url).send().await?.error_for_status()?;
            return Ok(response.bytes().await?.to_vec());
        }
        
        let path = url.strip_prefix("file://").unwrap_or(url);
        let path = path.split(['?', '#']).next().unwrap_or_default();
        debug!(path, "reading local file");
        tokio::fs::read(Path::new(path))
            .await
            .map_err(|e| DataError::table_load(format!("{}: {}", path, e)))
    }
}
