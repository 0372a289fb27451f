//! Table and document loading

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::LoaderConfig;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::sources::{parse_document, parse_table, Format, Loaded, Source};
use crate::DataError;

/// Loads CSV tables and saved chart documents.
///
/// The format is decided from the source name before any I/O happens, so an
/// unsupported file is rejected without being fetched.
pub struct TableLoader {
    fetcher: Arc<dyn Fetcher>,
    config: LoaderConfig,
}

impl TableLoader {
    /// Create a loader backed by [`HttpFetcher`]
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()), config)
    }
    
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, config: LoaderConfig) -> Self {
        Self { fetcher, config }
    }
    
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
    
    /// Load a source into a table or a document
    pub async fn load(&self, source: &Source) -> Result<Loaded, DataError> {
        let format = source.format()?;
        let bytes = match source {
            Source::Url(url) => self.fetcher.fetch(url).await?,
            Source::Blob { bytes, .. } => bytes.clone(),
        };
        
        let loaded = match format {
            Format::Json => Loaded::Document(parse_document(&bytes)?),
            Format::Csv => Loaded::Table(parse_table(&bytes, &self.config)?),
        };
        
        match &loaded {
            Loaded::Document(doc) => info!(source = source.name(), traces = doc.data.len(), "loaded chart document"),
            Loaded::Table(columns) => info!(source = source.name(), columns = columns.len(), "loaded table"),
        }
        Ok(loaded)
    }
    
    /// Like [`TableLoader::load`], logging the failure before returning it
    pub async fn load_logged(&self, source: &Source) -> Result<Loaded, DataError> {
        self.load(source).await.map_err(|e| {
            warn!(source = source.name(), error = %e, "load failed");
            e
        })
    }
}
