use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use tunepeek_core::{decode_results, urls, CatalogConfig, SearchError, Track};
use url::Url;

pub use http::HttpTransport;

mod http;

/// Anything that can answer catalog queries.
///
/// The controller only ever talks to this trait, so tests can hand it a
/// scripted implementation instead of a real network client.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, term: &str) -> Result<Vec<Track>, SearchError>;
    async fn lookup(&self, id: i64) -> Result<Vec<Track>, SearchError>;
}

/// Raw byte fetcher underneath [`CatalogGateway`].
///
/// Implementations map every connectivity problem and every non-success
/// status to [`SearchError::Network`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, SearchError>;
}

/// Builds catalog URLs, fetches them through a [`Transport`] and decodes the body.
pub struct CatalogGateway<T> {
    cfg: CatalogConfig,
    transport: T,
}

impl<T: Transport> CatalogGateway<T> {
    pub fn new(cfg: CatalogConfig, transport: T) -> Self {
        Self { cfg, transport }
    }

    async fn fetch(&self, url: Url) -> Result<Vec<Track>, SearchError> {
        let body = self.transport.get(&url).await?;
        let tracks = decode_results(&body)?;
        debug!(url = %url, count = tracks.len(), "catalog response decoded");
        Ok(tracks)
    }
}

#[async_trait]
impl<T: Transport> SearchGateway for CatalogGateway<T> {
    fn name(&self) -> &'static str {
        "itunes"
    }

    async fn search(&self, term: &str) -> Result<Vec<Track>, SearchError> {
        let url = urls::search_url(&self.cfg, term)?;
        self.fetch(url).await
    }

    async fn lookup(&self, id: i64) -> Result<Vec<Track>, SearchError> {
        let url = urls::lookup_url(&self.cfg, id)?;
        self.fetch(url).await
    }
}

pub fn build_gateway(cfg: &CatalogConfig) -> Result<CatalogGateway<HttpTransport>, SearchError> {
    let transport = HttpTransport::new(Duration::from_millis(cfg.request_timeout_ms))?;
    Ok(CatalogGateway::new(cfg.clone(), transport))
}
