use crate::Transport;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use tunepeek_core::SearchError;
use url::Url;

const USER_AGENT: &str = concat!("tunepeek/", env!("CARGO_PKG_VERSION"));

/// Production transport: a plain reqwest client with a request timeout.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| SearchError::Network(format!("failed to build http client: {err}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, SearchError> {
        debug!(url = %url, "catalog request");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| SearchError::Network(err.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Network(format!("unexpected status {status}")));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|err| SearchError::Network(format!("failed reading body: {err}")))?;
        Ok(body.to_vec())
    }
}
