//! Single-shot download of the Simplestreams catalogue.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{error, info};

/// Fixed timeout for the one catalogue request of a run.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("ubuntu-image-index/", env!("CARGO_PKG_VERSION"));

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Connection failure, timeout or non-2xx status.
    #[error("An error occurred while fetching metadata from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to parse JSON response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the catalogue document comes from.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// `reqwest` backed source. One GET per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpMetadataSource {
    client: Client,
}

impl HttpMetadataSource {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Self::client_builder().timeout(timeout).build()?;
        Ok(Self::from_client(client))
    }

    /// Use a preconfigured client, e.g. one that bypasses proxies.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Builder carrying this crate's user agent.
    pub fn client_builder() -> reqwest::ClientBuilder {
        Client::builder().user_agent(USER_AGENT)
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(transport)?
            .bytes()
            .await
            .map_err(transport)?;

        serde_json::from_slice(&bytes).map_err(|source| FetchError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        info!("Fetching metadata from {url}...");

        let result = self.get_json(url).await;
        match &result {
            Ok(_) => info!("✅ Fetched metadata from {url}"),
            Err(err) => error!("❌ {err}"),
        }
        result
    }
}
