use super::{normalize, SourceFetcher};
use crate::error::{ConfigError, FetchError};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

/// [`SourceFetcher`] over a shared `reqwest` client.
///
/// The client is built once with a request timeout and reused for every
/// preview and tick so connections are pooled per source host.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("federation/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<Value>, FetchError> {
        let response = self.client.get(url).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status_code: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network)?;
        debug!("fetched {} bytes from {}", body.len(), url);
        let value: Value = serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            detail: e.to_string(),
        })?;
        Ok(normalize(value))
    }
}

fn network(err: reqwest::Error) -> FetchError {
    let detail = if err.is_timeout() {
        format!("timed out: {}", err)
    } else {
        err.to_string()
    };
    FetchError::Network { detail }
}
