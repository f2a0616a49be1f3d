//! One-shot fetch of a federated source.
//!
//! Registration previews and every polling tick go through [`SourceFetcher`],
//! which always yields a sequence of records: an array body is returned as-is
//! and any other JSON value is wrapped into a one-element sequence.

mod http;
#[cfg(test)]
pub(crate) mod scripted;

pub use http::HttpFetcher;

use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Issues a single GET against `url` and decodes the body as JSON.
    async fn fetch(&self, url: &str) -> Result<Vec<Value>, FetchError>;
}

/// Normalises a decoded body so consumers always see a sequence of records.
pub fn normalize(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}
