use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One successful poll of a federated source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Wall-clock time the fetch completed.
    pub timestamp: DateTime<Utc>,
    /// The records returned by the source, normalised to a sequence.
    pub payload: Vec<Value>,
}
