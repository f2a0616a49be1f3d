//! Durable keyed collections backing the catalog.
//!
//! The core only relies on "insert a record, get an id back" and "read every
//! record of a collection"; `SqliteCatalogStore` is the implementation wired
//! in `main.rs`.

mod sqlite;

pub use sqlite::SqliteCatalogStore;

use crate::error::StoreError;
use serde_json::Value;

/// Collection holding registered connection descriptors.
pub const CATALOG_ROUTES: &str = "catalog_routes";
/// Collection receiving rows committed through bulk federation.
pub const FEDERATED_RECORDS: &str = "federated_records";

/// A record read back from a collection, with the id assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub body: Value,
}

pub trait CatalogStore: Send + Sync {
    /// Stores `record` in `collection` and returns its newly assigned id.
    fn insert(&self, collection: &str, record: &Value) -> Result<String, StoreError>;

    /// Stores all `records` atomically and returns how many were written.
    fn insert_many(&self, collection: &str, records: &[Value]) -> Result<usize, StoreError>;

    /// Every record of `collection`, in insertion order.
    fn query_all(&self, collection: &str) -> Result<Vec<StoredRecord>, StoreError>;
}
