//! Connection setup: validate the operator's draft, preview the source with a
//! one-shot fetch, and record the descriptor in the catalog.

use crate::error::{FederationError, StoreError};
use crate::fetcher::SourceFetcher;
use crate::store::{CatalogStore, StoredRecord, CATALOG_ROUTES};
use chrono::{DateTime, Utc};
use common::model::connection::{ConnectionDescriptor, ConnectionKind, SourceDraft};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `catalog_routes` record; the id lives in the store key.
#[derive(Serialize, Deserialize)]
struct CatalogEntry {
    #[serde(flatten)]
    draft: SourceDraft,
    registered_at: DateTime<Utc>,
    record_count: usize,
}

/// A validated draft together with the records its preview fetch returned.
#[derive(Debug, Clone)]
pub struct SourcePreview {
    draft: SourceDraft,
    records: Vec<Value>,
}

impl SourcePreview {
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Value> {
        self.records
    }
}

/// Trims the draft and rejects it if a required field is blank or the
/// connection kind has no fetcher.
pub fn validate(mut draft: SourceDraft) -> Result<SourceDraft, FederationError> {
    draft.url = draft.url.trim().to_string();
    draft.name = draft.name.trim().to_string();
    draft.description = draft.description.trim().to_string();

    let required = [
        ("url", &draft.url),
        ("name", &draft.name),
        ("description", &draft.description),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(FederationError::Validation { field: *field });
    }
    if draft.connection_kind != ConnectionKind::RestApi {
        return Err(FederationError::UnsupportedConnection(draft.connection_kind));
    }
    Ok(draft)
}

pub async fn preview_source(
    fetcher: &dyn SourceFetcher,
    draft: SourceDraft,
) -> Result<SourcePreview, FederationError> {
    let draft = validate(draft)?;
    let records = fetcher.fetch(&draft.url).await?;
    info!("preview of {} returned {} records", draft.url, records.len());
    Ok(SourcePreview { draft, records })
}

pub fn register_preview(
    store: &dyn CatalogStore,
    preview: SourcePreview,
) -> Result<ConnectionDescriptor, FederationError> {
    let entry = CatalogEntry {
        record_count: preview.records().len(),
        draft: preview.draft,
        registered_at: Utc::now(),
    };
    let body = serde_json::to_value(&entry).map_err(StoreError::from)?;
    let id = store.insert(CATALOG_ROUTES, &body)?;
    info!("registered {} as {}", entry.draft.name, id);
    Ok(ConnectionDescriptor::new(
        id,
        entry.draft,
        entry.record_count,
        entry.registered_at,
    ))
}

pub fn list_sources(
    store: &dyn CatalogStore,
) -> Result<Vec<ConnectionDescriptor>, FederationError> {
    store
        .query_all(CATALOG_ROUTES)?
        .into_iter()
        .map(descriptor_from_record)
        .collect()
}

pub fn find_source(
    store: &dyn CatalogStore,
    id: &str,
) -> Result<ConnectionDescriptor, FederationError> {
    list_sources(store)?
        .into_iter()
        .find(|descriptor| descriptor.id() == id)
        .ok_or_else(|| FederationError::UnknownSource(id.to_string()))
}

fn descriptor_from_record(record: StoredRecord) -> Result<ConnectionDescriptor, FederationError> {
    let entry: CatalogEntry = serde_json::from_value(record.body).map_err(StoreError::from)?;
    Ok(ConnectionDescriptor::new(
        record.id,
        entry.draft,
        entry.record_count,
        entry.registered_at,
    ))
}
