use super::{CatalogStore, StoredRecord};
use crate::error::StoreError;
use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS records (
        id          TEXT PRIMARY KEY,
        collection  TEXT NOT NULL,
        body        TEXT NOT NULL,
        inserted_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS records_by_collection ON records (collection);
";

/// Catalog store on a single SQLite file.
///
/// A connection is opened per operation, so the store itself is trivially
/// `Send + Sync` and can be shared by every actix worker.
pub struct SqliteCatalogStore {
    path: PathBuf,
}

impl SqliteCatalogStore {
    /// Opens (creating if needed) the database at `path` and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.connect()?.execute_batch(SCHEMA)?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn insert(&self, collection: &str, record: &Value) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let body = serde_json::to_string(record)?;
        self.connect()?.execute(
            "INSERT INTO records (id, collection, body, inserted_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, collection, body, Utc::now().to_rfc3339()],
        )?;
        Ok(id)
    }

    fn insert_many(&self, collection: &str, records: &[Value]) -> Result<usize, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records (id, collection, body, inserted_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            let inserted_at = Utc::now().to_rfc3339();
            for record in records {
                let body = serde_json::to_string(record)?;
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    collection,
                    body,
                    inserted_at
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    fn query_all(&self, collection: &str) -> Result<Vec<StoredRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT id, body FROM records WHERE collection = ?1 ORDER BY rowid")?;
        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, body)| -> Result<StoredRecord, StoreError> {
                Ok(StoredRecord {
                    id,
                    body: serde_json::from_str(&body)?,
                })
            })
            .collect()
    }
}
