use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::backend::{StoreBackend, StoreResult};

/// Typed view over a [`StoreBackend`]: every collection is a JSON array of
/// records. Updates are read-modify-write without locking, matching the
/// traffic of a single small event site; the last writer wins.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn StoreBackend>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    /// Loads all records of a collection. A missing or unparsable collection
    /// reads as empty so a wiped or hand-edited data file never takes the
    /// site down.
    pub async fn load<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<T>> {
        let Some(contents) = self.backend.read(collection).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&contents) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!("collection {} is not valid JSON, treating as empty: {}", collection, err);
                Ok(Vec::new())
            }
        }
    }

    pub async fn save<T: Serialize>(&self, collection: &str, records: &[T]) -> StoreResult<()> {
        let contents = serde_json::to_string_pretty(records)?;
        self.backend.write(collection, &contents).await
    }

    pub async fn append<T: Serialize>(&self, collection: &str, record: &T) -> StoreResult<()> {
        let mut records: Vec<serde_json::Value> = self.load(collection).await?;
        records.push(serde_json::to_value(record)?);
        self.save(collection, &records).await
    }

    /// Removes the record whose `id` field equals `id`. Returns `false`
    /// without rewriting the collection when no record matches.
    pub async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let records: Vec<serde_json::Value> = self.load(collection).await?;
        let remaining: Vec<serde_json::Value> = records
            .iter()
            .filter(|record| record.get("id").and_then(|v| v.as_str()) != Some(id))
            .cloned()
            .collect();
        if remaining.len() == records.len() {
            return Ok(false);
        }
        self.save(collection, &remaining).await?;
        Ok(true)
    }
}
