use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Raw persistence for one named collection. A collection holds a single
/// JSON document (an array of records); interpretation happens a layer up
/// in [`crate::storage::RecordStore`].
#[async_trait]
pub trait StoreBackend: Send + Sync + 'static {
    /// Returns the collection contents, or `None` when it has never been written.
    async fn read(&self, collection: &str) -> StoreResult<Option<String>>;
    async fn write(&self, collection: &str, contents: &str) -> StoreResult<()>;
}

/// Flat-file backend: each collection lives at `<data_dir>/<collection>.json`.
pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }
}

#[async_trait]
impl StoreBackend for FileBackend {
    async fn read(&self, collection: &str) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(collection)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, collection: &str, contents: &str) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        tokio::fs::write(self.path_for(collection), contents).await?;
        Ok(())
    }
}

/// In-memory backend for tests and local experiments.
#[derive(Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn read(&self, collection: &str) -> StoreResult<Option<String>> {
        Ok(self.collections.read().await.get(collection).cloned())
    }

    async fn write(&self, collection: &str, contents: &str) -> StoreResult<()> {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), contents.to_string());
        Ok(())
    }
}
