use crate::traits::{MediaManifest, MediaStore, NewMedia, StorageError, StorageResult, StoredMedia};
use crate::StorageBackend;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory storage implementation
///
/// Records live for the lifetime of the value (and its clones). Useful for
/// tests and for running the pipeline without a persistent backend.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    records: Arc<RwLock<HashMap<Uuid, StoredMedia>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record, bypassing `put` validation. Lets callers
    /// seed records in states `put` would never produce (e.g. no thumbnail).
    pub fn insert(&self, media: StoredMedia) {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.insert(media.manifest.id, media);
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MediaStore for MemoryStorage {
    async fn put(&self, media: NewMedia) -> StorageResult<MediaManifest> {
        media.check()?;

        let id = Uuid::new_v4();
        let stored = media.into_stored(id, Utc::now());
        let manifest = stored.manifest.clone();

        self.insert(stored);
        tracing::debug!(media_id = %id, kind = %manifest.kind, "Memory storage put successful");

        Ok(manifest)
    }

    async fn get(&self, id: Uuid) -> StorageResult<StoredMedia> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    async fn manifest(&self, id: Uuid) -> StorageResult<MediaManifest> {
        self.get(id).await.map(|media| media.manifest)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&id))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
