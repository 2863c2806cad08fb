use crate::keys;
use crate::traits::{MediaManifest, MediaStore, NewMedia, StorageError, StorageResult, StoredMedia};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for record storage (e.g., "/var/lib/folio")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(storage_key))
    }

    async fn write_file(&self, storage_key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    async fn read_file(&self, storage_key: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.key_to_path(storage_key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl MediaStore for LocalStorage {
    async fn put(&self, media: NewMedia) -> StorageResult<MediaManifest> {
        media.check()?;

        let id = Uuid::new_v4();
        let start = std::time::Instant::now();
        let stored = media.into_stored(id, Utc::now());

        let result = async {
            self.write_file(&keys::artifact_key(id, keys::ORIGINAL), &stored.data)
                .await?;
            if let Some(thumbnail) = &stored.thumbnail {
                self.write_file(&keys::artifact_key(id, keys::THUMBNAIL), thumbnail)
                    .await?;
            }
            // Manifest last: a record without one is treated as absent.
            let manifest = serde_json::to_vec_pretty(&stored.manifest)?;
            self.write_file(&keys::artifact_key(id, keys::MANIFEST), &manifest)
                .await
        }
        .await;

        if let Err(e) = result {
            tracing::error!(media_id = %id, error = %e, "Local storage write failed, removing partial record");
            if let Err(cleanup) = self.delete(id).await {
                tracing::warn!(
                    media_id = %id,
                    error = %cleanup,
                    "Partial record left behind after failed write"
                );
            }
            return Err(e);
        }

        tracing::info!(
            media_id = %id,
            kind = %stored.manifest.kind,
            size_bytes = stored.manifest.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage put successful"
        );

        Ok(stored.manifest)
    }

    async fn get(&self, id: Uuid) -> StorageResult<StoredMedia> {
        let start = std::time::Instant::now();
        let manifest = self.manifest(id).await?;

        let data = self
            .read_file(&keys::artifact_key(id, keys::ORIGINAL))
            .await?
            .ok_or(StorageError::NotFound(id))?;
        let thumbnail = self
            .read_file(&keys::artifact_key(id, keys::THUMBNAIL))
            .await?
            .map(Bytes::from);

        tracing::debug!(
            media_id = %id,
            size_bytes = data.len(),
            has_thumbnail = thumbnail.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage get successful"
        );

        Ok(StoredMedia {
            manifest,
            data: Bytes::from(data),
            thumbnail,
        })
    }

    async fn manifest(&self, id: Uuid) -> StorageResult<MediaManifest> {
        let raw = self
            .read_file(&keys::artifact_key(id, keys::MANIFEST))
            .await?
            .ok_or(StorageError::NotFound(id))?;
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let path = self.key_to_path(&keys::record_prefix(id))?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_dir_all(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete record {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(media_id = %id, path = %path.display(), "Local storage delete successful");
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> StorageResult<bool> {
        let path = self.key_to_path(&keys::artifact_key(id, keys::MANIFEST))?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
