//! Storage abstraction trait
//!
//! This module defines the `MediaStore` trait that all storage backends must
//! implement. The pipeline only ever talks to this trait, so the durable
//! store can be swapped (filesystem, memory, a database-backed repository)
//! without touching ingestion logic.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use folio_core::{MediaKind, MediaMetadata, StorageBackend};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Media not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Corrupt manifest: {0}")]
    CorruptManifest(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A record about to be persisted. The store assigns its identifier.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub kind: MediaKind,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
    pub thumbnail: Bytes,
    pub metadata: MediaMetadata,
}

/// Descriptive part of a stored record, without byte payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaManifest {
    pub id: Uuid,
    pub kind: MediaKind,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub thumbnail_size_bytes: Option<u64>,
    pub metadata: MediaMetadata,
    pub created_at: DateTime<Utc>,
}

/// A stored record together with its byte payloads
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub manifest: MediaManifest,
    pub data: Bytes,
    pub thumbnail: Option<Bytes>,
}

impl NewMedia {
    /// Reject records the store must never hold.
    pub fn check(&self) -> StorageResult<()> {
        if self.data.is_empty() {
            return Err(StorageError::InvalidRecord(
                "original payload is empty".to_string(),
            ));
        }
        if self.thumbnail.is_empty() {
            return Err(StorageError::InvalidRecord(
                "thumbnail is empty".to_string(),
            ));
        }
        if self.metadata.kind() != self.kind {
            return Err(StorageError::InvalidRecord(format!(
                "metadata kind {} does not match media kind {}",
                self.metadata.kind(),
                self.kind
            )));
        }
        Ok(())
    }

    pub(crate) fn into_stored(self, id: Uuid, created_at: DateTime<Utc>) -> StoredMedia {
        let manifest = MediaManifest {
            id,
            kind: self.kind,
            file_name: self.file_name,
            content_type: self.content_type,
            size_bytes: self.data.len() as u64,
            thumbnail_size_bytes: Some(self.thumbnail.len() as u64),
            metadata: self.metadata,
            created_at,
        };
        StoredMedia {
            manifest,
            data: self.data,
            thumbnail: Some(self.thumbnail),
        }
    }
}

/// Durable media store
///
/// Implementations must be safe to share between concurrent ingest and read
/// tasks.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist a new record and return its manifest with the assigned id.
    async fn put(&self, media: NewMedia) -> StorageResult<MediaManifest>;

    /// Load a record with its payloads.
    async fn get(&self, id: Uuid) -> StorageResult<StoredMedia>;

    /// Load only the manifest of a record.
    async fn manifest(&self, id: Uuid) -> StorageResult<MediaManifest>;

    /// Delete a record and all of its artifacts. Deleting a missing record
    /// is not an error.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// Check if a record exists
    async fn exists(&self, id: Uuid) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
