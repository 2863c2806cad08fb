//! Upload ingestion and the cached thumbnail read path

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use folio_core::{
    ArtifactKey, ErrorMetadata, LogLevel, MediaKind, MediaMetadata, PersistedRecord,
    PipelineConfig, RawMedia,
};
use folio_storage::{MediaStore, NewMedia, StorageError};
use uuid::Uuid;

use super::error::{IngestionError, ThumbnailReadError};
use super::state::{IngestProgress, IngestState};
use crate::cache::ArtifactCache;
use crate::document::DocumentProcessor;
use crate::metadata::extract_metadata;
use crate::thumbnail::{ThumbnailError, ThumbnailGenerator, ThumbnailSpec};
use crate::validator::{sanitize_filename, MediaValidator};

const DEFAULT_THUMBNAIL_SIZE: u32 = 320;

/// Drives uploads through validation, extraction, rendering, persistence
/// and cache population, and serves thumbnails cache-first.
///
/// The store and cache are injected so several orchestrators (or read-only
/// handlers) can share them.
pub struct IngestionOrchestrator {
    store: Arc<dyn MediaStore>,
    cache: Arc<ArtifactCache>,
    thumbnails: ThumbnailGenerator,
    validator: MediaValidator,
    thumbnail_width: u32,
    thumbnail_height: u32,
}

impl IngestionOrchestrator {
    pub fn new(
        store: Arc<dyn MediaStore>,
        cache: Arc<ArtifactCache>,
        thumbnails: ThumbnailGenerator,
        validator: MediaValidator,
    ) -> Self {
        Self {
            store,
            cache,
            thumbnails,
            validator,
            thumbnail_width: DEFAULT_THUMBNAIL_SIZE,
            thumbnail_height: DEFAULT_THUMBNAIL_SIZE,
        }
    }

    pub fn from_config(
        config: &PipelineConfig,
        store: Arc<dyn MediaStore>,
        cache: Arc<ArtifactCache>,
    ) -> Self {
        Self::new(
            store,
            cache,
            ThumbnailGenerator::from_config(config),
            MediaValidator::from_config(config),
        )
        .with_thumbnail_size(config.thumbnail_width, config.thumbnail_height)
    }

    /// Bounding box for photo thumbnails.
    pub fn with_thumbnail_size(mut self, width: u32, height: u32) -> Self {
        self.thumbnail_width = width;
        self.thumbnail_height = height;
        self
    }

    pub fn store(&self) -> &Arc<dyn MediaStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<ArtifactCache> {
        &self.cache
    }

    fn thumbnail_spec(&self, kind: MediaKind) -> ThumbnailSpec {
        ThumbnailSpec::new(kind.into(), self.thumbnail_width, self.thumbnail_height)
    }

    /// Ingest one upload.
    ///
    /// A failed render short-circuits before anything is persisted or
    /// cached. The returned record never carries the raw or thumbnail bytes.
    #[tracing::instrument(
        skip(self, media),
        fields(
            file_name = %media.file_name,
            content_type = %media.content_type,
            size_bytes = media.len()
        )
    )]
    pub async fn ingest(&self, media: RawMedia) -> Result<PersistedRecord, IngestionError> {
        let start = Instant::now();
        let mut progress = IngestProgress::new(Uuid::new_v4());

        let result = self.run(media, &mut progress).await;

        match &result {
            Ok(record) => {
                tracing::info!(
                    media_id = %record.id,
                    kind = %record.kind,
                    thumbnail_size_bytes = record.thumbnail_size_bytes,
                    duration_ms = start.elapsed().as_millis(),
                    "Media ingested"
                );
            }
            Err(e) => {
                progress.fail();
                log_failure(e, progress.state());
            }
        }

        result
    }

    async fn run(
        &self,
        media: RawMedia,
        progress: &mut IngestProgress,
    ) -> Result<PersistedRecord, IngestionError> {
        progress.advance(IngestState::BytesRead);

        self.validator.validate_file_size(media.len())?;
        let (kind, media) = resolve_kind(media)?;
        self.validator.validate(&media)?;

        let RawMedia {
            data,
            content_type,
            file_name,
        } = media;

        let metadata = Self::extract(kind, data.clone()).await?;
        progress.advance(IngestState::MetadataExtracted);

        let thumbnail = self
            .thumbnails
            .try_generate(data.clone(), self.thumbnail_spec(kind))
            .await
            .map_err(IngestionError::ThumbnailFailed)?;
        if thumbnail.is_empty() {
            return Err(IngestionError::ThumbnailFailed(ThumbnailError::EmptyRender));
        }
        progress.advance(IngestState::ThumbnailGenerated);

        let manifest = self
            .store
            .put(NewMedia {
                kind,
                file_name: sanitize_filename(&file_name),
                content_type,
                data,
                thumbnail: thumbnail.clone(),
                metadata,
            })
            .await
            .map_err(IngestionError::Store)?;
        progress.advance(IngestState::Persisted);

        let thumbnail_size_bytes = thumbnail.len() as u64;
        self.cache
            .put(ArtifactKey::thumbnail(kind, manifest.id), thumbnail);
        progress.advance(IngestState::CachePopulated);

        let record = PersistedRecord {
            id: manifest.id,
            kind: manifest.kind,
            file_name: manifest.file_name,
            content_type: manifest.content_type,
            size_bytes: manifest.size_bytes,
            thumbnail_size_bytes,
            metadata: manifest.metadata,
            created_at: manifest.created_at,
            thumbnail_cached: true,
        };
        progress.advance(IngestState::Completed);

        Ok(record)
    }

    /// Metadata extraction is CPU-bound and runs off the async workers.
    async fn extract(kind: MediaKind, data: Bytes) -> Result<MediaMetadata, IngestionError> {
        tokio::task::spawn_blocking(move || match kind {
            MediaKind::Photo => MediaMetadata::Photo(extract_metadata(&data)),
            MediaKind::Document => {
                MediaMetadata::Document(DocumentProcessor::extract_metadata(&data))
            }
        })
        .await
        .map_err(|e| IngestionError::Worker(e.to_string()))
    }

    /// Serve a thumbnail, cache first.
    ///
    /// On a miss the stored thumbnail is used when present, otherwise it is
    /// regenerated from the original. Either way the result is cached.
    /// Concurrent misses for the same key may each regenerate.
    #[tracing::instrument(skip_all, fields(kind = %kind, media_id = %id))]
    pub async fn read_thumbnail(
        &self,
        kind: MediaKind,
        id: Uuid,
    ) -> Result<Bytes, ThumbnailReadError> {
        let key = ArtifactKey::thumbnail(kind, id);
        if let Some(thumbnail) = self.cache.get(&key) {
            return Ok(thumbnail);
        }

        let stored = self.store.get(id).await?;
        if stored.manifest.kind != kind {
            return Err(ThumbnailReadError::KindMismatch {
                requested: kind,
                actual: stored.manifest.kind,
            });
        }

        let thumbnail = match stored.thumbnail.filter(|t| !t.is_empty()) {
            Some(thumbnail) => thumbnail,
            None => {
                tracing::info!("Stored thumbnail missing, regenerating");
                self.thumbnails
                    .try_generate(stored.data, self.thumbnail_spec(kind))
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, "Thumbnail regeneration failed");
                        ThumbnailReadError::RenderFailed(e)
                    })?
            }
        };

        self.cache.put(key, thumbnail.clone());
        Ok(thumbnail)
    }

    /// Delete a record and evict its cached artifacts.
    #[tracing::instrument(skip_all, fields(media_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        self.store.delete(id).await?;
        for kind in [MediaKind::Photo, MediaKind::Document] {
            self.cache.remove(&ArtifactKey::thumbnail(kind, id));
        }
        Ok(())
    }
}

/// Pick the media kind, falling back to magic bytes when the declared type
/// maps to no kind (`application/octet-stream` and the like). A sniffed type
/// replaces the declared one so the allow-list and extension checks run
/// against what the bytes actually are.
fn resolve_kind(media: RawMedia) -> Result<(MediaKind, RawMedia), IngestionError> {
    if let Some(kind) = MediaKind::from_content_type(&media.content_type) {
        return Ok((kind, media));
    }

    let sniffed = MediaKind::sniff_content_type(&media.data);
    let Some((kind, sniffed)) =
        sniffed.and_then(|ct| MediaKind::from_content_type(ct).map(|kind| (kind, ct)))
    else {
        return Err(IngestionError::UnsupportedMedia {
            content_type: media.content_type,
        });
    };

    tracing::debug!(
        declared = %media.content_type,
        sniffed,
        "Content type resolved from magic bytes"
    );
    Ok((
        kind,
        RawMedia {
            content_type: sniffed.to_string(),
            ..media
        },
    ))
}

fn log_failure(error: &IngestionError, state: IngestState) {
    let stage = error.stage();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code, %stage, %state, "Ingest failed")
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code, %stage, %state, "Ingest failed")
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code, %stage, %state, "Ingest failed")
        }
    }
}
