use folio_core::{ErrorMetadata, LogLevel};
use folio_storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

use super::state::IngestState;
use crate::thumbnail::ThumbnailError;
use crate::validator::ValidationError;

/// Why an upload did not complete.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Upload rejected: {0}")]
    Rejected(#[from] ValidationError),

    #[error("Unsupported media type: {content_type}")]
    UnsupportedMedia { content_type: String },

    #[error("Thumbnail generation failed: {0}")]
    ThumbnailFailed(#[source] ThumbnailError),

    #[error("Failed to persist media: {0}")]
    Store(#[source] StorageError),

    #[error("Ingest worker failed: {0}")]
    Worker(String),
}

impl IngestionError {
    /// Last state reached before the upload moved to `Failed`.
    pub fn stage(&self) -> IngestState {
        match self {
            IngestionError::Rejected(_) => IngestState::BytesRead,
            IngestionError::UnsupportedMedia { .. } => IngestState::BytesRead,
            IngestionError::ThumbnailFailed(_) => IngestState::MetadataExtracted,
            IngestionError::Store(_) => IngestState::ThumbnailGenerated,
            IngestionError::Worker(_) => IngestState::BytesRead,
        }
    }
}

impl ErrorMetadata for IngestionError {
    fn status_code(&self) -> u16 {
        match self {
            IngestionError::Rejected(ValidationError::FileTooLarge { .. }) => 413,
            IngestionError::Rejected(_) => 400,
            IngestionError::UnsupportedMedia { .. } => 415,
            IngestionError::ThumbnailFailed(_) => 422,
            IngestionError::Store(_) | IngestionError::Worker(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            IngestionError::Rejected(_) => "UPLOAD_REJECTED",
            IngestionError::UnsupportedMedia { .. } => "UNSUPPORTED_MEDIA",
            IngestionError::ThumbnailFailed(_) => "THUMBNAIL_FAILED",
            IngestionError::Store(_) => "STORAGE_ERROR",
            IngestionError::Worker(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, IngestionError::Store(_) | IngestionError::Worker(_))
    }

    fn client_message(&self) -> String {
        match self {
            IngestionError::Rejected(e) => e.to_string(),
            IngestionError::UnsupportedMedia { .. } => self.to_string(),
            IngestionError::ThumbnailFailed(_) => {
                "Could not render a preview of the uploaded file".to_string()
            }
            IngestionError::Store(_) => "Failed to store the uploaded file".to_string(),
            IngestionError::Worker(_) => "Internal server error".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            IngestionError::Rejected(_) | IngestionError::UnsupportedMedia { .. } => {
                LogLevel::Debug
            }
            IngestionError::ThumbnailFailed(_) => LogLevel::Warn,
            IngestionError::Store(_) | IngestionError::Worker(_) => LogLevel::Error,
        }
    }
}

/// Why a thumbnail read could not be served.
#[derive(Error, Debug)]
pub enum ThumbnailReadError {
    #[error("Media not found: {0}")]
    NotFound(Uuid),

    #[error("Stored media is a {actual}, not a {requested}")]
    KindMismatch {
        requested: folio_core::MediaKind,
        actual: folio_core::MediaKind,
    },

    #[error("Failed to read media: {0}")]
    Store(#[source] StorageError),

    #[error("Thumbnail regeneration failed: {0}")]
    RenderFailed(#[source] ThumbnailError),
}

impl From<StorageError> for ThumbnailReadError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(id) => ThumbnailReadError::NotFound(id),
            other => ThumbnailReadError::Store(other),
        }
    }
}

impl ErrorMetadata for ThumbnailReadError {
    fn status_code(&self) -> u16 {
        match self {
            ThumbnailReadError::NotFound(_) | ThumbnailReadError::KindMismatch { .. } => 404,
            ThumbnailReadError::Store(_) => 500,
            ThumbnailReadError::RenderFailed(_) => 422,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ThumbnailReadError::NotFound(_) | ThumbnailReadError::KindMismatch { .. } => {
                "NOT_FOUND"
            }
            ThumbnailReadError::Store(_) => "STORAGE_ERROR",
            ThumbnailReadError::RenderFailed(_) => "THUMBNAIL_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, ThumbnailReadError::Store(_))
    }

    fn client_message(&self) -> String {
        match self {
            ThumbnailReadError::NotFound(id) => format!("Media {} not found", id),
            ThumbnailReadError::KindMismatch { .. } => self.to_string(),
            ThumbnailReadError::Store(_) => "Failed to read stored media".to_string(),
            ThumbnailReadError::RenderFailed(_) => {
                "Could not render a preview of the stored file".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ThumbnailReadError::NotFound(_) | ThumbnailReadError::KindMismatch { .. } => {
                LogLevel::Debug
            }
            ThumbnailReadError::RenderFailed(_) => LogLevel::Warn,
            ThumbnailReadError::Store(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_metadata() {
        let err = IngestionError::from(ValidationError::FileTooLarge { size: 10, max: 5 });
        assert_eq!(err.status_code(), 413);
        assert_eq!(err.error_code(), "UPLOAD_REJECTED");
        assert!(!err.is_recoverable());
        assert_eq!(err.stage(), IngestState::BytesRead);
    }

    #[test]
    fn test_thumbnail_failure_is_user_visible() {
        let err = IngestionError::ThumbnailFailed(ThumbnailError::EmptyInput);
        assert_eq!(err.error_code(), "THUMBNAIL_FAILED");
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert!(!err.client_message().is_empty());
    }

    #[test]
    fn test_store_not_found_maps_to_read_not_found() {
        let id = Uuid::new_v4();
        let err = ThumbnailReadError::from(StorageError::NotFound(id));
        assert!(matches!(err, ThumbnailReadError::NotFound(found) if found == id));
        assert_eq!(err.status_code(), 404);
    }
}
