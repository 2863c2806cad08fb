use std::fmt::{Display, Formatter, Result as FmtResult};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::DocumentMetadata;
use super::photo::PhotoMetadata;

/// One uploaded payload, as handed over by the upload transport.
///
/// Lives only for the duration of a single ingest call.
#[derive(Debug, Clone)]
pub struct RawMedia {
    pub data: Bytes,
    pub content_type: String,
    pub file_name: String,
}

impl RawMedia {
    pub fn new(
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            file_name: file_name.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Kind of media the pipeline knows how to derive artifacts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Document,
}

impl MediaKind {
    /// Map a declared content type to a media kind.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(MediaKind::Document),
            ct if ct.starts_with("image/") => Some(MediaKind::Photo),
            _ => None,
        }
    }

    /// Content type carried by the payload's magic bytes.
    pub fn sniff_content_type(data: &[u8]) -> Option<&'static str> {
        if data.starts_with(b"%PDF") {
            Some("application/pdf")
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some("image/jpeg")
        } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some("image/png")
        } else {
            None
        }
    }

    /// Detect the media kind from magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        Self::sniff_content_type(data).and_then(Self::from_content_type)
    }

    /// Declared content type first, magic bytes as a fallback.
    pub fn detect(content_type: &str, data: &[u8]) -> Option<Self> {
        Self::from_content_type(content_type).or_else(|| Self::sniff(data))
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Document => write!(f, "document"),
        }
    }
}

/// Metadata derived from an upload, per media kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaMetadata {
    Photo(PhotoMetadata),
    Document(DocumentMetadata),
}

impl MediaMetadata {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaMetadata::Photo(_) => MediaKind::Photo,
            MediaMetadata::Document(_) => MediaKind::Document,
        }
    }
}

/// Result of a completed ingest.
///
/// Carries the derived metadata but never the raw or thumbnail bytes; those
/// are read back through the store or the thumbnail read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub id: Uuid,
    pub kind: MediaKind,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub thumbnail_size_bytes: u64,
    pub metadata: MediaMetadata,
    pub created_at: DateTime<Utc>,
    pub thumbnail_cached: bool,
}
