//! Folio Core Library
//!
//! This crate provides the domain models, error metadata, and configuration
//! shared by the storage, processing, and CLI crates of the media pipeline.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{LogFormat, PipelineConfig};
pub use error::{ErrorMetadata, LogLevel};
pub use models::{
    ArtifactKey, ArtifactNamespace, DocumentMetadata, GpsMetadata, MediaKind, MediaMetadata,
    PersistedRecord, PhotoMetadata, RawMedia,
};
pub use storage_types::StorageBackend;
