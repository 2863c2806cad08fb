//! Data models for the media pipeline
//!
//! Each sub-module represents one slice of the pipeline's data: the raw
//! upload, the metadata derived from it, and the keys used to cache
//! derived artifacts.

mod artifact;
mod document;
mod media;
mod photo;

// Re-export all models for convenient imports
pub use artifact::{ArtifactKey, ArtifactNamespace};
pub use document::DocumentMetadata;
pub use media::{MediaKind, MediaMetadata, PersistedRecord, RawMedia};
pub use photo::{GpsMetadata, PhotoMetadata};
