//! Folio Storage Library
//!
//! This crate provides the durable media store used by the pipeline: the
//! `MediaStore` trait plus local-filesystem and in-memory implementations.
//!
//! # Record layout
//!
//! Every record is addressed by the identifier the store assigns on `put`.
//! Backends that lay records out as keys use the same scheme:
//!
//! - `media/{id}/original` - the raw upload
//! - `media/{id}/thumbnail.png` - the rendered thumbnail
//! - `media/{id}/record.json` - the manifest (kind, names, derived metadata)
//!
//! Key generation is centralized in the `keys` module so all backends stay
//! consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use folio_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
pub use traits::{MediaManifest, MediaStore, NewMedia, StorageError, StorageResult, StoredMedia};
