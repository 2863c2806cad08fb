//! Shared key generation for storage backends.
//!
//! Key format: `media/{id}/{artifact}`.

use uuid::Uuid;

pub const ORIGINAL: &str = "original";
pub const THUMBNAIL: &str = "thumbnail.png";
pub const MANIFEST: &str = "record.json";

/// Directory-style prefix holding every artifact of one record.
pub fn record_prefix(id: Uuid) -> String {
    format!("media/{}", id)
}

pub fn artifact_key(id: Uuid, artifact: &str) -> String {
    format!("{}/{}", record_prefix(id), artifact)
}
