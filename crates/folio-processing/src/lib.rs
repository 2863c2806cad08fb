//! Folio media processing library
//!
//! Derives artifacts from uploaded media: photo metadata, document metadata
//! and thumbnails. It also runs the ingestion pipeline that persists them
//! and keeps a bounded, expiring cache of rendered thumbnails.

pub mod cache;
pub mod coordinates;
pub mod document;
pub mod image;
pub mod ingest;
pub mod metadata;
pub mod thumbnail;
pub mod validator;

// Re-export commonly used types
pub use cache::{ArtifactCache, ArtifactCacheConfig, Clock, ManualClock, SystemClock};
pub use coordinates::{
    describe_dms, extract_altitude, extract_altitude_or_zero, parse_dms, parse_dms_or_zero,
};
pub use document::{DocumentProcessor, PdftoppmRasterizer, RasterizeError, Rasterizer, DEFAULT_DPI};
pub use self::image::{ImageOrientation, ImageProcessor, ImageResize};
pub use ingest::{IngestState, IngestionError, IngestionOrchestrator, ThumbnailReadError};
pub use metadata::{extract_metadata, read_orientation};
pub use thumbnail::{
    ThumbnailError, ThumbnailGenerator, ThumbnailSource, ThumbnailSpec, THUMBNAIL_CONTENT_TYPE,
};
pub use validator::{guess_content_type, sanitize_filename, MediaValidator, ValidationError};
