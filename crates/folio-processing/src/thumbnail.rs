//! Thumbnail generation for photos and documents
//!
//! Output is always PNG. [`ThumbnailGenerator::generate`] keeps the
//! empty-bytes failure sentinel for callers that only need "rendered or
//! not"; [`ThumbnailGenerator::try_generate`] reports why a render failed.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use folio_core::{MediaKind, PipelineConfig};
use thiserror::Error;

use crate::document::{DocumentProcessor, PdftoppmRasterizer, RasterizeError, Rasterizer, DEFAULT_DPI};
use crate::image::ImageProcessor;

/// Content type of every generated thumbnail.
pub const THUMBNAIL_CONTENT_TYPE: &str = "image/png";

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error("Input is not a PDF document")]
    NotPdf,

    #[error("Rasterizer returned an empty image")]
    EmptyRender,

    #[error(transparent)]
    Rasterize(#[from] RasterizeError),

    #[error("Thumbnail worker failed: {0}")]
    Worker(String),
}

/// Which rendering path a thumbnail takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSource {
    Image,
    Document,
}

impl From<MediaKind> for ThumbnailSource {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Photo => ThumbnailSource::Image,
            MediaKind::Document => ThumbnailSource::Document,
        }
    }
}

impl Display for ThumbnailSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailSource::Image => write!(f, "image"),
            ThumbnailSource::Document => write!(f, "document"),
        }
    }
}

/// Bounding box and source kind of a thumbnail request.
///
/// The bounding box applies to the image path only; document thumbnails are
/// the page-1 render at [`DEFAULT_DPI`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    pub width: u32,
    pub height: u32,
    pub source: ThumbnailSource,
}

impl ThumbnailSpec {
    pub fn new(source: ThumbnailSource, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            source,
        }
    }
}

#[derive(Clone)]
pub struct ThumbnailGenerator {
    rasterizer: Arc<dyn Rasterizer>,
    dpi: u32,
}

impl ThumbnailGenerator {
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            rasterizer,
            dpi: DEFAULT_DPI,
        }
    }

    /// Generator backed by the configured command-line rasterizer.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(Arc::new(PdftoppmRasterizer::new(
            config.pdf_rasterizer.clone(),
            config.rasterizer_timeout,
        )))
    }

    /// Render a thumbnail, returning empty bytes if rendering fails.
    ///
    /// An empty result means "render failed" and must never be cached or
    /// persisted as a thumbnail.
    pub async fn generate(&self, data: Bytes, spec: ThumbnailSpec) -> Bytes {
        match self.try_generate(data, spec).await {
            Ok(thumbnail) => thumbnail,
            Err(e) => {
                tracing::error!(error = %e, source_kind = %spec.source, "Thumbnail generation failed");
                Bytes::new()
            }
        }
    }

    pub async fn try_generate(
        &self,
        data: Bytes,
        spec: ThumbnailSpec,
    ) -> Result<Bytes, ThumbnailError> {
        if data.is_empty() {
            return Err(ThumbnailError::EmptyInput);
        }

        let start = Instant::now();
        let input_bytes = data.len();

        let thumbnail = match spec.source {
            ThumbnailSource::Image => {
                // Decode and resize are CPU-bound
                tokio::task::spawn_blocking(move || {
                    ImageProcessor::render_thumbnail(&data, spec.width, spec.height)
                })
                .await
                .map_err(|e| ThumbnailError::Worker(e.to_string()))??
            }
            ThumbnailSource::Document => {
                if !DocumentProcessor::is_pdf(&data) {
                    return Err(ThumbnailError::NotPdf);
                }
                let png = self.rasterizer.rasterize_first_page(&data, self.dpi).await?;
                if png.is_empty() {
                    return Err(ThumbnailError::EmptyRender);
                }
                png
            }
        };

        tracing::info!(
            source_kind = %spec.source,
            input_bytes = input_bytes,
            output_bytes = thumbnail.len(),
            duration_ms = start.elapsed().as_millis(),
            "Generated thumbnail"
        );

        Ok(thumbnail)
    }
}
