//! Image thumbnail rendering - decode, orient, shrink, encode

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, GenericImageView, ImageReader};

use super::{ImageOrientation, ImageResize};
use crate::metadata::read_orientation;
use crate::thumbnail::ThumbnailError;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode an image of any supported format.
    pub fn decode(data: &[u8]) -> Result<DynamicImage, ThumbnailError> {
        if data.is_empty() {
            return Err(ThumbnailError::EmptyInput);
        }

        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ThumbnailError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| ThumbnailError::Decode(e.to_string()))
    }

    /// Encode as PNG at maximum compression quality.
    pub fn encode_png(img: &DynamicImage) -> Result<Bytes, ThumbnailError> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            Cursor::new(&mut buffer),
            CompressionType::Best,
            PngFilter::Adaptive,
        );
        img.write_with_encoder(encoder)
            .map_err(|e| ThumbnailError::Encode(e.to_string()))?;
        Ok(Bytes::from(buffer))
    }

    /// Render an upright PNG thumbnail bounded by `width` x `height`.
    pub fn render_thumbnail(data: &[u8], width: u32, height: u32) -> Result<Bytes, ThumbnailError> {
        let img = Self::decode(data)?;
        let (orig_width, orig_height) = img.dimensions();

        let img = match read_orientation(data) {
            Some(orientation) => ImageOrientation::apply_exif_orientation(img, orientation),
            None => img,
        };
        let thumb = ImageResize::thumbnail(img, width, height);
        let encoded = Self::encode_png(&thumb)?;

        tracing::debug!(
            orig_width = orig_width,
            orig_height = orig_height,
            width = thumb.width(),
            height = thumb.height(),
            size_bytes = encoded.len(),
            "Rendered image thumbnail"
        );

        Ok(encoded)
    }
}
