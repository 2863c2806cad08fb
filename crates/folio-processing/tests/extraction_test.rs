//! Metadata extraction and thumbnail generation against fixture files.
//!
//! Run with: `cargo test -p folio-processing --test extraction_test`

mod helpers;

use std::sync::Arc;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use folio_core::PhotoMetadata;
use folio_processing::metadata::extract_metadata_at;
use folio_processing::{
    extract_metadata, parse_dms, parse_dms_or_zero, read_orientation, ThumbnailGenerator,
    ThumbnailSource, ThumbnailSpec,
};
use helpers::fakes::CountingRasterizer;
use helpers::fixtures;
use image::GenericImageView;

fn generator() -> ThumbnailGenerator {
    ThumbnailGenerator::new(Arc::new(CountingRasterizer::new()))
}

#[test]
fn test_parse_dms_reference_value() {
    let value = parse_dms("40° 26' 46.00\"").unwrap();
    assert!((value - 40.446111).abs() < 1e-6);
}

#[test]
fn test_parse_dms_non_matching_is_zero() {
    assert_eq!(parse_dms_or_zero("somewhere warm"), 0.0);
}

#[test]
fn test_non_image_bytes_yield_default_metadata() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let metadata = extract_metadata_at(b"%PDF-1.4 not a photo", now);
    assert_eq!(metadata, PhotoMetadata::empty(now));
}

#[test]
fn test_jpeg_exif_is_read() {
    let jpeg = fixtures::create_jpeg_with_exif(16, 8, 3);

    let metadata = extract_metadata(&jpeg);
    assert_eq!(metadata.camera_make, "FUJIFILM");
    assert_eq!(
        metadata.date_taken,
        Utc.with_ymd_and_hms(2022, 8, 1, 9, 15, 30).unwrap()
    );
    assert!(metadata.has_location());
    assert_eq!(read_orientation(&jpeg), Some(3));
}

#[test]
fn test_png_without_exif_keeps_header_dimensions() {
    let metadata = extract_metadata(&fixtures::create_png(33, 21));
    assert_eq!(metadata.image_width, "33");
    assert_eq!(metadata.image_height, "21");
    assert!(metadata.camera_make.is_empty());
    assert!(metadata.gps.is_none());
}

#[tokio::test]
async fn test_empty_image_thumbnail_is_empty() {
    let thumbnail = generator()
        .generate(Bytes::new(), ThumbnailSpec::new(ThumbnailSource::Image, 100, 200))
        .await;
    assert_eq!(thumbnail.len(), 0);
}

#[tokio::test]
async fn test_small_png_thumbnail_longest_side_within_bound() {
    let png = Bytes::from(fixtures::create_png(240, 180));

    let thumbnail = generator()
        .generate(png, ThumbnailSpec::new(ThumbnailSource::Image, 100, 200))
        .await;

    assert!(!thumbnail.is_empty());
    assert_eq!(image::guess_format(&thumbnail).unwrap(), image::ImageFormat::Png);
    let (width, height) = image::load_from_memory(&thumbnail).unwrap().dimensions();
    assert!(width.max(height) <= 200);
}

#[tokio::test]
async fn test_corrupt_pdf_thumbnail_is_empty() {
    let thumbnail = generator()
        .generate(
            Bytes::from(fixtures::create_corrupt_pdf()),
            ThumbnailSpec::new(ThumbnailSource::Document, 100, 200),
        )
        .await;
    assert!(thumbnail.is_empty());
}
