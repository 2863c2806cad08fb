//! Photo metadata extraction from embedded EXIF tags
//!
//! Extraction is best-effort. A stream with no readable EXIF block yields
//! empty metadata, and each tag degrades on its own: a missing camera model
//! never costs the capture date or the GPS block.

use std::io::Cursor;

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{Context, Exif, Field, In, Reader, Tag, Value};
use folio_core::{GpsMetadata, PhotoMetadata};
use image::ImageReader;

use crate::coordinates::{describe_dms, extract_altitude, parse_dms};

/// EXIF date-time layout (`2023:06:15 14:30:00`).
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Extract photo metadata, stamping missing capture times with the current time.
pub fn extract_metadata(data: &[u8]) -> PhotoMetadata {
    extract_metadata_at(data, Utc::now())
}

/// Extract photo metadata using `now` as the fallback capture time.
pub fn extract_metadata_at(data: &[u8], now: DateTime<Utc>) -> PhotoMetadata {
    let exif = match read_exif(data) {
        Some(exif) => exif,
        None => {
            let mut metadata = PhotoMetadata::empty(now);
            if let Some((width, height)) = header_dimensions(data) {
                metadata.image_width = width.to_string();
                metadata.image_height = height.to_string();
            }
            return metadata;
        }
    };

    let (image_width, image_height) = dimensions(&exif, data);
    let (date_taken, date_taken_estimated) = match capture_time(&exif) {
        Some(taken) => (taken, false),
        None => (now, true),
    };

    let metadata = PhotoMetadata {
        image_width,
        image_height,
        camera_make: ascii_tag(&exif, Tag::Make),
        camera_model: ascii_tag(&exif, Tag::Model),
        date_taken,
        date_taken_estimated,
        gps: gps_block(&exif),
    };

    tracing::debug!(
        camera_make = %metadata.camera_make,
        camera_model = %metadata.camera_model,
        has_location = metadata.has_location(),
        date_taken_estimated = metadata.date_taken_estimated,
        "Extracted photo metadata"
    );

    metadata
}

/// Read the EXIF orientation tag (1-8). `None` when absent.
pub fn read_orientation(data: &[u8]) -> Option<u32> {
    let exif = read_exif(data)?;
    exif.get_field(Tag::Orientation, In::PRIMARY)?
        .value
        .get_uint(0)
}

fn read_exif(data: &[u8]) -> Option<Exif> {
    if data.is_empty() {
        return None;
    }

    match Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => Some(exif),
        Err(e) => {
            tracing::debug!(error = %e, "No readable EXIF block");
            None
        }
    }
}

fn field<'a>(exif: &'a Exif, tag: Tag) -> Option<&'a Field> {
    exif.get_field(tag, In::PRIMARY)
}

fn ascii_value(field: &Field) -> Option<String> {
    match &field.value {
        Value::Ascii(parts) => {
            let text = parts
                .first()
                .map(|raw| String::from_utf8_lossy(raw).trim().to_string())?;
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}

fn ascii_tag(exif: &Exif, tag: Tag) -> String {
    field(exif, tag).and_then(ascii_value).unwrap_or_default()
}

fn uint_tag(exif: &Exif, tag: Tag) -> Option<u32> {
    field(exif, tag)?.value.get_uint(0)
}

fn header_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Width and height from the pixel-dimension tags, then the primary image
/// tags, then the decoded image header.
fn dimensions(exif: &Exif, data: &[u8]) -> (String, String) {
    let tagged =
        |primary: Tag, fallback: Tag| uint_tag(exif, primary).or_else(|| uint_tag(exif, fallback));

    let mut width = tagged(Tag::PixelXDimension, Tag::ImageWidth);
    let mut height = tagged(Tag::PixelYDimension, Tag::ImageLength);

    if width.is_none() || height.is_none() {
        if let Some((w, h)) = header_dimensions(data) {
            width = width.or(Some(w));
            height = height.or(Some(h));
        }
    }

    (
        width.map(|w| w.to_string()).unwrap_or_default(),
        height.map(|h| h.to_string()).unwrap_or_default(),
    )
}

fn capture_time(exif: &Exif) -> Option<DateTime<Utc>> {
    [Tag::DateTimeOriginal, Tag::DateTime]
        .into_iter()
        .filter_map(|tag| field(exif, tag).and_then(ascii_value))
        .find_map(|text| {
            let parsed = parse_capture_time(&text);
            if parsed.is_none() {
                tracing::warn!(value = %text, "Unparseable capture time");
            }
            parsed
        })
}

/// Parse a capture timestamp: ISO-8601 first, then the EXIF layout as UTC.
pub fn parse_capture_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, EXIF_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn gps_block(exif: &Exif) -> Option<GpsMetadata> {
    let has_gps_directory = exif.fields().any(|f| f.tag.context() == Context::Gps);
    if !has_gps_directory {
        return None;
    }

    Some(GpsMetadata {
        latitude: coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, 'S'),
        longitude: coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, 'W'),
        altitude: altitude(exif),
        city: None,
        country: None,
    })
}

fn dms_description(field: &Field) -> Option<String> {
    match &field.value {
        Value::Rational(parts) if parts.len() >= 3 => Some(describe_dms(
            parts[0].to_f64(),
            parts[1].to_f64(),
            parts[2].to_f64(),
        )),
        _ => None,
    }
}

fn coordinate(exif: &Exif, tag: Tag, reference: Tag, negative: char) -> Option<f64> {
    let description = field(exif, tag).and_then(dms_description)?;
    let Some(value) = parse_dms(&description) else {
        tracing::warn!(tag = %tag, value = %description, "Unparseable GPS coordinate");
        return None;
    };

    let flipped = field(exif, reference)
        .and_then(ascii_value)
        .is_some_and(|r| r.starts_with(negative));
    Some(if flipped { -value } else { value })
}

fn altitude(exif: &Exif) -> Option<f64> {
    let description = match &field(exif, Tag::GPSAltitude)?.value {
        Value::Rational(parts) => parts.first().map(|r| format!("{} m", r.to_f64()))?,
        _ => return None,
    };
    let Some(value) = extract_altitude(&description) else {
        tracing::warn!(value = %description, "Unparseable GPS altitude");
        return None;
    };

    // Reference 1 means below sea level
    let below_sea_level = uint_tag(exif, Tag::GPSAltitudeRef) == Some(1);
    Some(if below_sea_level { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use exif::experimental::Writer;
    use exif::Rational;

    fn rational(num: u32, denom: u32) -> Rational {
        Rational { num, denom }
    }

    fn ascii(tag: Tag, text: &str) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![text.as_bytes().to_vec()]),
        }
    }

    fn tiff_with(fields: &[Field]) -> Vec<u8> {
        let mut writer = Writer::new();
        for field in fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        buf.into_inner()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_non_image_bytes_yield_empty_metadata() {
        let now = fixed_now();
        let metadata = extract_metadata_at(b"definitely not an image", now);
        assert_eq!(metadata, PhotoMetadata::empty(now));
    }

    #[test]
    fn test_empty_input_yields_empty_metadata() {
        let metadata = extract_metadata(&[]);
        assert!(metadata.camera_make.is_empty());
        assert!(metadata.gps.is_none());
        assert!(metadata.date_taken_estimated);
    }

    #[test]
    fn test_camera_and_date_tags() {
        let data = tiff_with(&[
            ascii(Tag::Make, "Canon"),
            ascii(Tag::Model, "EOS R5 "),
            ascii(Tag::DateTimeOriginal, "2023:06:15 14:30:00"),
        ]);

        let metadata = extract_metadata_at(&data, fixed_now());
        assert_eq!(metadata.camera_make, "Canon");
        assert_eq!(metadata.camera_model, "EOS R5");
        assert_eq!(
            metadata.date_taken,
            Utc.with_ymd_and_hms(2023, 6, 15, 14, 30, 0).unwrap()
        );
        assert!(!metadata.date_taken_estimated);
        assert!(metadata.gps.is_none());
    }

    #[test]
    fn test_missing_tags_degrade_individually() {
        let data = tiff_with(&[ascii(Tag::Make, "Nikon")]);

        let now = fixed_now();
        let metadata = extract_metadata_at(&data, now);
        assert_eq!(metadata.camera_make, "Nikon");
        assert!(metadata.camera_model.is_empty());
        assert!(metadata.image_width.is_empty());
        assert_eq!(metadata.date_taken, now);
        assert!(metadata.date_taken_estimated);
    }

    #[test]
    fn test_unparseable_date_falls_back_to_now() {
        let data = tiff_with(&[
            ascii(Tag::Make, "Nikon"),
            ascii(Tag::DateTimeOriginal, "sometime last summer"),
        ]);

        let now = fixed_now();
        let metadata = extract_metadata_at(&data, now);
        assert_eq!(metadata.date_taken, now);
        assert!(metadata.date_taken_estimated);
    }

    #[test]
    fn test_pixel_dimensions() {
        let data = tiff_with(&[
            ascii(Tag::Make, "Canon"),
            Field {
                tag: Tag::PixelXDimension,
                ifd_num: In::PRIMARY,
                value: Value::Long(vec![4000]),
            },
            Field {
                tag: Tag::PixelYDimension,
                ifd_num: In::PRIMARY,
                value: Value::Long(vec![3000]),
            },
        ]);

        let metadata = extract_metadata(&data);
        assert_eq!(metadata.image_width, "4000");
        assert_eq!(metadata.image_height, "3000");
    }

    #[test]
    fn test_gps_block_with_hemisphere_and_altitude() {
        let data = tiff_with(&[
            ascii(Tag::Make, "Canon"),
            ascii(Tag::GPSLatitudeRef, "S"),
            Field {
                tag: Tag::GPSLatitude,
                ifd_num: In::PRIMARY,
                value: Value::Rational(vec![rational(33, 1), rational(51, 1), rational(2191, 100)]),
            },
            ascii(Tag::GPSLongitudeRef, "E"),
            Field {
                tag: Tag::GPSLongitude,
                ifd_num: In::PRIMARY,
                value: Value::Rational(vec![rational(151, 1), rational(12, 1), rational(4080, 100)]),
            },
            Field {
                tag: Tag::GPSAltitudeRef,
                ifd_num: In::PRIMARY,
                value: Value::Byte(vec![1]),
            },
            Field {
                tag: Tag::GPSAltitude,
                ifd_num: In::PRIMARY,
                value: Value::Rational(vec![rational(125, 10)]),
            },
        ]);

        let gps = extract_metadata(&data).gps.unwrap();
        let latitude = gps.latitude.unwrap();
        let longitude = gps.longitude.unwrap();
        assert!((latitude - -33.856086).abs() < 1e-5);
        assert!((longitude - 151.211333).abs() < 1e-5);
        assert_eq!(gps.altitude, Some(-12.5));
        assert!(gps.city.is_none());
    }

    #[test]
    fn test_gps_directory_without_coordinates() {
        let data = tiff_with(&[ascii(Tag::Make, "Canon"), ascii(Tag::GPSLatitudeRef, "N")]);

        let metadata = extract_metadata(&data);
        let gps = metadata.gps.clone().unwrap();
        assert_eq!(gps.latitude, None);
        assert_eq!(gps.longitude, None);
        assert!(!metadata.has_location());
    }

    #[test]
    fn test_read_orientation() {
        let data = tiff_with(&[Field {
            tag: Tag::Orientation,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![6]),
        }]);

        assert_eq!(read_orientation(&data), Some(6));
        assert_eq!(read_orientation(b"not exif"), None);
    }

    #[test]
    fn test_parse_capture_time_formats() {
        let expected = Utc.with_ymd_and_hms(2023, 6, 15, 14, 30, 0).unwrap();
        assert_eq!(parse_capture_time("2023-06-15T14:30:00Z"), Some(expected));
        assert_eq!(parse_capture_time("2023-06-15T16:30:00+02:00"), Some(expected));
        assert_eq!(parse_capture_time("2023:06:15 14:30:00"), Some(expected));
        assert_eq!(parse_capture_time("15/06/2023"), None);
    }
}
