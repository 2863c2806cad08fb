use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata extracted from a photo's embedded tags.
///
/// Dimensions, make and model are passed through from the source tags as
/// strings; an empty string means the tag was absent or unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub image_width: String,
    pub image_height: String,
    pub camera_make: String,
    pub camera_model: String,
    pub date_taken: DateTime<Utc>,
    /// True when no capture time could be read and `date_taken` holds the
    /// extraction wall-clock time instead.
    pub date_taken_estimated: bool,
    /// `None` when the photo carries no GPS directory at all.
    pub gps: Option<GpsMetadata>,
}

impl PhotoMetadata {
    /// All-empty metadata stamped with the given extraction time.
    pub fn empty(extracted_at: DateTime<Utc>) -> Self {
        Self {
            image_width: String::new(),
            image_height: String::new(),
            camera_make: String::new(),
            camera_model: String::new(),
            date_taken: extracted_at,
            date_taken_estimated: true,
            gps: None,
        }
    }

    pub fn has_location(&self) -> bool {
        self.gps.as_ref().is_some_and(GpsMetadata::has_coordinates)
    }
}

/// GPS block of a photo.
///
/// Each coordinate is `None` when the tag is absent or fails to parse, so a
/// genuine (0.0, 0.0) fix is distinguishable from missing data. City and
/// country are filled later by reverse geocoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsMetadata {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl GpsMetadata {
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metadata_has_no_location() {
        let metadata = PhotoMetadata::empty(Utc::now());
        assert!(metadata.image_width.is_empty());
        assert!(metadata.camera_make.is_empty());
        assert!(metadata.date_taken_estimated);
        assert!(!metadata.has_location());
    }

    #[test]
    fn test_zero_coordinates_are_a_location() {
        let mut metadata = PhotoMetadata::empty(Utc::now());
        metadata.gps = Some(GpsMetadata {
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..Default::default()
        });
        assert!(metadata.has_location());
    }

    #[test]
    fn test_gps_block_without_coordinates() {
        let gps = GpsMetadata {
            altitude: Some(12.5),
            ..Default::default()
        };
        assert!(!gps.has_coordinates());
    }
}
