use image::{imageops, DynamicImage};

/// Rotation and flips that undo an EXIF orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationTransform {
    /// Clockwise rotation in degrees, applied first
    pub rotate: Option<u16>,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl OrientationTransform {
    /// Transform for an EXIF orientation value (1-8). Unknown values map to
    /// the identity.
    pub fn for_exif(orientation: u32) -> Self {
        let (rotate, flip_horizontal, flip_vertical) = match orientation {
            2 => (None, true, false),      // Mirror horizontal
            3 => (Some(180), false, false), // Rotate 180
            4 => (None, false, true),      // Mirror vertical
            5 => (Some(90), true, false),  // Transpose
            6 => (Some(90), false, false), // Rotate 90 CW
            7 => (Some(270), true, false), // Transverse
            8 => (Some(270), false, false), // Rotate 270 CW
            _ => (None, false, false),
        };

        Self {
            rotate,
            flip_horizontal,
            flip_vertical,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Rotate/flip `img` so it displays upright for the given EXIF orientation.
    pub fn apply_exif_orientation(mut img: DynamicImage, orientation: u32) -> DynamicImage {
        let transform = OrientationTransform::for_exif(orientation);
        if transform.is_identity() {
            return img;
        }

        tracing::debug!(
            orientation = orientation,
            rotate = ?transform.rotate,
            flip_horizontal = transform.flip_horizontal,
            flip_vertical = transform.flip_vertical,
            "Applying EXIF orientation"
        );

        if let Some(angle) = transform.rotate {
            img = Self::rotate_by_angle(img, angle);
        }
        if transform.flip_horizontal {
            img = DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()));
        }
        if transform.flip_vertical {
            img = DynamicImage::ImageRgba8(imageops::flip_vertical(&img.to_rgba8()));
        }

        img
    }

    /// Rotate clockwise by 90, 180 or 270 degrees; other angles are a no-op.
    pub fn rotate_by_angle(img: DynamicImage, angle: u16) -> DynamicImage {
        match angle {
            90 => DynamicImage::ImageRgba8(imageops::rotate90(&img.to_rgba8())),
            180 => DynamicImage::ImageRgba8(imageops::rotate180(&img.to_rgba8())),
            270 => DynamicImage::ImageRgba8(imageops::rotate270(&img.to_rgba8())),
            _ => img,
        }
    }
}
