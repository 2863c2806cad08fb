//! Image processing for photo thumbnails

mod orientation;
mod processor;
mod resize;

pub use orientation::{ImageOrientation, OrientationTransform};
pub use processor::ImageProcessor;
pub use resize::ImageResize;
