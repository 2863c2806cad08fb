//! Document processing module

pub mod processor;
pub mod rasterizer;

pub use processor::DocumentProcessor;
pub use rasterizer::{PdftoppmRasterizer, RasterizeError, Rasterizer, DEFAULT_DPI};
