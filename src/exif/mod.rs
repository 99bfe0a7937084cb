//! EXIF metadata extraction module
//!
//! Reads the orientation, camera and lens tags of phone photos.

pub mod extractor;

pub use extractor::{CaptureMetadata, ExifExtractor, Orientation};
