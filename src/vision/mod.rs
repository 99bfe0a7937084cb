//! Vision boundary
//!
//! Everything that touches pixels lives behind two traits: a
//! [`VisionBackend`] turning a photo into candidate rectangles, and a
//! [`MarkerDetector`] reporting fiducial corners. Nothing but [`Candidate`]
//! and [`Fiducial`] geometry leaves this module.

pub mod imageproc_backend;
pub mod init;
pub mod marker;
#[cfg(feature = "opencv")]
pub mod opencv_backend;

use image::RgbaImage;

use crate::geometry::{Candidate, Fiducial};
use crate::Result;

pub use imageproc_backend::ImageprocBackend;
pub use marker::BlobMarkerDetector;
#[cfg(feature = "opencv")]
pub use opencv_backend::OpenCvBackend;

/// Edge detection and rectangle fitting for one photo
pub trait VisionBackend: Send + Sync {
    /// Candidate rectangles, one per external contour
    fn candidates(&self, image: &RgbaImage) -> Result<Vec<Candidate>>;
}

/// Fiducial marker detection
pub trait MarkerDetector: Send + Sync {
    fn detect(&self, image: &RgbaImage) -> Vec<Fiducial>;
}

/// Marker detector for pipelines that do not use fiducials
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarkers;

impl MarkerDetector for NoMarkers {
    fn detect(&self, _image: &RgbaImage) -> Vec<Fiducial> {
        Vec::new()
    }
}
