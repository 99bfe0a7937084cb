//! EXIF metadata extraction and parsing
//!
//! Phone cameras store pixels in sensor order and record the intended
//! display rotation in the Orientation tag. Measuring needs the upright image,
//! so the tag is read here and applied by the image loader.

use exif::{In, Reader, Tag, Value};
use image::DynamicImage;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{MeasureError, Result};

/// EXIF Orientation tag values 1 to 8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    /// Mirror across the main diagonal
    Transpose,
    Rotate90,
    /// Mirror across the anti-diagonal
    Transverse,
    Rotate270,
}

impl Orientation {
    /// Map the raw tag value; unknown values mean no transform
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }

    /// Whether width and height trade places once applied
    pub fn swaps_dimensions(&self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90
                | Orientation::Transverse
                | Orientation::Rotate270
        )
    }

    /// Turn a stored image upright
    pub fn apply(&self, image: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Normal => image,
            Orientation::FlipHorizontal => image.fliph(),
            Orientation::Rotate180 => image.rotate180(),
            Orientation::FlipVertical => image.flipv(),
            Orientation::Transpose => image.rotate90().fliph(),
            Orientation::Rotate90 => image.rotate90(),
            Orientation::Transverse => image.rotate270().fliph(),
            Orientation::Rotate270 => image.rotate270(),
        }
    }
}

/// Camera identification information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub make: String,
    pub model: String,
}

/// Capture metadata relevant to measuring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub orientation: Orientation,
    pub camera_info: Option<CameraInfo>,
    /// Lens focal length in millimetres
    pub focal_length_mm: Option<f32>,
}

/// EXIF metadata extractor
pub struct ExifExtractor;

impl ExifExtractor {
    /// Extract capture metadata from an image file
    ///
    /// Files without an EXIF block yield default metadata. Read failures
    /// on the file itself are errors.
    pub fn extract(image_path: &Path) -> Result<CaptureMetadata> {
        let file = File::open(image_path).map_err(|e| {
            MeasureError::exif(format!("Failed to open {}", image_path.display()), e)
        })?;
        let mut reader = BufReader::new(file);

        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) | Err(exif::Error::InvalidFormat(_)) => {
                debug!("no EXIF data in {}", image_path.display());
                return Ok(CaptureMetadata::default());
            }
            Err(e) => {
                return Err(MeasureError::exif(
                    format!("Failed to parse EXIF in {}", image_path.display()),
                    e,
                ))
            }
        };

        let orientation = exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0))
            .map(Orientation::from_exif)
            .unwrap_or_default();

        let ascii = |tag: Tag| {
            exif.get_field(tag, In::PRIMARY)
                .and_then(|f| Self::parse_ascii(&f.value))
        };
        let camera_info = match (ascii(Tag::Make), ascii(Tag::Model)) {
            (Some(make), Some(model)) => Some(CameraInfo { make, model }),
            _ => None,
        };

        let focal_length_mm = exif
            .get_field(Tag::FocalLength, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Rational(values) => values
                    .first()
                    .and_then(|r| Self::rational_to_float(r.num, r.denom)),
                _ => None,
            });

        Ok(CaptureMetadata {
            orientation,
            camera_info,
            focal_length_mm,
        })
    }

    /// Orientation only, `Normal` when absent
    pub fn orientation(image_path: &Path) -> Result<Orientation> {
        Ok(Self::extract(image_path)?.orientation)
    }

    fn parse_ascii(value: &Value) -> Option<String> {
        match value {
            Value::Ascii(parts) => parts
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    /// Convert EXIF rational to float
    fn rational_to_float(numerator: u32, denominator: u32) -> Option<f32> {
        if denominator == 0 {
            None
        } else {
            Some(numerator as f32 / denominator as f32)
        }
    }
}
