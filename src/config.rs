//! Configuration structures for the measurement pipeline.
//!
//! This module defines all tunable parameters, organized into groups for
//! preprocessing, reference selection, object selection, shape
//! classification, multi-view reconciliation, and wrap planning.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or built from a preset:
//!
//! ```no_run
//! use giftwrap_measure::MeasureConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = MeasureConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use a preset
//! let config = MeasureConfig::fiducial_marker(5.0);
//! # Ok::<(), giftwrap_measure::MeasureError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{processing, thresholds, wrap};
use crate::detection::reference::{ReferenceObject, SelectionPolicy};
use crate::wrap::guide::WrapMethod;
use crate::wrap::sizing::PaperSheet;
use crate::{MeasureError, Result};

/// Complete pipeline configuration.
///
/// Serializable to JSON so a measurement setup can be reproduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    pub preprocessing: PreprocessingConfig,
    pub reference: ReferenceConfig,
    pub object: ObjectConfig,
    pub shape: ShapeConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    pub wrap: WrapConfig,
}

/// Parameters for the vision backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Rotate phone photos upright using their EXIF orientation tag
    pub exif_orientation: bool,

    /// Gaussian blur sigma before edge detection.
    ///
    /// Used by the OpenCV backend only: OpenCV's Canny does not smooth, while
    /// `imageproc`'s Canny applies its own fixed blur.
    pub blur_sigma: f32,

    /// Canny edge detection low threshold
    pub canny_low_threshold: f32,

    /// Canny edge detection high threshold
    pub canny_high_threshold: f32,

    /// Fit minimum-area rotated rectangles instead of upright boxes
    #[serde(default)]
    pub rotated_rects: bool,
}

/// Which reference to look for and how to pick it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub object: ReferenceObject,
    pub policy: SelectionPolicy,

    /// Smallest area in px^2 accepted as the reference
    pub min_area: f64,

    /// Fewer candidates than this fail before any selection
    pub min_contours: usize,
}

/// Object selection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    /// Noise floor in px^2
    pub min_area: f64,

    /// Drop candidates whose bounds intersect the reference bounds
    pub exclude_reference_overlap: bool,
}

/// Shape classification parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Width/height difference in cm below which a footprint is square or round
    pub tolerance_cm: f64,
}

/// Multi-view reconciliation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Top view vs side view deviation that is logged as a warning
    pub cross_check_tolerance_cm: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            cross_check_tolerance_cm: thresholds::CROSS_CHECK_TOLERANCE_CM,
        }
    }
}

/// Wrapping paper parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapConfig {
    /// Overlap added to both paper dimensions
    pub margin_cm: f64,

    /// Predefined sheets in preference order
    pub sheets: Vec<PaperSheet>,

    /// Roll widths offered when no sheet fits
    pub roll_widths_cm: Vec<f64>,

    /// Fold guide method when none is chosen explicitly
    pub method: WrapMethod,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            margin_cm: wrap::MARGIN_CM,
            sheets: PaperSheet::default_catalog(),
            roll_widths_cm: wrap::ROLL_WIDTHS_CM.to_vec(),
            method: WrapMethod::Classic,
        }
    }
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            exif_orientation: true,
            blur_sigma: processing::BLUR_SIGMA,
            canny_low_threshold: processing::CANNY_LOW_THRESHOLD,
            canny_high_threshold: processing::CANNY_HIGH_THRESHOLD,
            rotated_rects: false,
        }
    }
}

impl PreprocessingConfig {
    /// Canny needs `0 <= low <= high`
    pub fn validate(&self) -> Result<()> {
        if !(self.canny_low_threshold >= 0.0
            && self.canny_low_threshold <= self.canny_high_threshold)
        {
            return Err(MeasureError::invalid_parameter(
                "preprocessing.canny_low_threshold",
                format!("{}..{}", self.canny_low_threshold, self.canny_high_threshold),
            ));
        }
        if self.blur_sigma < 0.0 {
            return Err(MeasureError::invalid_parameter(
                "preprocessing.blur_sigma",
                self.blur_sigma,
            ));
        }
        Ok(())
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self::a4_sheet()
    }
}

impl MeasureConfig {
    /// A4 sheet as reference, object resting on or beside it
    pub fn a4_sheet() -> Self {
        Self {
            preprocessing: PreprocessingConfig::default(),
            reference: ReferenceConfig {
                object: ReferenceObject::A4,
                policy: SelectionPolicy::AspectRatio {
                    min: thresholds::A4_RATIO_MIN,
                    max: thresholds::A4_RATIO_MAX,
                },
                min_area: thresholds::MIN_REFERENCE_AREA_PX,
                min_contours: thresholds::MIN_CONTOURS,
            },
            object: ObjectConfig {
                min_area: thresholds::MIN_OBJECT_AREA_PX,
                exclude_reference_overlap: false,
            },
            shape: ShapeConfig {
                tolerance_cm: thresholds::SHAPE_TOLERANCE_CM,
            },
            reconcile: ReconcileConfig::default(),
            wrap: WrapConfig::default(),
        }
    }

    /// Square printed marker of the given side, located by the marker detector
    pub fn fiducial_marker(side_cm: f64) -> Self {
        let mut config = Self::a4_sheet();
        config.reference.object = ReferenceObject::Marker { side_cm };
        config.reference.policy = SelectionPolicy::Fiducial;
        config.reference.min_contours = 1;
        config.object = ObjectConfig {
            min_area: thresholds::MIN_OBJECT_AREA_MARKER_PX,
            exclude_reference_overlap: true,
        };
        config
    }

    /// Square marker found among contours by squareness, no marker detector
    pub fn square_marker(side_cm: f64) -> Self {
        let mut config = Self::fiducial_marker(side_cm);
        config.reference.policy = SelectionPolicy::MostSquare {
            max_score: thresholds::MAX_SQUARENESS_SCORE,
        };
        config.reference.min_contours = thresholds::MIN_CONTOURS;
        config
    }

    /// ID-1 bank or loyalty card lying next to the object
    pub fn credit_card() -> Self {
        let mut config = Self::a4_sheet();
        config.reference.object = ReferenceObject::CreditCard;
        config.reference.policy = SelectionPolicy::AspectRatio {
            min: thresholds::CARD_RATIO_MIN,
            max: thresholds::CARD_RATIO_MAX,
        };
        config.object.exclude_reference_overlap = true;
        config
    }

    /// Reject configurations that would make the pipeline divide by zero
    pub fn validate(&self) -> Result<()> {
        let (long, short) = self.reference.object.dimensions_cm();
        if !(short > 0.0 && long >= short) {
            return Err(MeasureError::invalid_parameter(
                "reference.object",
                format!("{} x {} cm", long, short),
            ));
        }
        if let SelectionPolicy::AspectRatio { min, max } = self.reference.policy {
            if !(min > 0.0 && min <= max) {
                return Err(MeasureError::invalid_parameter(
                    "reference.policy",
                    format!("ratio {}..{}", min, max),
                ));
            }
        }
        if self.object.min_area < 0.0 {
            return Err(MeasureError::invalid_parameter("object.min_area", self.object.min_area));
        }
        if self.shape.tolerance_cm < 0.0 {
            return Err(MeasureError::invalid_parameter(
                "shape.tolerance_cm",
                self.shape.tolerance_cm,
            ));
        }
        if self.wrap.margin_cm < 0.0 {
            return Err(MeasureError::invalid_parameter("wrap.margin_cm", self.wrap.margin_cm));
        }
        self.preprocessing.validate()
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MeasureError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            MeasureError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MeasureError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            MeasureError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}
