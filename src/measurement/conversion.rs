//! Pixel to centimetre conversion and footprint shape classification

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ShapeConfig;
use crate::geometry::Rect;
use crate::{MeasureError, Result};

/// Coarse footprint shape of a measured object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Width and height agree within the tolerance
    SquareOrCircle,
    Rectangle,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::SquareOrCircle => write!(f, "Square / Circle"),
            Shape::Rectangle => write!(f, "Rectangle"),
        }
    }
}

/// One object measured in one photo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeasurement {
    pub width_cm: f64,
    pub height_cm: f64,
    pub shape: Shape,
    /// Object rectangle in pixel coordinates
    pub rect: Rect,
}

impl ObjectMeasurement {
    pub fn long_side_cm(&self) -> f64 {
        self.width_cm.max(self.height_cm)
    }

    pub fn short_side_cm(&self) -> f64 {
        self.width_cm.min(self.height_cm)
    }
}

/// Shape classifier comparing centimetre sides
#[derive(Debug, Clone, Copy)]
pub struct ShapeClassifier {
    tolerance_cm: f64,
}

impl ShapeClassifier {
    pub fn new(config: &ShapeConfig) -> Self {
        Self::with_tolerance(config.tolerance_cm)
    }

    pub fn with_tolerance(tolerance_cm: f64) -> Self {
        Self { tolerance_cm }
    }

    pub fn classify(&self, width_cm: f64, height_cm: f64) -> Shape {
        if (width_cm - height_cm).abs() < self.tolerance_cm {
            Shape::SquareOrCircle
        } else {
            Shape::Rectangle
        }
    }
}

/// Convert a pixel length to centimetres
pub fn to_cm(pixels: f64, pixels_per_cm: f64) -> Result<f64> {
    if !(pixels_per_cm.is_finite() && pixels_per_cm > 0.0) {
        return Err(MeasureError::invalid_parameter("pixels_per_cm", pixels_per_cm));
    }
    Ok(pixels / pixels_per_cm)
}

/// Measure an object rectangle at the given scale
pub fn measure_object(
    rect: &Rect,
    pixels_per_cm: f64,
    classifier: &ShapeClassifier,
) -> Result<ObjectMeasurement> {
    let width_cm = to_cm(rect.width(), pixels_per_cm)?;
    let height_cm = to_cm(rect.height(), pixels_per_cm)?;
    Ok(ObjectMeasurement {
        width_cm,
        height_cm,
        shape: classifier.classify(width_cm, height_cm),
        rect: *rect,
    })
}
