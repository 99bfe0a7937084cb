//! # Giftwrap Measure
//!
//! A Rust crate for measuring boxes from phone photos and planning the
//! wrapping paper they need.
//!
//! This library provides:
//! - Reference detection (A4 sheet, bank card or printed marker) and a
//!   pixels-per-centimetre scale
//! - Object selection and centimetre conversion with a coarse shape label
//! - Three-view reconciliation (top, side 1, side 2) into L x W x H
//! - Paper sizing with catalog sheets or roll fallback
//! - A six-step fold guide with a progressively revealed diagram
//!
//! ## Example
//!
//! ```rust,no_run
//! use giftwrap_measure::{analyze_photo, MeasurementResult};
//! use std::path::Path;
//!
//! let result: MeasurementResult = analyze_photo(Path::new("photo.jpg"))?;
//! let object = &result.object;
//! println!("{:.2} x {:.2} cm, {}", object.width_cm, object.height_cm, object.shape);
//! # Ok::<(), giftwrap_measure::MeasureError>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod capture;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod exif;
pub mod geometry;
pub mod image_loader;
pub mod measurement;
pub mod pipeline;
pub mod report;
pub mod vision;
pub mod wrap;

pub use config::MeasureConfig;
pub use detection::{ReferenceObject, Scale};
pub use error::{MeasureError, Result};
pub use measurement::{FinalDimensions, MeasurementSession, ObjectMeasurement, Shape, ViewKind};
pub use pipeline::{analyze_photo, measure_candidates, Measurer};
pub use wrap::{plan_wrap, FoldGuide, WrapMethod, WrapPlan};

/// Single-photo measurement result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Reference object the scale was derived from
    pub reference: ReferenceObject,
    /// Pixel scale and the reference rectangle
    pub scale: Scale,
    /// Measured object in centimetres
    pub object: ObjectMeasurement,
    /// Number of candidate rectangles the backend reported
    pub candidate_count: usize,
    pub processing_time_ms: u64,
}
