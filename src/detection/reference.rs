//! Reference-object selection and pixel-to-centimetre scale
//!
//! Picks the candidate that represents the known-size reference (A4 sheet,
//! ID-1 card, square marker) and derives pixels-per-centimetre from it.
//! Selection is a policy:
//! - largest contour
//! - largest contour inside an aspect-ratio band
//! - most square contour, `|1 - w/h|` minimised
//! - first fiducial reported by a marker detector

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ReferenceConfig;
use crate::constants::reference;
use crate::geometry::{Candidate, Fiducial, Rect};
use crate::{MeasureError, Result};

/// Known-size object photographed next to the item being measured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReferenceObject {
    /// ISO 216 A4 sheet
    A4,
    /// ISO/IEC 7810 ID-1 card
    CreditCard,
    /// Printed square marker
    Marker { side_cm: f64 },
    /// Any rectangle of known size
    Custom { long_cm: f64, short_cm: f64 },
}

impl ReferenceObject {
    /// Physical (long, short) sides in centimetres
    pub fn dimensions_cm(&self) -> (f64, f64) {
        match *self {
            ReferenceObject::A4 => (reference::A4_LONG_CM, reference::A4_SHORT_CM),
            ReferenceObject::CreditCard => (reference::CARD_LONG_CM, reference::CARD_SHORT_CM),
            ReferenceObject::Marker { side_cm } => (side_cm, side_cm),
            ReferenceObject::Custom { long_cm, short_cm } => {
                (long_cm.max(short_cm), long_cm.min(short_cm))
            }
        }
    }

    pub fn name(&self) -> String {
        match self {
            ReferenceObject::A4 => "A4 Sheet".to_string(),
            ReferenceObject::CreditCard => "Credit Card".to_string(),
            ReferenceObject::Marker { side_cm } => format!("{} cm Marker", side_cm),
            ReferenceObject::Custom { long_cm, short_cm } => {
                format!("{} x {} cm Reference", long_cm, short_cm)
            }
        }
    }
}

/// How the reference is chosen among the candidates of one photo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionPolicy {
    LargestArea,
    AspectRatio { min: f64, max: f64 },
    MostSquare { max_score: f64 },
    Fiducial,
}

/// Where the reference rectangle came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReferenceSource {
    /// Index into the candidate list
    Candidate { index: usize },
    /// Index into the fiducial list
    Fiducial { index: usize },
}

/// Pixel scale established by the reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub pixels_per_cm: f64,
    pub reference: Rect,
    pub source: ReferenceSource,
}

impl Scale {
    /// Candidate index claimed by the reference, if it came from the candidates
    pub fn candidate_index(&self) -> Option<usize> {
        match self.source {
            ReferenceSource::Candidate { index } => Some(index),
            ReferenceSource::Fiducial { .. } => None,
        }
    }
}

/// Reference detector implementing the configured selection policy
#[derive(Debug, Clone)]
pub struct ReferenceEstimator {
    object: ReferenceObject,
    policy: SelectionPolicy,
    min_area: f64,
    min_contours: usize,
}

impl ReferenceEstimator {
    pub fn new(config: &ReferenceConfig) -> Self {
        Self {
            object: config.object,
            policy: config.policy,
            min_area: config.min_area,
            min_contours: config.min_contours,
        }
    }

    /// Create an estimator with custom parameters
    pub fn with_params(object: ReferenceObject, policy: SelectionPolicy, min_area: f64) -> Self {
        Self {
            object,
            policy,
            min_area,
            min_contours: 1,
        }
    }

    pub fn object(&self) -> ReferenceObject {
        self.object
    }

    /// Select the reference and compute pixels-per-cm
    ///
    /// # Errors
    ///
    /// Returns `MeasureError::ReferenceNotFound` if:
    /// - fewer candidates than `min_contours` were detected
    /// - no candidate (or fiducial) satisfies the policy
    /// - the reference is degenerate and would yield no finite scale
    pub fn estimate(&self, candidates: &[Candidate], fiducials: &[Fiducial]) -> Result<Scale> {
        if self.policy == SelectionPolicy::Fiducial {
            return self.estimate_from_fiducial(fiducials);
        }

        if candidates.len() < self.min_contours {
            return Err(MeasureError::reference_not_found(format!(
                "Not enough contours detected ({} found, {} required)",
                candidates.len(),
                self.min_contours
            )));
        }

        let index = self.select(candidates).ok_or_else(|| {
            MeasureError::reference_not_found(format!(
                "No contour matches the {} ({:?})",
                self.object.name(),
                self.policy
            ))
        })?;

        let reference = candidates[index].rect;
        let pixels_per_cm = pixels_per_cm(&reference, &self.object).ok_or_else(|| {
            MeasureError::reference_not_found(format!(
                "Degenerate reference rectangle {:?}",
                reference
            ))
        })?;

        debug!(
            "reference candidate {} of {}: {:.1} x {:.1} px -> {:.3} px/cm",
            index,
            candidates.len(),
            reference.width(),
            reference.height(),
            pixels_per_cm
        );

        Ok(Scale {
            pixels_per_cm,
            reference,
            source: ReferenceSource::Candidate { index },
        })
    }

    fn estimate_from_fiducial(&self, fiducials: &[Fiducial]) -> Result<Scale> {
        let fiducial = fiducials
            .first()
            .ok_or_else(|| MeasureError::reference_not_found("No marker detected"))?;

        let reference = fiducial.to_rect();
        let pixels_per_cm = pixels_per_cm(&reference, &self.object)
            .ok_or_else(|| MeasureError::reference_not_found("Detected marker has no extent"))?;

        debug!(
            "marker mean side {:.1} px -> {:.3} px/cm",
            fiducial.mean_side(),
            pixels_per_cm
        );

        Ok(Scale {
            pixels_per_cm,
            reference,
            source: ReferenceSource::Fiducial { index: 0 },
        })
    }

    /// Index of the candidate chosen by the policy; ties keep the first seen
    fn select(&self, candidates: &[Candidate]) -> Option<usize> {
        let eligible = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.area >= self.min_area);

        match self.policy {
            SelectionPolicy::LargestArea => largest(eligible),
            SelectionPolicy::AspectRatio { min, max } => largest(eligible.filter(|(_, c)| {
                c.rect
                    .aspect_ratio()
                    .is_some_and(|ratio| ratio >= min && ratio <= max)
            })),
            SelectionPolicy::MostSquare { max_score } => {
                let mut best: Option<(usize, f64)> = None;
                for (index, candidate) in eligible {
                    let Some(score) = candidate.rect.squareness_score() else {
                        continue;
                    };
                    if best.map_or(true, |(_, best_score)| score < best_score) {
                        best = Some((index, score));
                    }
                }
                best.filter(|(_, score)| *score <= max_score)
                    .map(|(index, _)| index)
            }
            SelectionPolicy::Fiducial => None,
        }
    }
}

fn largest<'a>(candidates: impl Iterator<Item = (usize, &'a Candidate)>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates {
        if best.map_or(true, |(_, area)| candidate.area > area) {
            best = Some((index, candidate.area));
        }
    }
    best.map(|(index, _)| index)
}

/// Pixels per centimetre for a rectangle showing `object`
///
/// A square reference uses the mean of its two sides over the physical side.
/// A rectangular reference averages the long-side and short-side ratios,
/// which is the same formula when both physical sides are equal.
/// Returns `None` unless the result is finite and positive.
pub fn pixels_per_cm(rect: &Rect, object: &ReferenceObject) -> Option<f64> {
    let (long_cm, short_cm) = object.dimensions_cm();
    if !(short_cm > 0.0) {
        return None;
    }
    let scale = if long_cm == short_cm {
        (rect.width() + rect.height()) / 2.0 / long_cm
    } else {
        (rect.long_side() / long_cm + rect.short_side() / short_cm) / 2.0
    };
    (scale.is_finite() && scale > 0.0).then_some(scale)
}
