//! Object rectangle selection
//!
//! Among the candidates left after the reference has been claimed, the
//! largest one above the noise floor is the measured object.

use log::debug;

use crate::config::ObjectConfig;
use crate::detection::reference::Scale;
use crate::geometry::Candidate;
use crate::{MeasureError, Result};

/// Object selector excluding the reference and sub-threshold noise
#[derive(Debug, Clone)]
pub struct ObjectSelector {
    min_area: f64,
    exclude_reference_overlap: bool,
}

impl ObjectSelector {
    pub fn new(config: &ObjectConfig) -> Self {
        Self::with_params(config.min_area, config.exclude_reference_overlap)
    }

    pub fn with_params(min_area: f64, exclude_reference_overlap: bool) -> Self {
        Self {
            min_area,
            exclude_reference_overlap,
        }
    }

    /// Pick the object candidate; returns its index and value
    ///
    /// The candidate claimed by the reference is always skipped. With
    /// overlap exclusion enabled, so is every candidate whose bounds
    /// intersect the reference bounds. Ties keep the first seen.
    ///
    /// # Errors
    ///
    /// Returns `MeasureError::ObjectNotFound` when nothing remains.
    pub fn select(&self, candidates: &[Candidate], scale: &Scale) -> Result<(usize, Candidate)> {
        let reference_index = scale.candidate_index();
        let reference_bounds = scale.reference.bounds();

        let mut best: Option<(usize, Candidate)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            if Some(index) == reference_index {
                continue;
            }
            if candidate.area <= self.min_area {
                continue;
            }
            if self.exclude_reference_overlap
                && candidate.rect.bounds().intersects(&reference_bounds)
            {
                continue;
            }
            if best.map_or(true, |(_, b)| candidate.area > b.area) {
                best = Some((index, *candidate));
            }
        }

        let (index, candidate) = best.ok_or_else(|| {
            MeasureError::object_not_found(format!(
                "No contour above {:.0} px^2 besides the reference ({} candidates)",
                self.min_area,
                candidates.len()
            ))
        })?;

        debug!(
            "object candidate {}: {:.1} x {:.1} px, area {:.0}",
            index,
            candidate.rect.width(),
            candidate.rect.height(),
            candidate.area
        );

        Ok((index, candidate))
    }
}
