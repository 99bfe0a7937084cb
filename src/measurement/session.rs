//! Multi-view measurement session
//!
//! A [`MeasurementSession`] is a value: every operation takes a session and
//! returns a new one, so a failed capture cannot corrupt the previous state.
//! Final dimensions appear once the top view and both side views exist.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ReconcileConfig, WrapConfig};
use crate::measurement::view::{ViewKind, ViewMeasurement};
use crate::wrap::guide::{FoldGuide, WrapMethod};
use crate::{MeasureError, Result};

/// Reconciled box dimensions in centimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalDimensions {
    pub l: f64,
    pub w: f64,
    pub h: f64,
    /// Largest disagreement between the top view and the side-derived L/W
    pub top_view_deviation_cm: f64,
}

impl fmt::Display for FinalDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L: {:.2} cm, W: {:.2} cm, H: {:.2} cm", self.l, self.w, self.h)
    }
}

/// Combine the three views into final dimensions
///
/// Side views are authoritative: `L` comes from side 2, `W` from side 1 and
/// `H` is the mean of both side heights. The top view only serves as a
/// cross-check, reported in `top_view_deviation_cm`.
pub fn reconcile(
    top: (f64, f64),
    side1: (f64, f64),
    side2: (f64, f64),
    config: &ReconcileConfig,
) -> FinalDimensions {
    let (top_l, top_w) = top;
    let (h1, w) = side1;
    let (h2, l) = side2;
    let h = (h1 + h2) / 2.0;

    let top_view_deviation_cm = (top_l - l).abs().max((top_w - w).abs());
    if top_view_deviation_cm > config.cross_check_tolerance_cm {
        warn!(
            "top view ({:.2} x {:.2} cm) disagrees with side views ({:.2} x {:.2} cm) by {:.2} cm",
            top_l, top_w, l, w, top_view_deviation_cm
        );
    }

    FinalDimensions {
        l,
        w,
        h,
        top_view_deviation_cm,
    }
}

/// Captured views and derived results of one measuring session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSession {
    top: Option<ViewMeasurement>,
    side1: Option<ViewMeasurement>,
    side2: Option<ViewMeasurement>,
    final_dimensions: Option<FinalDimensions>,
    guide: Option<FoldGuide>,
}

impl MeasurementSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh empty session
    pub fn reset(&self) -> Self {
        Self::default()
    }

    pub fn view(&self, kind: ViewKind) -> Option<&ViewMeasurement> {
        match kind {
            ViewKind::Top => self.top.as_ref(),
            ViewKind::Side1 => self.side1.as_ref(),
            ViewKind::Side2 => self.side2.as_ref(),
        }
    }

    /// Views still missing, in capture order
    pub fn pending_views(&self) -> Vec<ViewKind> {
        ViewKind::ALL
            .into_iter()
            .filter(|kind| self.view(*kind).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.final_dimensions.is_some()
    }

    pub fn final_dimensions(&self) -> Option<&FinalDimensions> {
        self.final_dimensions.as_ref()
    }

    /// Final dimensions, or `DimensionsPending` naming the missing views
    pub fn require_final(&self) -> Result<&FinalDimensions> {
        self.final_dimensions.as_ref().ok_or_else(|| MeasureError::DimensionsPending {
            missing: self
                .pending_views()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Store a view, replacing any earlier capture of the same face
    ///
    /// Reconciliation runs when all three views are present. Changing a
    /// view after completion recomputes the dimensions and drops the guide.
    pub fn record(&self, view: ViewMeasurement, config: &ReconcileConfig) -> Self {
        let mut next = Self {
            guide: None,
            final_dimensions: None,
            ..self.clone()
        };
        match view.kind() {
            ViewKind::Top => next.top = Some(view),
            ViewKind::Side1 => next.side1 = Some(view),
            ViewKind::Side2 => next.side2 = Some(view),
        }
        debug!("recorded {} view: {}", view.kind(), view);

        if let (
            Some(ViewMeasurement::Top { l: tl, w: tw }),
            Some(ViewMeasurement::Side1 { h: h1, w: w1 }),
            Some(ViewMeasurement::Side2 { h: h2, l: l2 }),
        ) = (next.top, next.side1, next.side2)
        {
            next.final_dimensions = Some(reconcile((tl, tw), (h1, w1), (h2, l2), config));
        }
        next
    }

    pub fn guide(&self) -> Option<&FoldGuide> {
        self.guide.as_ref()
    }

    /// Open the fold guide at step 0, with `wrap.method` unless overridden
    pub fn start_guide(&self, method: Option<WrapMethod>, wrap: &WrapConfig) -> Result<Self> {
        let dims = self.require_final()?;
        let method = method.unwrap_or(wrap.method);
        Ok(Self {
            guide: Some(FoldGuide::new(dims, method, wrap.margin_cm)),
            ..self.clone()
        })
    }

    pub fn guide_next(&self) -> Result<Self> {
        self.map_guide(FoldGuide::next)
    }

    pub fn guide_prev(&self) -> Result<Self> {
        self.map_guide(FoldGuide::prev)
    }

    fn map_guide(&self, step: impl FnOnce(FoldGuide) -> FoldGuide) -> Result<Self> {
        self.require_final()?;
        let guide = self.guide.ok_or_else(|| MeasureError::DimensionsPending {
            missing: "fold guide not started".to_string(),
        })?;
        Ok(Self {
            guide: Some(step(guide)),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_session() -> MeasurementSession {
        let config = ReconcileConfig::default();
        MeasurementSession::new()
            .record(ViewMeasurement::Top { l: 20.0, w: 10.0 }, &config)
            .record(ViewMeasurement::Side1 { h: 8.0, w: 10.0 }, &config)
            .record(ViewMeasurement::Side2 { h: 8.4, l: 20.0 }, &config)
    }

    #[test]
    fn test_reconciliation_averages_heights() {
        let session = complete_session();
        let dims = session.final_dimensions().unwrap();
        assert!((dims.l - 20.0).abs() < 1e-12);
        assert!((dims.w - 10.0).abs() < 1e-12);
        assert!((dims.h - 8.2).abs() < 1e-12);
        assert!(dims.top_view_deviation_cm.abs() < 1e-12);
    }

    #[test]
    fn test_side_views_are_authoritative() {
        let dims = reconcile(
            (22.0, 11.0),
            (8.0, 10.0),
            (8.4, 20.0),
            &ReconcileConfig::default(),
        );
        assert_eq!(dims.l, 20.0);
        assert_eq!(dims.w, 10.0);
        assert!((dims.top_view_deviation_cm - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_pending_views() {
        let config = ReconcileConfig::default();
        let session = MeasurementSession::new()
            .record(ViewMeasurement::Side1 { h: 8.0, w: 10.0 }, &config);
        assert_eq!(session.pending_views(), vec![ViewKind::Top, ViewKind::Side2]);
        assert!(!session.is_complete());
        match session.require_final() {
            Err(MeasureError::DimensionsPending { missing }) => {
                assert_eq!(missing, "top, side 2")
            }
            other => panic!("Expected DimensionsPending, got: {:?}", other),
        }
    }

    #[test]
    fn test_recapture_replaces_view() {
        let config = ReconcileConfig::default();
        let session = complete_session()
            .record(ViewMeasurement::Side2 { h: 9.0, l: 20.0 }, &config);
        let dims = session.final_dimensions().unwrap();
        assert!((dims.h - 8.5).abs() < 1e-12);
    }

    #[test]
    fn test_reset_returns_empty_session() {
        let session = complete_session();
        let fresh = session.reset();
        assert_eq!(fresh, MeasurementSession::new());
        assert!(session.is_complete());
    }

    #[test]
    fn test_guide_requires_dimensions() {
        let empty = MeasurementSession::new();
        assert!(matches!(
            empty.start_guide(Some(WrapMethod::Classic), &WrapConfig::default()),
            Err(MeasureError::DimensionsPending { .. })
        ));
        assert!(matches!(
            empty.guide_next(),
            Err(MeasureError::DimensionsPending { .. })
        ));
    }

    #[test]
    fn test_guide_navigation() {
        let session = complete_session()
            .start_guide(Some(WrapMethod::Classic), &WrapConfig::default())
            .unwrap();
        assert_eq!(session.guide().unwrap().step(), 0);

        let session = session.guide_next().unwrap().guide_next().unwrap();
        assert_eq!(session.guide().unwrap().step(), 2);

        let session = session.guide_prev().unwrap();
        assert_eq!(session.guide().unwrap().step(), 1);
    }

    #[test]
    fn test_guide_method_defaults_to_config() {
        let wrap = WrapConfig {
            method: WrapMethod::Diagonal,
            ..WrapConfig::default()
        };
        let session = complete_session().start_guide(None, &wrap).unwrap();
        assert_eq!(session.guide().unwrap().method(), WrapMethod::Diagonal);

        let session = complete_session()
            .start_guide(Some(WrapMethod::Classic), &wrap)
            .unwrap();
        assert_eq!(session.guide().unwrap().method(), WrapMethod::Classic);
    }

    #[test]
    fn test_recording_drops_guide() {
        let config = ReconcileConfig::default();
        let session = complete_session()
            .start_guide(Some(WrapMethod::Diagonal), &WrapConfig::default())
            .unwrap()
            .record(ViewMeasurement::Top { l: 20.5, w: 10.0 }, &config);
        assert!(session.guide().is_none());
        assert!(session.is_complete());
    }
}
