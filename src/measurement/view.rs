//! Per-photo view measurements

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::measurement::conversion::ObjectMeasurement;

/// Which face of the box a photo shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    Top,
    Side1,
    Side2,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Top, ViewKind::Side1, ViewKind::Side2];
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Top => write!(f, "top"),
            ViewKind::Side1 => write!(f, "side 1"),
            ViewKind::Side2 => write!(f, "side 2"),
        }
    }
}

/// Centimetre pair read from one view
///
/// The long side of the photographed face maps to the first field:
/// top gives (L, W), side 1 gives (H, W), side 2 gives (H, L).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewMeasurement {
    Top { l: f64, w: f64 },
    Side1 { h: f64, w: f64 },
    Side2 { h: f64, l: f64 },
}

impl ViewMeasurement {
    pub fn from_object(kind: ViewKind, object: &ObjectMeasurement) -> Self {
        Self::from_sides(kind, object.long_side_cm(), object.short_side_cm())
    }

    /// Build from two sides in any order
    pub fn from_sides(kind: ViewKind, a_cm: f64, b_cm: f64) -> Self {
        let long = a_cm.max(b_cm);
        let short = a_cm.min(b_cm);
        match kind {
            ViewKind::Top => ViewMeasurement::Top { l: long, w: short },
            ViewKind::Side1 => ViewMeasurement::Side1 { h: long, w: short },
            ViewKind::Side2 => ViewMeasurement::Side2 { h: long, l: short },
        }
    }

    pub fn kind(&self) -> ViewKind {
        match self {
            ViewMeasurement::Top { .. } => ViewKind::Top,
            ViewMeasurement::Side1 { .. } => ViewKind::Side1,
            ViewMeasurement::Side2 { .. } => ViewKind::Side2,
        }
    }
}

impl fmt::Display for ViewMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMeasurement::Top { l, w } => write!(f, "L: {:.2} cm, W: {:.2} cm", l, w),
            ViewMeasurement::Side1 { h, w } => write!(f, "H: {:.2} cm, W: {:.2} cm", h, w),
            ViewMeasurement::Side2 { h, l } => write!(f, "H: {:.2} cm, L: {:.2} cm", h, l),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_contract() {
        assert_eq!(
            ViewMeasurement::from_sides(ViewKind::Top, 10.0, 20.0),
            ViewMeasurement::Top { l: 20.0, w: 10.0 }
        );
        assert_eq!(
            ViewMeasurement::from_sides(ViewKind::Side1, 10.0, 8.0),
            ViewMeasurement::Side1 { h: 10.0, w: 8.0 }
        );
        assert_eq!(
            ViewMeasurement::from_sides(ViewKind::Side2, 8.4, 20.0),
            ViewMeasurement::Side2 { h: 20.0, l: 8.4 }
        );
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in ViewKind::ALL {
            assert_eq!(ViewMeasurement::from_sides(kind, 1.0, 2.0).kind(), kind);
        }
    }
}
