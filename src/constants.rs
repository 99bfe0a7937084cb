//! Reference sizes and default thresholds for measurement and wrapping
//!
//! Compile-time constants shared by the presets in [`crate::config`].

/// Physical sizes of supported reference objects, in centimetres
pub mod reference {
    /// ISO 216 A4 sheet long side
    pub const A4_LONG_CM: f64 = 29.7;

    /// ISO 216 A4 sheet short side
    pub const A4_SHORT_CM: f64 = 21.0;

    /// ISO/IEC 7810 ID-1 card width
    pub const CARD_LONG_CM: f64 = 8.56;

    /// ISO/IEC 7810 ID-1 card height
    pub const CARD_SHORT_CM: f64 = 5.398;

    /// Default printed marker side
    pub const MARKER_SIDE_CM: f64 = 5.0;

    /// Large printed marker side
    pub const MARKER_LARGE_SIDE_CM: f64 = 10.0;
}

/// Candidate selection thresholds
pub mod thresholds {
    /// Lower bound of the long/short ratio accepted as an A4 sheet
    pub const A4_RATIO_MIN: f64 = 1.3;

    /// Upper bound of the long/short ratio accepted as an A4 sheet
    pub const A4_RATIO_MAX: f64 = 1.55;

    /// Lower bound of the ratio accepted as an ID-1 card (nominal 1.586)
    pub const CARD_RATIO_MIN: f64 = 1.45;

    /// Upper bound of the ratio accepted as an ID-1 card
    pub const CARD_RATIO_MAX: f64 = 1.75;

    /// Worst `|1 - w/h|` still accepted as a square marker
    pub const MAX_SQUARENESS_SCORE: f64 = 0.2;

    /// Minimum reference area in px^2
    pub const MIN_REFERENCE_AREA_PX: f64 = 1000.0;

    /// Minimum object area in px^2 for the A4 pipeline
    pub const MIN_OBJECT_AREA_PX: f64 = 2000.0;

    /// Minimum object area in px^2 when a small marker is the reference
    pub const MIN_OBJECT_AREA_MARKER_PX: f64 = 6000.0;

    /// A photo needs a reference and an object
    pub const MIN_CONTOURS: usize = 2;

    /// `|width_cm - height_cm|` below which a footprint is square or round
    pub const SHAPE_TOLERANCE_CM: f64 = 1.5;

    /// Top view vs side views disagreement that triggers a warning
    pub const CROSS_CHECK_TOLERANCE_CM: f64 = 1.0;
}

/// Image processing parameters
pub mod processing {
    /// Gaussian sigma matching a 5x5 kernel with automatic sigma
    pub const BLUR_SIGMA: f32 = 1.1;

    /// Canny hysteresis thresholds
    pub const CANNY_LOW_THRESHOLD: f32 = 50.0;
    pub const CANNY_HIGH_THRESHOLD: f32 = 150.0;

    /// Marker blobs smaller than this many pixels are noise
    pub const MARKER_MIN_BLOB_PIXELS: u32 = 1500;

    /// Marker bounding boxes narrower than this are rejected
    pub const MARKER_MIN_SIDE_PX: u32 = 30;

    /// Maximum number of fiducials reported per frame
    pub const MARKER_MAX_CANDIDATES: usize = 5;
}

/// Wrapping paper parameters
pub mod wrap {
    /// Overlap added to each paper dimension
    pub const MARGIN_CM: f64 = 3.0;

    /// Standard roll widths, ascending
    pub const ROLL_WIDTHS_CM: [f64; 3] = [50.0, 70.0, 100.0];

    /// Number of steps in every fold guide
    pub const GUIDE_STEPS: usize = 6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_ratio_band_contains_a4() {
        let ratio = reference::A4_LONG_CM / reference::A4_SHORT_CM;
        assert!(ratio > thresholds::A4_RATIO_MIN && ratio < thresholds::A4_RATIO_MAX);
    }

    #[test]
    fn test_card_ratio_band_contains_card() {
        let ratio = reference::CARD_LONG_CM / reference::CARD_SHORT_CM;
        assert!(ratio > thresholds::CARD_RATIO_MIN && ratio < thresholds::CARD_RATIO_MAX);
    }

    #[test]
    fn test_roll_widths_ascending() {
        assert!(wrap::ROLL_WIDTHS_CM.windows(2).all(|w| w[0] < w[1]));
        assert!(thresholds::MIN_OBJECT_AREA_PX < thresholds::MIN_OBJECT_AREA_MARKER_PX);
    }
}
