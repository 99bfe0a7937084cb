//! Wrapping paper size and sheet selection
//!
//! The flat sheet for a box wrap is `L + 2H + margin` by `W + 2H + margin`.
//! The best sheet is the catalog entry wasting the least area while covering
//! that size in either orientation. When no sheet fits, a roll width is
//! suggested together with the length to cut.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::WrapConfig;
use crate::measurement::session::FinalDimensions;
use crate::{MeasureError, Result};

/// A predefined flat sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSheet {
    pub name: String,
    pub width_cm: f64,
    pub height_cm: f64,
}

impl PaperSheet {
    pub fn new(name: impl Into<String>, width_cm: f64, height_cm: f64) -> Self {
        Self {
            name: name.into(),
            width_cm,
            height_cm,
        }
    }

    pub fn area(&self) -> f64 {
        self.width_cm * self.height_cm
    }

    /// `Some(rotated)` when the sheet covers the paper; upright is tried first
    pub fn fit(&self, paper: &PaperSize) -> Option<bool> {
        if self.width_cm >= paper.length_cm && self.height_cm >= paper.width_cm {
            Some(false)
        } else if self.height_cm >= paper.length_cm && self.width_cm >= paper.width_cm {
            Some(true)
        } else {
            None
        }
    }

    /// Common retail sheets, smallest first
    pub fn default_catalog() -> Vec<PaperSheet> {
        vec![
            PaperSheet::new("A3", 29.7, 42.0),
            PaperSheet::new("A2", 42.0, 59.4),
            PaperSheet::new("Gift sheet 50x70", 50.0, 70.0),
            PaperSheet::new("A1", 59.4, 84.1),
            PaperSheet::new("Gift sheet 70x100", 70.0, 100.0),
        ]
    }
}

/// Flat paper needed to wrap a box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperSize {
    /// Along the box length
    pub length_cm: f64,
    /// Along the box width
    pub width_cm: f64,
}

impl PaperSize {
    pub fn new(length_cm: f64, width_cm: f64) -> Self {
        Self {
            length_cm,
            width_cm,
        }
    }

    pub fn area(&self) -> f64 {
        self.length_cm * self.width_cm
    }
}

/// Paper required for `dims` with `margin_cm` of overlap
pub fn required_paper(dims: &FinalDimensions, margin_cm: f64) -> PaperSize {
    PaperSize::new(
        dims.l + 2.0 * dims.h + margin_cm,
        dims.w + 2.0 * dims.h + margin_cm,
    )
}

/// The recommended paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaperChoice {
    Sheet {
        sheet: PaperSheet,
        /// Sheet is turned 90 degrees relative to the paper layout
        rotated: bool,
        waste_cm2: f64,
    },
    Roll {
        width_cm: f64,
        cut_length_cm: f64,
    },
}

/// Least-waste catalog sheet covering `paper`; ties keep the first seen
pub fn select_sheet(paper: &PaperSize, sheets: &[PaperSheet]) -> Option<PaperChoice> {
    let mut best: Option<(&PaperSheet, bool, f64)> = None;
    for sheet in sheets {
        let Some(rotated) = sheet.fit(paper) else {
            continue;
        };
        let waste = sheet.area() - paper.area();
        if best.map_or(true, |(_, _, best_waste)| waste < best_waste) {
            best = Some((sheet, rotated, waste));
        }
    }
    best.map(|(sheet, rotated, waste_cm2)| PaperChoice::Sheet {
        sheet: sheet.clone(),
        rotated,
        waste_cm2,
    })
}

/// Narrowest roll covering one paper dimension, cut to the other
pub fn select_roll(paper: &PaperSize, roll_widths_cm: &[f64]) -> Option<PaperChoice> {
    let mut widths = roll_widths_cm.to_vec();
    widths.sort_by(f64::total_cmp);

    widths.into_iter().find_map(|width_cm| {
        if width_cm >= paper.width_cm {
            Some(PaperChoice::Roll {
                width_cm,
                cut_length_cm: paper.length_cm,
            })
        } else if width_cm >= paper.length_cm {
            Some(PaperChoice::Roll {
                width_cm,
                cut_length_cm: paper.width_cm,
            })
        } else {
            None
        }
    })
}

/// Complete paper recommendation for a box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapPlan {
    pub dimensions: FinalDimensions,
    pub paper: PaperSize,
    pub choice: PaperChoice,
}

/// Size the paper and pick a sheet, falling back to a roll
///
/// # Errors
///
/// Returns `MeasureError::NoPaperFits` when neither a sheet nor a roll is
/// large enough.
pub fn plan_wrap(dims: &FinalDimensions, config: &WrapConfig) -> Result<WrapPlan> {
    let paper = required_paper(dims, config.margin_cm);
    let choice = select_sheet(&paper, &config.sheets)
        .or_else(|| select_roll(&paper, &config.roll_widths_cm))
        .ok_or(MeasureError::NoPaperFits {
            paper_l: paper.length_cm,
            paper_w: paper.width_cm,
        })?;

    debug!(
        "paper {:.1} x {:.1} cm -> {:?}",
        paper.length_cm, paper.width_cm, choice
    );

    Ok(WrapPlan {
        dimensions: *dims,
        paper,
        choice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(l: f64, w: f64, h: f64) -> FinalDimensions {
        FinalDimensions {
            l,
            w,
            h,
            top_view_deviation_cm: 0.0,
        }
    }

    #[test]
    fn test_required_paper() {
        let paper = required_paper(&dims(20.0, 10.0, 8.2), 3.0);
        assert!((paper.length_cm - 39.4).abs() < 1e-9);
        assert!((paper.width_cm - 29.4).abs() < 1e-9);
    }

    #[test]
    fn test_select_sheet_prefers_rotated_least_waste() {
        let paper = PaperSize::new(60.0, 40.0);
        let catalog = vec![
            PaperSheet::new("50x70", 50.0, 70.0),
            PaperSheet::new("70x100", 70.0, 100.0),
        ];
        match select_sheet(&paper, &catalog) {
            Some(PaperChoice::Sheet {
                sheet,
                rotated,
                waste_cm2,
            }) => {
                assert_eq!(sheet.name, "50x70");
                assert!(rotated);
                assert!((waste_cm2 - 1100.0).abs() < 1e-9);
            }
            other => panic!("Expected a sheet, got: {:?}", other),
        }
    }

    #[test]
    fn test_select_sheet_tie_keeps_first_seen() {
        let paper = PaperSize::new(60.0, 40.0);
        let catalog = vec![
            PaperSheet::new("first", 70.0, 50.0),
            PaperSheet::new("second", 50.0, 70.0),
        ];
        for _ in 0..3 {
            match select_sheet(&paper, &catalog) {
                Some(PaperChoice::Sheet { sheet, rotated, .. }) => {
                    assert_eq!(sheet.name, "first");
                    assert!(!rotated);
                }
                other => panic!("Expected a sheet, got: {:?}", other),
            }
        }
    }

    #[test]
    fn test_roll_fallback() {
        let paper = PaperSize::new(120.0, 65.0);
        let catalog = vec![PaperSheet::new("50x70", 50.0, 70.0)];
        assert!(select_sheet(&paper, &catalog).is_none());
        assert_eq!(
            select_roll(&paper, &[100.0, 50.0, 70.0]),
            Some(PaperChoice::Roll {
                width_cm: 70.0,
                cut_length_cm: 120.0
            })
        );
    }

    #[test]
    fn test_roll_covering_length_cuts_width() {
        let paper = PaperSize::new(45.0, 60.0);
        assert_eq!(
            select_roll(&paper, &[50.0]),
            Some(PaperChoice::Roll {
                width_cm: 50.0,
                cut_length_cm: 60.0
            })
        );
    }

    #[test]
    fn test_plan_wrap_no_fit() {
        let mut config = WrapConfig::default();
        config.sheets.clear();
        config.roll_widths_cm = vec![30.0];
        let result = plan_wrap(&dims(50.0, 40.0, 30.0), &config);
        assert!(matches!(result, Err(MeasureError::NoPaperFits { .. })));
    }

    #[test]
    fn test_plan_wrap_default_catalog() {
        let plan = plan_wrap(&dims(20.0, 10.0, 8.2), &WrapConfig::default()).unwrap();
        // 39.4 x 29.4 fits A3 upright is impossible (29.7 < 39.4), rotated A3 is 42 x 29.7
        match plan.choice {
            PaperChoice::Sheet { sheet, rotated, .. } => {
                assert_eq!(sheet.name, "A3");
                assert!(rotated);
            }
            other => panic!("Expected a sheet, got: {:?}", other),
        }
    }
}
