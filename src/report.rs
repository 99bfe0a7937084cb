//! Plain-text status and summary output

use std::fmt::Write;

use crate::measurement::{FinalDimensions, MeasurementSession, ViewKind};
use crate::wrap::{FoldGuide, PaperChoice, WrapPlan};
use crate::MeasurementResult;

/// Result text for a single photo
pub fn measurement_text(result: &MeasurementResult) -> String {
    format!(
        "Reference: {}\nDetected Shape: {}\nObject Width: {:.2} cm\nObject Height: {:.2} cm",
        result.reference.name(),
        result.object.shape,
        result.object.width_cm,
        result.object.height_cm
    )
}

/// One line per view, then the final dimensions or what is still missing
pub fn session_status(session: &MeasurementSession) -> String {
    let mut out = String::new();
    for kind in ViewKind::ALL {
        match session.view(kind) {
            Some(view) => {
                let _ = writeln!(out, "{}: {}", kind, view);
            }
            None => {
                let _ = writeln!(out, "{}: pending", kind);
            }
        }
    }
    match session.final_dimensions() {
        Some(dims) => {
            let _ = write!(out, "Final: {}", dims);
        }
        None => {
            let missing: Vec<String> = session
                .pending_views()
                .iter()
                .map(ToString::to_string)
                .collect();
            let _ = write!(out, "Final: pending ({})", missing.join(", "));
        }
    }
    out
}

/// Paper size and recommendation
pub fn plan_text(plan: &WrapPlan) -> String {
    let choice = match &plan.choice {
        PaperChoice::Sheet {
            sheet,
            rotated,
            waste_cm2,
        } => format!(
            "Use sheet: {} ({:.1} x {:.1} cm{}), waste {:.0} cm^2",
            sheet.name,
            sheet.width_cm,
            sheet.height_cm,
            if *rotated { ", turned" } else { "" },
            waste_cm2
        ),
        PaperChoice::Roll {
            width_cm,
            cut_length_cm,
        } => format!("Use roll: {:.0} cm wide, cut {:.2} cm", width_cm, cut_length_cm),
    };
    format!(
        "Paper needed: {:.2} x {:.2} cm\n{}",
        plan.paper.length_cm, plan.paper.width_cm, choice
    )
}

/// Current fold step as `Step n/6 (method): instruction`
pub fn guide_text(guide: &FoldGuide) -> String {
    format!(
        "Step {}/{} ({}): {}",
        guide.step() + 1,
        guide.method().instructions().len(),
        guide.method(),
        guide.instruction()
    )
}

/// Boxed summary card for the finished measurement
pub fn summary_card(dims: &FinalDimensions, plan: &WrapPlan, guide: Option<&FoldGuide>) -> String {
    let mut lines = vec![
        "GIFT WRAP SUMMARY".to_string(),
        format!("Box L x W x H: {:.2} x {:.2} x {:.2} cm", dims.l, dims.w, dims.h),
    ];
    if dims.top_view_deviation_cm > 0.0 {
        lines.push(format!("Top view cross-check: {:.2} cm off", dims.top_view_deviation_cm));
    }
    lines.extend(plan_text(plan).lines().map(str::to_string));
    if let Some(guide) = guide {
        lines.push(format!("Method: {}", guide.method()));
    }

    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let border = format!("+{}+", "-".repeat(width + 2));
    let mut card = String::new();
    let _ = writeln!(card, "{}", border);
    for line in &lines {
        let _ = writeln!(card, "| {:<width$} |", line, width = width);
    }
    card.push_str(&border);
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReconcileConfig, WrapConfig};
    use crate::detection::reference::ReferenceSource;
    use crate::detection::{ReferenceObject, Scale};
    use crate::geometry::Rect;
    use crate::measurement::{ObjectMeasurement, Shape, ViewMeasurement};
    use crate::wrap::{plan_wrap, WrapMethod};

    fn dims() -> FinalDimensions {
        FinalDimensions {
            l: 20.0,
            w: 10.0,
            h: 8.2,
            top_view_deviation_cm: 0.0,
        }
    }

    #[test]
    fn test_measurement_text() {
        let result = MeasurementResult {
            reference: ReferenceObject::A4,
            scale: Scale {
                pixels_per_cm: 10.0,
                reference: Rect::axis(0.0, 0.0, 297.0, 210.0),
                source: ReferenceSource::Candidate { index: 0 },
            },
            object: ObjectMeasurement {
                width_cm: 10.0,
                height_cm: 5.0,
                shape: Shape::Rectangle,
                rect: Rect::axis(50.0, 50.0, 100.0, 50.0),
            },
            candidate_count: 2,
            processing_time_ms: 0,
        };
        assert_eq!(
            measurement_text(&result),
            "Reference: A4 Sheet\nDetected Shape: Rectangle\n\
             Object Width: 10.00 cm\nObject Height: 5.00 cm"
        );
    }

    #[test]
    fn test_session_status_lists_pending() {
        let session = MeasurementSession::new()
            .record(ViewMeasurement::Top { l: 20.0, w: 10.0 }, &ReconcileConfig::default());
        let status = session_status(&session);
        assert!(status.contains("top: L: 20.00 cm, W: 10.00 cm"));
        assert!(status.contains("side 1: pending"));
        assert!(status.ends_with("Final: pending (side 1, side 2)"));
    }

    #[test]
    fn test_plan_text_for_sheet() {
        let plan = plan_wrap(&dims(), &WrapConfig::default()).unwrap();
        let text = plan_text(&plan);
        assert!(text.starts_with("Paper needed: 39.40 x 29.40 cm"));
        assert!(text.contains("Use sheet:"));
    }

    #[test]
    fn test_summary_card_is_boxed() {
        let plan = plan_wrap(&dims(), &WrapConfig::default()).unwrap();
        let guide = FoldGuide::new(&dims(), WrapMethod::Classic, 3.0);
        let card = summary_card(&dims(), &plan, Some(&guide));

        let lines: Vec<&str> = card.lines().collect();
        assert!(lines.first().unwrap().starts_with("+-"));
        assert!(lines.last().unwrap().starts_with("+-"));
        let width = lines[0].len();
        assert!(lines.iter().all(|l| l.len() == width));
        assert!(card.contains("Box L x W x H: 20.00 x 10.00 x 8.20 cm"));
        assert!(card.contains("Method: Classic"));
    }

    #[test]
    fn test_guide_text() {
        let guide = FoldGuide::new(&dims(), WrapMethod::Diagonal, 3.0).next();
        assert!(guide_text(&guide).starts_with("Step 2/6 (Diagonal): "));
    }
}
