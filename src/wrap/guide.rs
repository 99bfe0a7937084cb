//! Step-by-step fold guide
//!
//! Six fixed instructions per wrap method plus a diagram of the paper net.
//! Every diagram element carries the step that reveals it, so a renderer
//! only draws [`FoldGuide::visible_elements`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::wrap::GUIDE_STEPS;
use crate::geometry::{Point, Rect, Size};
use crate::measurement::session::FinalDimensions;
use crate::wrap::sizing::{required_paper, PaperSize};

/// Index of the last guide step
pub const LAST_STEP: usize = GUIDE_STEPS - 1;

const CLASSIC_STEPS: [&str; GUIDE_STEPS] = [
    "Place the box top-down in the centre of the paper.",
    "Fold one long edge of the paper up over the box and hold it in place.",
    "Fold the opposite long edge over, turn its edge under and tape along the seam.",
    "At one end, push the side flaps inward so the top and bottom flaps form triangles.",
    "Fold the top triangle down, then the bottom triangle up, and tape it closed.",
    "Repeat the end fold on the other side and turn the box over.",
];

const DIAGONAL_STEPS: [&str; GUIDE_STEPS] = [
    "Turn the paper so a corner points at you and set the box top-down at its centre.",
    "Bring the nearest corner up over the box and crease along the box edge.",
    "Fold the left side up, tucking the excess into a diagonal pleat.",
    "Roll the box away from you over the pleat so the next face is covered.",
    "Fold the right side up and pleat it parallel to the first.",
    "Bring the last corner over the top, fold its edge under and tape it.",
];

/// Wrapping technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapMethod {
    /// Long-edge seam with folded triangular ends
    #[default]
    Classic,
    /// Corner-to-corner wrap with pleated sides
    Diagonal,
}

impl WrapMethod {
    pub fn instructions(&self) -> &'static [&'static str; GUIDE_STEPS] {
        match self {
            WrapMethod::Classic => &CLASSIC_STEPS,
            WrapMethod::Diagonal => &DIAGONAL_STEPS,
        }
    }
}

impl fmt::Display for WrapMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapMethod::Classic => write!(f, "Classic"),
            WrapMethod::Diagonal => write!(f, "Diagonal"),
        }
    }
}

/// Drawable primitive in paper-space centimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagramShape {
    Outline { rect: Rect },
    ShadedZone { rect: Rect },
    Arrow { from: Point, to: Point },
    Triangle { points: [Point; 3] },
    TapePoint { at: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagramElement {
    pub label: &'static str,
    pub shape: DiagramShape,
    /// First step at which the element is drawn
    pub reveal_step: usize,
}

impl DiagramElement {
    fn new(label: &'static str, shape: DiagramShape, reveal_step: usize) -> Self {
        Self {
            label,
            shape,
            reveal_step,
        }
    }
}

/// Cursor over the six fold steps for one box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredGuide")]
pub struct FoldGuide {
    method: WrapMethod,
    dimensions: FinalDimensions,
    paper: PaperSize,
    step: usize,
}

/// Serialized form; the step is clamped on the way in
#[derive(Deserialize)]
struct StoredGuide {
    method: WrapMethod,
    dimensions: FinalDimensions,
    paper: PaperSize,
    step: usize,
}

impl From<StoredGuide> for FoldGuide {
    fn from(stored: StoredGuide) -> Self {
        Self {
            method: stored.method,
            dimensions: stored.dimensions,
            paper: stored.paper,
            step: stored.step.min(LAST_STEP),
        }
    }
}

impl FoldGuide {
    /// Start a guide at step 0; needs computed final dimensions
    pub fn new(dimensions: &FinalDimensions, method: WrapMethod, margin_cm: f64) -> Self {
        Self {
            method,
            dimensions: *dimensions,
            paper: required_paper(dimensions, margin_cm),
            step: 0,
        }
    }

    pub fn method(&self) -> WrapMethod {
        self.method
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn paper(&self) -> PaperSize {
        self.paper
    }

    pub fn is_first(&self) -> bool {
        self.step == 0
    }

    pub fn is_last(&self) -> bool {
        self.step == LAST_STEP
    }

    /// Advance one step, staying on the last one
    pub fn next(self) -> Self {
        Self {
            step: (self.step + 1).min(LAST_STEP),
            ..self
        }
    }

    /// Go back one step, staying on the first one
    pub fn prev(self) -> Self {
        Self {
            step: self.step.saturating_sub(1),
            ..self
        }
    }

    /// Jump to a step, clamped to the valid range
    pub fn go_to(self, step: usize) -> Self {
        Self {
            step: step.min(LAST_STEP),
            ..self
        }
    }

    pub fn instruction(&self) -> &'static str {
        self.method.instructions()[self.step.min(LAST_STEP)]
    }

    /// Full paper net for this box and wrap method
    pub fn diagram(&self) -> Vec<DiagramElement> {
        match self.method {
            WrapMethod::Classic => self.classic_diagram(),
            WrapMethod::Diagonal => self.diagonal_diagram(),
        }
    }

    /// Long-edge seam with triangular end tucks
    fn classic_diagram(&self) -> Vec<DiagramElement> {
        let FinalDimensions { l, w, h, .. } = self.dimensions;
        let pl = self.paper.length_cm;
        let pw = self.paper.width_cm;
        let x0 = (pl - l) / 2.0;
        let y0 = (pw - w) / 2.0;
        let x1 = x0 + l;
        let y1 = y0 + w;
        let mid_x = pl / 2.0;
        let mid_y = pw / 2.0;
        let tuck = h.min(w / 2.0);

        let end_triangles = |edge: f64, outward: f64| {
            [
                [
                    Point::new(edge, y0),
                    Point::new(edge + outward, y0),
                    Point::new(edge, y0 + tuck),
                ],
                [
                    Point::new(edge, y1),
                    Point::new(edge + outward, y1),
                    Point::new(edge, y1 - tuck),
                ],
            ]
        };
        let [left_top, left_bottom] = end_triangles(x0, -h.min(x0));
        let [right_top, right_bottom] = end_triangles(x1, h.min(pl - x1));
        let centre = Point::new(mid_x, mid_y);

        vec![
            DiagramElement::new("paper", outline(0.0, 0.0, pl, pw), 0),
            DiagramElement::new("box", outline(x0, y0, l, w), 0),
            DiagramElement::new("near flap", shaded(0.0, y1, pl, pw - y1), 1),
            DiagramElement::new("fold near flap", arrow(Point::new(mid_x, pw), centre), 1),
            DiagramElement::new("far flap", shaded(0.0, 0.0, pl, y0), 2),
            DiagramElement::new("fold far flap", arrow(Point::new(mid_x, 0.0), centre), 2),
            DiagramElement::new("seam tape", tape(centre), 2),
            DiagramElement::new("left end", shaded(0.0, y0, x0, w), 3),
            DiagramElement::new("left top tuck", triangle(left_top), 3),
            DiagramElement::new("left bottom tuck", triangle(left_bottom), 3),
            DiagramElement::new(
                "fold left end",
                arrow(Point::new(0.0, mid_y), Point::new(x0, mid_y)),
                4,
            ),
            DiagramElement::new("left end tape", tape(Point::new(x0, mid_y)), 4),
            DiagramElement::new("right end", shaded(x1, y0, pl - x1, w), 5),
            DiagramElement::new("right top tuck", triangle(right_top), 5),
            DiagramElement::new("right bottom tuck", triangle(right_bottom), 5),
            DiagramElement::new(
                "fold right end",
                arrow(Point::new(pl, mid_y), Point::new(x1, mid_y)),
                5,
            ),
            DiagramElement::new("right end tape", tape(Point::new(x1, mid_y)), 5),
        ]
    }

    /// Box turned 45 degrees; each paper corner folds over in turn
    fn diagonal_diagram(&self) -> Vec<DiagramElement> {
        let FinalDimensions { l, w, .. } = self.dimensions;
        let pl = self.paper.length_cm;
        let pw = self.paper.width_cm;
        let centre = Point::new(pl / 2.0, pw / 2.0);

        let near = Point::new(0.0, pw);
        let left = Point::new(0.0, 0.0);
        let right = Point::new(pl, pw);
        let far = Point::new(pl, 0.0);
        let flap = |corner: Point| {
            [
                corner,
                Point::new((corner.x + centre.x) / 2.0, corner.y),
                Point::new(corner.x, (corner.y + centre.y) / 2.0),
            ]
        };
        let footprint = Rect::rotated(centre, Size::new(l, w), 45.0);

        vec![
            DiagramElement::new("paper", outline(0.0, 0.0, pl, pw), 0),
            DiagramElement::new("box", DiagramShape::Outline { rect: footprint }, 0),
            DiagramElement::new("near corner", triangle(flap(near)), 1),
            DiagramElement::new("fold near corner", arrow(near, centre), 1),
            DiagramElement::new("left corner", triangle(flap(left)), 2),
            DiagramElement::new("left pleat", arrow(left, centre), 2),
            DiagramElement::new("roll away", arrow(centre, far), 3),
            DiagramElement::new("right corner", triangle(flap(right)), 4),
            DiagramElement::new("right pleat", arrow(right, centre), 4),
            DiagramElement::new("far corner", triangle(flap(far)), 5),
            DiagramElement::new("fold far corner", arrow(far, centre), 5),
            DiagramElement::new("far corner tape", tape(centre), 5),
        ]
    }

    /// Elements revealed up to and including the current step
    pub fn visible_elements(&self) -> Vec<DiagramElement> {
        self.diagram()
            .into_iter()
            .filter(|e| e.reveal_step <= self.step)
            .collect()
    }
}

fn outline(x: f64, y: f64, width: f64, height: f64) -> DiagramShape {
    DiagramShape::Outline {
        rect: Rect::axis(x, y, width, height),
    }
}

fn shaded(x: f64, y: f64, width: f64, height: f64) -> DiagramShape {
    DiagramShape::ShadedZone {
        rect: Rect::axis(x, y, width, height),
    }
}

fn arrow(from: Point, to: Point) -> DiagramShape {
    DiagramShape::Arrow { from, to }
}

fn triangle(points: [Point; 3]) -> DiagramShape {
    DiagramShape::Triangle { points }
}

fn tape(at: Point) -> DiagramShape {
    DiagramShape::TapePoint { at }
}
