//! Wrap planning module
//!
//! Paper sizing with sheet or roll selection, and the fold guide.

pub mod guide;
pub mod sizing;

pub use guide::{DiagramElement, DiagramShape, FoldGuide, WrapMethod};
pub use sizing::{plan_wrap, PaperChoice, PaperSheet, PaperSize, WrapPlan};
