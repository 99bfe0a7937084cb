//! Reference and object detection module
//!
//! This module picks, among the rectangles found in one photo, the
//! known-size reference and the object to be measured.

pub mod object;
pub mod reference;

pub use object::ObjectSelector;
pub use reference::{ReferenceEstimator, ReferenceObject, Scale, SelectionPolicy};
