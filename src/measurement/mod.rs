//! Measurement module
//!
//! Converts the selected object rectangle into centimetres, and combines
//! per-view readings into final box dimensions.

pub mod conversion;
pub mod session;
pub mod view;

pub use conversion::{measure_object, ObjectMeasurement, Shape, ShapeClassifier};
pub use session::{reconcile, FinalDimensions, MeasurementSession};
pub use view::{ViewKind, ViewMeasurement};
