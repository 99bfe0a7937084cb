//! Error types for the giftwrap_measure library

use thiserror::Error;

/// Result type alias for giftwrap_measure operations
pub type Result<T> = std::result::Result<T, MeasureError>;

/// Error types for measurement and wrap planning
#[derive(Error, Debug)]
pub enum MeasureError {
    /// No frame could be acquired from the capture source
    #[error("Frame acquisition failed: {message}")]
    AcquisitionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// EXIF metadata extraction failed
    #[error("EXIF processing error: {message}")]
    ExifError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No candidate matched the expected reference object
    #[error("Reference not found: {reason}")]
    ReferenceNotFound { reason: String },

    /// No candidate remained for the measured object
    #[error("Object not found: {reason}")]
    ObjectNotFound { reason: String },

    /// An operation needs final dimensions that are not available yet
    #[error("Dimensions pending: missing {missing}")]
    DimensionsPending { missing: String },

    /// Neither a catalog sheet nor a roll covers the required paper
    #[error("No paper fits {paper_l:.1} x {paper_w:.1} cm")]
    NoPaperFits { paper_l: f64, paper_w: f64 },

    /// Vision backend did not become ready in time
    #[error("Vision backend initialization timed out after {timeout_ms}ms")]
    InitializationTimedOut { timeout_ms: u64 },

    /// Vision backend operation failed
    #[error("Vision error: {operation}")]
    VisionError {
        operation: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MeasureError {
    /// Create an acquisition error with context
    pub fn acquisition<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::AcquisitionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an EXIF processing error with context
    pub fn exif<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExifError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a vision backend error with context
    pub fn vision<E>(operation: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::VisionError {
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn reference_not_found(reason: impl Into<String>) -> Self {
        Self::ReferenceNotFound {
            reason: reason.into(),
        }
    }

    pub fn object_not_found(reason: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if a retake of the same view can fix this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MeasureError::AcquisitionFailed { .. }
                | MeasureError::ReferenceNotFound { .. }
                | MeasureError::ObjectNotFound { .. }
                | MeasureError::DimensionsPending { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            MeasureError::AcquisitionFailed { message, .. } => {
                format!("Camera unavailable ({}). Check permissions and try again.", message)
            }
            MeasureError::ImageLoadError { .. } => {
                "Could not load the photo. Please check the file format and try again.".to_string()
            }
            MeasureError::ReferenceNotFound { .. } => {
                "Reference not found. Retake the photo with the reference fully and clearly visible.".to_string()
            }
            MeasureError::ObjectNotFound { .. } => {
                "Object not detected clearly. Move closer or improve the lighting and retake.".to_string()
            }
            MeasureError::DimensionsPending { missing } => {
                format!("Capture the remaining views first: {}.", missing)
            }
            MeasureError::NoPaperFits { paper_l, paper_w } => {
                format!(
                    "No sheet or roll is large enough for {:.1} x {:.1} cm of paper.",
                    paper_l, paper_w
                )
            }
            MeasureError::InitializationTimedOut { .. } => {
                "The image analysis engine is still loading. Please wait and try again.".to_string()
            }
            _ => "Measurement failed. Please try again with a different photo.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(MeasureError::reference_not_found("none").is_recoverable());
        assert!(MeasureError::object_not_found("none").is_recoverable());
        assert!(!MeasureError::invalid_parameter("margin", -1.0).is_recoverable());
        assert!(!MeasureError::InitializationTimedOut { timeout_ms: 10 }.is_recoverable());
    }

    #[test]
    fn test_user_messages() {
        let reference = MeasureError::reference_not_found("no A4-shaped contour");
        assert!(reference.user_message().contains("Retake"));

        let object = MeasureError::object_not_found("below area threshold");
        assert!(object.user_message().contains("Move closer"));

        let pending = MeasureError::DimensionsPending {
            missing: "side 1, side 2".to_string(),
        };
        assert!(pending.user_message().contains("side 1, side 2"));
    }

    #[test]
    fn test_display_includes_reason() {
        let err = MeasureError::reference_not_found("only 1 contour detected");
        assert_eq!(err.to_string(), "Reference not found: only 1 contour detected");
    }
}
