//! Error types for the CAM tools crate.
//!
//! This module provides structured error types for shelf geometry
//! derivation and cut path output.

use thiserror::Error;

/// Errors raised while turning panels into cut paths.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CamToolError {
    /// Invalid parameters were provided to the cutter.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// G-code generation failed.
    #[error("G-code generation failed: {0}")]
    GenerationFailed(String),
}

/// Physically impossible shelf configurations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// At least one shelf is required.
    #[error("Shelf count must be at least 1, got {0}")]
    ShelfCount(u32),

    /// Dimensions are zero or negative.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The angle makes a divisor of the floor or top geometry vanish.
    #[error("Angle {angle} degrees is singular for {context}")]
    SingularAngle { angle: f64, context: String },

    /// The top can only be sloped when shelves slant forward.
    #[error("Slope top requires a forward slant, got {0} degrees")]
    BackwardSlopeTop(f64),

    /// The depth is too shallow for the angle, thickness and lip combination.
    #[error("Depth {depth} too shallow: shelf floor depth would be {shelf_floor_depth:.3}")]
    DepthTooShallow { depth: f64, shelf_floor_depth: f64 },
}

/// Result type alias for cut path operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for shelf configuration checks.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cam_tool_error_display() {
        let err = CamToolError::InvalidParameters("thickness must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid parameters: thickness must be positive"
        );

        let err = CamToolError::GenerationFailed("empty toolpath".to_string());
        assert_eq!(err.to_string(), "G-code generation failed: empty toolpath");
    }

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::ShelfCount(0);
        assert_eq!(err.to_string(), "Shelf count must be at least 1, got 0");

        let err = ConfigurationError::DepthTooShallow {
            depth: 10.0,
            shelf_floor_depth: -4.5,
        };
        assert_eq!(
            err.to_string(),
            "Depth 10 too shallow: shelf floor depth would be -4.500"
        );

        let err = ConfigurationError::SingularAngle {
            angle: 90.0,
            context: "shelf floor depth".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Angle 90 degrees is singular for shelf floor depth"
        );
    }
}
