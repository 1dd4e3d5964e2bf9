//! Error types for input validation at the edges of the library.

use thiserror::Error;

/// Errors returned when building deformation inputs from untrusted values.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DeformError {
    /// A control-point set needs exactly one position per cube corner.
    #[error("expected 8 control points, got {0}")]
    WrongPointCount(usize),

    /// A control point index outside `0..=7`.
    #[error("control point index {0} is out of range (0..=7)")]
    IndexOutOfRange(usize),

    /// Dash and gap lengths must be positive and finite.
    #[error("invalid dash pattern: dash={dash}, gap={gap}")]
    InvalidDashPattern {
        /// Requested dash length.
        dash: f32,
        /// Requested gap length.
        gap: f32,
    },

    /// Unrecognized geometry strategy name.
    #[error("unknown geometry strategy `{0}` (expected `triangulated` or `indexed`)")]
    UnknownGeometry(String),

    /// Unrecognized corner convention name.
    #[error("unknown corner convention `{0}` (expected `symmetric` or `unit`)")]
    UnknownConvention(String),
}

/// Result type for fallible deformation inputs.
pub type DeformResult<T> = Result<T, DeformError>;
