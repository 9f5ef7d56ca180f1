//! Error types for spline operations.

use thiserror::Error;

/// Errors that can occur while editing or evaluating an X-Spline.
///
/// Every error is a caller contract violation detected at the offending call.
/// A failed mutation leaves the spline unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SplineError {
    /// Control point index is outside the valid bounds.
    #[error("control point index {index} is out of range for {len} control points")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of control points at the time of the call.
        len: usize,
    },

    /// Tension is outside [-1, 1] or not a number.
    #[error("tension {0} is outside valid range [-1, 1]")]
    InvalidTension(f64),

    /// An argument other than tension or index is invalid.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of what's wrong with the argument.
        reason: String,
    },

    /// Evaluation requested on a spline with too few control points.
    #[error("insufficient control points: need at least {required}, got {actual}")]
    InsufficientControlPoints {
        /// Minimum required control points.
        required: usize,
        /// Actual number of control points.
        actual: usize,
    },
}

impl SplineError {
    /// Create an index out of range error.
    #[must_use]
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create an insufficient control points error.
    #[must_use]
    pub fn insufficient_control_points(required: usize, actual: usize) -> Self {
        Self::InsufficientControlPoints { required, actual }
    }

    /// Check if this is an out of range error.
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Check if this is an invalid argument error (including invalid tension).
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidTension(_) | Self::InvalidArgument { .. })
    }

    /// Check if this is an invalid state error.
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InsufficientControlPoints { .. })
    }
}
