//! Control points and tension validation.

use crate::{Result, SplineError};
use nalgebra::Point2;

/// Lower bound of the tension range.
pub const MIN_TENSION: f64 = -1.0;

/// Upper bound of the tension range.
pub const MAX_TENSION: f64 = 1.0;

/// An editable anchor of an X-Spline.
///
/// Tension is the shape parameter of the control point:
///
/// - `tension < 0` makes the curve pass through the point (interpolating),
///   with a smoother bend the closer it gets to `-1`
/// - `tension == 0` makes the curve pass through the point with a sharp corner
/// - `tension > 0` pulls the curve towards the point without reaching it
///   (approximating)
///
/// The tension always lies in `[-1, 1]`. The only way to build a control point
/// is through [`ControlPoint::new`], which enforces that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    position: Point2<f64>,
    tension: f64,
}

impl ControlPoint {
    /// Create a control point.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::InvalidTension`] if `tension` is outside
    /// `[-1, 1]` or NaN.
    pub fn new(position: Point2<f64>, tension: f64) -> Result<Self> {
        Ok(Self {
            position,
            tension: validate_tension(tension)?,
        })
    }

    /// Position of the control point.
    #[must_use]
    pub fn position(&self) -> Point2<f64> {
        self.position
    }

    /// Tension of the control point, in `[-1, 1]`.
    #[must_use]
    pub fn tension(&self) -> f64 {
        self.tension
    }

    pub(crate) fn set_position(&mut self, position: Point2<f64>) {
        self.position = position;
    }

    pub(crate) fn set_tension_unchecked(&mut self, tension: f64) {
        self.tension = tension;
    }
}

/// Check that a tension value lies in `[-1, 1]`.
///
/// Out-of-range values are rejected rather than clamped.
///
/// # Errors
///
/// Returns [`SplineError::InvalidTension`] for values outside the range and NaN.
pub fn validate_tension(tension: f64) -> Result<f64> {
    if (MIN_TENSION..=MAX_TENSION).contains(&tension) {
        Ok(tension)
    } else {
        Err(SplineError::InvalidTension(tension))
    }
}
