//! Spline points as linear combinations of control points.

use crate::segment::check_parameter;
use crate::{Result, XSpline};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weight of one control point in a linear combination.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearCoefficient {
    /// Index of the control point.
    pub control_point_idx: usize,
    /// Weight applied to the control point's position.
    pub coeff: f64,
}

impl LinearCoefficient {
    /// Create a coefficient.
    #[must_use]
    pub fn new(control_point_idx: usize, coeff: f64) -> Self {
        Self {
            control_point_idx,
            coeff,
        }
    }
}

/// At most four coefficients with distinct indices, in increasing index order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Combination {
    coeffs: [LinearCoefficient; 4],
    len: usize,
}

impl Combination {
    fn push(&mut self, control_point_idx: usize, coeff: f64) {
        if coeff != 0.0 {
            self.coeffs[self.len] = LinearCoefficient::new(control_point_idx, coeff);
            self.len += 1;
        }
    }

    pub fn as_slice(&self) -> &[LinearCoefficient] {
        &self.coeffs[..self.len]
    }
}

impl XSpline {
    /// Express the point at `t` as a weighted sum of control point positions.
    ///
    /// The result satisfies `point_at(t) == Σ coeff · position(control_point_idx)`
    /// for the current tensions, which lets a fitter build one row of a linear
    /// system per sample without knowing the blending functions. Only indices
    /// with a non-zero weight are returned: the segment's two control points
    /// and up to two neighbours.
    ///
    /// # Errors
    ///
    /// Same as [`XSpline::point_at`].
    ///
    /// # Example
    ///
    /// ```
    /// use xspline::XSpline;
    /// use nalgebra::Point2;
    ///
    /// let spline = XSpline::from_control_points([
    ///     (Point2::new(0.0, 0.0), 0.0),
    ///     (Point2::new(1.0, 2.0), 1.0),
    ///     (Point2::new(3.0, 2.0), 1.0),
    ///     (Point2::new(4.0, 0.0), 0.0),
    /// ]).unwrap();
    ///
    /// let coeffs = spline.linear_combination_at(0.5).unwrap();
    /// let sum: f64 = coeffs.iter().map(|c| c.coeff).sum();
    /// assert!((sum - 1.0).abs() < 1e-12);
    /// ```
    pub fn linear_combination_at(&self, t: f64) -> Result<Vec<LinearCoefficient>> {
        self.ensure_evaluable()?;
        check_parameter(t)?;
        let (segment, u) = self.locate(t);
        Ok(self.combination(segment, u).as_slice().to_vec())
    }

    /// Merge the stencil of a segment into distinct control point weights.
    pub(crate) fn combination(&self, segment: usize, u: f64) -> Combination {
        let stencil = self.stencil(segment, u);
        let [i0, i1, i2, i3] = stencil.indices;
        let [w0, w1, w2, w3] = stencil.weights.values;

        let mut out = Combination {
            coeffs: [LinearCoefficient::default(); 4],
            len: 0,
        };
        if i0 == i1 {
            out.push(i0, w0 + w1);
        } else {
            out.push(i0, w0);
            out.push(i1, w1);
        }
        if i2 == i3 {
            out.push(i2, w2 + w3);
        } else {
            out.push(i2, w2);
            out.push(i3, w3);
        }
        out
    }
}
