//! Point, derivative and curvature evaluation.

use crate::blend::{BlendWeights, SegmentBlend};
use crate::{Result, SplineError, XSpline};
use nalgebra::{Point2, Vector2};

/// A point on the spline together with its derivatives with respect to the
/// global parameter `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointAndDerivs {
    /// Point on the spline.
    pub point: Point2<f64>,
    /// First derivative with respect to `t`.
    pub first_deriv: Vector2<f64>,
    /// Second derivative with respect to `t`.
    pub second_deriv: Vector2<f64>,
}

impl PointAndDerivs {
    /// Signed curvature, `(x'y'' - y'x'') / (x'² + y'²)^1.5`.
    ///
    /// After rotating the coordinate system so that +x is the tangent
    /// direction, the curvature is positive when the curve bends towards +y.
    /// With the y axis pointing down (as in images) that is a clockwise turn.
    ///
    /// Returns NaN at zero-speed points. Callers must check for that.
    #[must_use]
    pub fn signed_curvature(&self) -> f64 {
        let d1 = self.first_deriv;
        let d2 = self.second_deriv;
        let speed_sq = d1.norm_squared();
        if speed_sq == 0.0 {
            return f64::NAN;
        }
        (d1.x * d2.y - d1.y * d2.x) / (speed_sq * speed_sq.sqrt())
    }
}

/// Control point indices of a segment and their blend weights at a local
/// parameter. At the open ends an index repeats.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stencil {
    pub indices: [usize; 4],
    pub weights: BlendWeights,
}

impl XSpline {
    /// Evaluate the spline at `t ∈ [0, 1]`.
    ///
    /// # Errors
    ///
    /// - [`SplineError::InsufficientControlPoints`] with fewer than 2 control points
    /// - [`SplineError::InvalidArgument`] if `t` is outside `[0, 1]`
    pub fn point_at(&self, t: f64) -> Result<Point2<f64>> {
        self.ensure_evaluable()?;
        check_parameter(t)?;
        Ok(self.eval_point(t))
    }

    /// Evaluate the spline and its first two derivatives at `t ∈ [0, 1]`.
    ///
    /// The derivatives are exact: they come from differentiating the blending
    /// polynomials, not from finite differences.
    ///
    /// # Errors
    ///
    /// Same as [`XSpline::point_at`].
    pub fn point_and_derivs_at(&self, t: f64) -> Result<PointAndDerivs> {
        self.ensure_evaluable()?;
        check_parameter(t)?;

        let (segment, u) = self.locate(t);
        let stencil = self.stencil(segment, u);
        let scale = self.num_segments() as f64;

        let mut point = Vector2::zeros();
        let mut first_deriv = Vector2::zeros();
        let mut second_deriv = Vector2::zeros();
        for (k, &idx) in stencil.indices.iter().enumerate() {
            let pos = self.position_of(idx).coords;
            point += pos * stencil.weights.values[k];
            first_deriv += pos * stencil.weights.first[k];
            second_deriv += pos * stencil.weights.second[k];
        }

        // Chain rule for u = t * num_segments - segment
        Ok(PointAndDerivs {
            point: Point2::from(point),
            first_deriv: first_deriv * scale,
            second_deriv: second_deriv * (scale * scale),
        })
    }

    /// Signed curvature at `t`. See [`PointAndDerivs::signed_curvature`].
    ///
    /// # Errors
    ///
    /// Same as [`XSpline::point_at`].
    pub fn signed_curvature_at(&self, t: f64) -> Result<f64> {
        Ok(self.point_and_derivs_at(t)?.signed_curvature())
    }

    /// Map a global parameter to `(segment, local parameter)`.
    ///
    /// Requires an evaluable spline and `t ∈ [0, 1]`.
    pub(crate) fn locate(&self, t: f64) -> (usize, f64) {
        let num_segments = self.num_segments();
        let scaled = t * num_segments as f64;
        let segment = (scaled.floor() as usize).min(num_segments - 1);
        (segment, scaled - segment as f64)
    }

    pub(crate) fn stencil(&self, segment: usize, u: f64) -> Stencil {
        let last = self.num_control_points() - 1;
        let indices = [
            segment.saturating_sub(1),
            segment,
            segment + 1,
            (segment + 2).min(last),
        ];
        let blend = SegmentBlend::new(
            self.effective_tension(segment),
            self.effective_tension(segment + 1),
        );
        Stencil {
            indices,
            weights: blend.weights(u),
        }
    }

    /// Point at an already validated parameter.
    pub(crate) fn eval_point(&self, t: f64) -> Point2<f64> {
        let (segment, u) = self.locate(t);
        let combination = self.combination(segment, u);
        let mut point = Vector2::zeros();
        for c in combination.as_slice() {
            point += self.position_of(c.control_point_idx).coords * c.coeff;
        }
        Point2::from(point)
    }
}

/// Reject parameters outside `[0, 1]` and NaN.
pub(crate) fn check_parameter(t: f64) -> Result<()> {
    if (0.0..=1.0).contains(&t) {
        Ok(())
    } else {
        Err(SplineError::invalid_argument(format!(
            "parameter {t} is outside valid range [0, 1]"
        )))
    }
}
