//! The capability set a spline fitter relies on.

use crate::energy::displacement_var;
use crate::linear::LinearCoefficient;
use crate::sampling::{Sample, SamplingParams, Samples};
use crate::{Result, SplineError, XSpline};
use nalgebra::{DVector, Point2, Vector2};

/// A curve whose points are linear in its control points.
///
/// A fitter samples the curve, expresses every sample as a linear
/// combination of control points, solves for control point displacements
/// and applies them. Anything implementing this trait can be fitted that way.
pub trait FittableSpline {
    /// Iterator returned by [`FittableSpline::sample`].
    type Samples<'a>: Iterator<Item = Sample>
    where
        Self: 'a;

    /// Number of control points.
    fn num_control_points(&self) -> usize;

    /// Position of the control point at `idx`.
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for an invalid index.
    fn control_point_position(&self, idx: usize) -> Result<Point2<f64>>;

    /// Move the control point at `idx` to `pos`.
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for an invalid index.
    fn move_control_point(&mut self, idx: usize, pos: Point2<f64>) -> Result<()>;

    /// Control point weights of the curve point at `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated at `t`.
    fn linear_combination_at(&self, t: f64) -> Result<Vec<LinearCoefficient>>;

    /// Sample the curve over `[from_t, to_t]`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid params or range.
    fn sample(&self, params: &SamplingParams, from_t: f64, to_t: f64) -> Result<Self::Samples<'_>>;
}

impl FittableSpline for XSpline {
    type Samples<'a> = Samples<'a>;

    fn num_control_points(&self) -> usize {
        XSpline::num_control_points(self)
    }

    fn control_point_position(&self, idx: usize) -> Result<Point2<f64>> {
        XSpline::control_point_position(self, idx)
    }

    fn move_control_point(&mut self, idx: usize, pos: Point2<f64>) -> Result<()> {
        XSpline::move_control_point(self, idx, pos)
    }

    fn linear_combination_at(&self, t: f64) -> Result<Vec<LinearCoefficient>> {
        XSpline::linear_combination_at(self, t)
    }

    fn sample(&self, params: &SamplingParams, from_t: f64, to_t: f64) -> Result<Samples<'_>> {
        XSpline::sample(self, params, from_t, to_t)
    }
}

/// Move every control point by its entry in `displacements`.
///
/// The vector is laid out as `[dx0, dy0, dx1, dy1, ...]`, matching
/// [`displacement_var`] and the energy forms.
///
/// # Errors
///
/// Returns [`SplineError::InvalidArgument`] if `displacements` does not have
/// two entries per control point. The spline is left unchanged in that case.
pub fn apply_displacements<S>(spline: &mut S, displacements: &DVector<f64>) -> Result<()>
where
    S: FittableSpline + ?Sized,
{
    let num_control_points = spline.num_control_points();
    if displacements.len() != num_control_points * 2 {
        return Err(SplineError::invalid_argument(format!(
            "expected {} displacement entries for {} control points, got {}",
            num_control_points * 2,
            num_control_points,
            displacements.len()
        )));
    }

    for idx in 0..num_control_points {
        let delta = Vector2::new(
            displacements[displacement_var(idx, 0)],
            displacements[displacement_var(idx, 1)],
        );
        let pos = spline.control_point_position(idx)?;
        spline.move_control_point(idx, pos + delta)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::QuadraticForm;
    use approx::assert_relative_eq;

    fn point_of<S: FittableSpline>(spline: &S, coeffs: &[LinearCoefficient]) -> Point2<f64> {
        Point2::from(coeffs.iter().fold(Vector2::zeros(), |acc, c| {
            acc + spline.control_point_position(c.control_point_idx).unwrap().coords * c.coeff
        }))
    }

    /// One least-squares step pulling the curve onto `target`.
    fn fit_step<S, F>(spline: &mut S, target: F)
    where
        S: FittableSpline,
        F: Fn(f64) -> Point2<f64>,
    {
        let params = SamplingParams::default().with_min_depth(3);
        let ts: Vec<f64> = spline.sample(&params, 0.0, 1.0).unwrap().map(|s| s.t).collect();

        let mut form = QuadraticForm::zeros(spline.num_control_points() * 2);
        for t in ts {
            let coeffs = spline.linear_combination_at(t).unwrap();
            let residual = point_of(spline, &coeffs) - target(t);
            for axis in 0..2 {
                let terms: Vec<(usize, f64)> = coeffs
                    .iter()
                    .map(|c| (displacement_var(c.control_point_idx, axis), c.coeff))
                    .collect();
                form.add_squared_linear(residual[axis], &terms);
            }
        }

        // Minimum of xᵀAx + bᵀx + c with symmetric A: 2Ax = -b
        let hessian = form.a() * 2.0;
        let step = hessian.cholesky().unwrap().solve(&(-form.b()));
        apply_displacements(spline, &step).unwrap();
    }

    #[test]
    fn test_apply_displacements() {
        let mut spline = XSpline::from_control_points([
            (Point2::new(0.0, 0.0), 0.0),
            (Point2::new(1.0, 1.0), 0.5),
        ])
        .unwrap();
        apply_displacements(&mut spline, &DVector::from_vec(vec![1.0, -1.0, 0.5, 2.0])).unwrap();
        assert_eq!(spline.control_point_position(0).unwrap(), Point2::new(1.0, -1.0));
        assert_eq!(spline.control_point_position(1).unwrap(), Point2::new(1.5, 3.0));
        assert_relative_eq!(spline.control_point_tension(1).unwrap(), 0.5);
    }

    #[test]
    fn test_apply_displacements_length_mismatch() {
        let mut spline = XSpline::from_control_points([
            (Point2::new(0.0, 0.0), 0.0),
            (Point2::new(1.0, 1.0), 0.0),
        ])
        .unwrap();
        let before = spline.clone();
        let err = apply_displacements(&mut spline, &DVector::zeros(3)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(spline, before);
    }

    #[test]
    fn test_fit_step_recovers_control_points() {
        let tensions = [0.0, 0.8, -0.6, 0.3, 0.0];
        let target = XSpline::from_control_points(
            [
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 3.0),
                Point2::new(4.0, -1.0),
                Point2::new(6.0, 2.0),
                Point2::new(8.0, 0.0),
            ]
            .into_iter()
            .zip(tensions),
        )
        .unwrap();
        let mut spline = XSpline::from_control_points(
            [
                Point2::new(0.5, 0.5),
                Point2::new(2.0, 2.0),
                Point2::new(4.5, 0.0),
                Point2::new(6.0, 1.0),
                Point2::new(7.5, 0.5),
            ]
            .into_iter()
            .zip(tensions),
        )
        .unwrap();

        // Same tensions and parametrization, so a single linear step is exact
        fit_step(&mut spline, |t| target.point_at(t).unwrap());
        for (fitted, expected) in spline.control_points().iter().zip(target.control_points()) {
            assert_relative_eq!(
                fitted.position().coords,
                expected.position().coords,
                epsilon = 1e-8
            );
        }
    }
}
