//! Regularization energies for spline fitting.
//!
//! Both energies are quadratic forms over the control point displacements
//! `[dx0, dy0, dx1, dy1, ...]`, not over the positions themselves. A fitter
//! adds them to its data term and solves for the displacements.

use std::ops::Range;

use crate::quadratic::QuadraticForm;
use crate::{Result, SplineError, XSpline};

/// Index of the displacement unknown for `axis` (0 = x, 1 = y) of a control point.
#[must_use]
pub fn displacement_var(control_point_idx: usize, axis: usize) -> usize {
    control_point_idx * 2 + axis
}

impl XSpline {
    /// Sum of squared distances between consecutive control points, as a
    /// function of the control point displacements, over all segments.
    ///
    /// At zero displacement it evaluates to `Σ ‖cp[i] - cp[i-1]‖²`.
    #[must_use]
    pub fn control_points_attraction_force(&self) -> QuadraticForm {
        self.control_points_force(0..self.num_segments())
    }

    /// Same as [`XSpline::control_points_attraction_force`] over the
    /// half-open segment range `segments`.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::InvalidArgument`] if the range is inverted or
    /// extends past the last segment.
    pub fn control_points_attraction_force_in(
        &self,
        segments: Range<usize>,
    ) -> Result<QuadraticForm> {
        self.check_segment_range(&segments)?;
        Ok(self.control_points_force(segments))
    }

    /// Sum of squared distances between consecutive junction points (the
    /// curve points at control point parameters), as a function of the
    /// control point displacements, over all segments.
    ///
    /// Junction points are linear in the control points, so this captures
    /// how a displacement moves the visible curve through the blend weights.
    #[must_use]
    pub fn junction_points_attraction_force(&self) -> QuadraticForm {
        self.junction_points_force(0..self.num_segments())
    }

    /// Same as [`XSpline::junction_points_attraction_force`] over the
    /// half-open segment range `segments`.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::InvalidArgument`] if the range is inverted or
    /// extends past the last segment.
    pub fn junction_points_attraction_force_in(
        &self,
        segments: Range<usize>,
    ) -> Result<QuadraticForm> {
        self.check_segment_range(&segments)?;
        Ok(self.junction_points_force(segments))
    }

    fn check_segment_range(&self, segments: &Range<usize>) -> Result<()> {
        if segments.start > segments.end || segments.end > self.num_segments() {
            return Err(SplineError::invalid_argument(format!(
                "segment range {}..{} is not within 0..{}",
                segments.start,
                segments.end,
                self.num_segments()
            )));
        }
        Ok(())
    }

    fn control_points_force(&self, segments: Range<usize>) -> QuadraticForm {
        let mut force = QuadraticForm::zeros(self.num_control_points() * 2);
        for segment in segments {
            let delta = self.position_of(segment + 1) - self.position_of(segment);
            for axis in 0..2 {
                force.add_squared_linear(
                    delta[axis],
                    &[
                        (displacement_var(segment + 1, axis), 1.0),
                        (displacement_var(segment, axis), -1.0),
                    ],
                );
            }
        }
        force
    }

    fn junction_points_force(&self, segments: Range<usize>) -> QuadraticForm {
        let mut force = QuadraticForm::zeros(self.num_control_points() * 2);
        let mut terms = Vec::with_capacity(8);
        for segment in segments {
            // Segment `i` starts at junction `i` and ends at junction `i + 1`.
            let start = self.combination(segment, 0.0);
            let end = self.combination(segment, 1.0);

            for axis in 0..2 {
                terms.clear();
                let mut constant = 0.0;
                for c in end.as_slice() {
                    constant += c.coeff * self.position_of(c.control_point_idx)[axis];
                    terms.push((displacement_var(c.control_point_idx, axis), c.coeff));
                }
                for c in start.as_slice() {
                    constant -= c.coeff * self.position_of(c.control_point_idx)[axis];
                    terms.push((displacement_var(c.control_point_idx, axis), -c.coeff));
                }
                force.add_squared_linear(constant, &terms);
            }
        }
        force
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{DVector, Point2, Vector2};

    fn spline() -> XSpline {
        XSpline::from_control_points([
            (Point2::new(0.0, 0.0), 0.0),
            (Point2::new(1.0, 2.0), 1.0),
            (Point2::new(3.0, 2.5), -0.5),
            (Point2::new(4.0, -1.0), 0.7),
            (Point2::new(6.0, 0.0), 0.0),
        ])
        .unwrap()
    }

    fn displacements(n: usize) -> DVector<f64> {
        DVector::from_fn(n * 2, |i, _| ((i * 7 % 5) as f64 - 2.0) * 0.3)
    }

    fn displaced(spline: &XSpline, d: &DVector<f64>) -> XSpline {
        let mut moved = spline.clone();
        for i in 0..spline.num_control_points() {
            let pos = spline.control_point_position(i).unwrap()
                + Vector2::new(d[displacement_var(i, 0)], d[displacement_var(i, 1)]);
            moved.move_control_point(i, pos).unwrap();
        }
        moved
    }

    fn junction_energy(spline: &XSpline, segments: Range<usize>) -> f64 {
        segments
            .map(|s| {
                let a = spline.point_at(spline.control_point_index_to_t(s).unwrap()).unwrap();
                let b = spline
                    .point_at(spline.control_point_index_to_t(s + 1).unwrap())
                    .unwrap();
                (b - a).norm_squared()
            })
            .sum()
    }

    #[test]
    fn test_control_points_force_at_rest() {
        let spline = spline();
        let force = spline.control_points_attraction_force();
        let expected: f64 = spline
            .control_points()
            .windows(2)
            .map(|w| (w[1].position() - w[0].position()).norm_squared())
            .sum();

        assert_eq!(force.num_vars(), 10);
        assert_relative_eq!(force.evaluate(&DVector::zeros(10)), expected, epsilon = 1e-12);
        assert_relative_eq!(force.c(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_control_points_force_with_displacement() {
        let spline = spline();
        let d = displacements(5);
        let moved = displaced(&spline, &d);

        let force = spline.control_points_attraction_force_in(1..3).unwrap();
        let expected: f64 = (1..3)
            .map(|i| {
                (moved.control_point_position(i + 1).unwrap()
                    - moved.control_point_position(i).unwrap())
                .norm_squared()
            })
            .sum();
        assert_relative_eq!(force.evaluate(&d), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_junction_force_matches_moved_curve() {
        let spline = spline();
        let d = displacements(5);
        let moved = displaced(&spline, &d);

        let force = spline.junction_points_attraction_force();
        assert_relative_eq!(
            force.evaluate(&DVector::zeros(10)),
            junction_energy(&spline, 0..4),
            epsilon = 1e-9
        );
        assert_relative_eq!(force.evaluate(&d), junction_energy(&moved, 0..4), epsilon = 1e-9);

        let partial = spline.junction_points_attraction_force_in(2..4).unwrap();
        assert_relative_eq!(partial.evaluate(&d), junction_energy(&moved, 2..4), epsilon = 1e-9);
    }

    #[test]
    fn test_junction_force_equals_control_force_for_interpolating_spline() {
        // Non-positive tensions put junctions on the control points
        let spline = XSpline::from_control_points([
            (Point2::new(0.0, 0.0), -1.0),
            (Point2::new(2.0, 1.0), 0.0),
            (Point2::new(3.0, -1.0), -0.4),
        ])
        .unwrap();
        let d = displacements(3);
        assert_relative_eq!(
            spline.junction_points_attraction_force().evaluate(&d),
            spline.control_points_attraction_force().evaluate(&d),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_forces_add() {
        let spline = spline();
        let d = displacements(5);
        let left = spline.control_points_attraction_force_in(0..2).unwrap();
        let right = spline.control_points_attraction_force_in(2..4).unwrap();
        let whole = spline.control_points_attraction_force();
        assert_relative_eq!((left + right).evaluate(&d), whole.evaluate(&d), epsilon = 1e-9);
    }

    #[test]
    fn test_empty_and_invalid_ranges() {
        let spline = spline();
        let empty = spline.control_points_attraction_force_in(2..2).unwrap();
        assert_relative_eq!(empty.evaluate(&displacements(5)), 0.0);

        assert!(spline
            .control_points_attraction_force_in(0..5)
            .unwrap_err()
            .is_invalid_argument());
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = spline.junction_points_attraction_force_in(3..1);
        assert!(inverted.unwrap_err().is_invalid_argument());

        // Fewer than two control points: no segments, zero force
        let single = XSpline::from_control_points([(Point2::new(1.0, 1.0), 0.0)]).unwrap();
        assert_relative_eq!(single.junction_points_attraction_force().c(), 0.0);
    }
}
