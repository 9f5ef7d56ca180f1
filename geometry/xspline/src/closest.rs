//! Closest point on the spline to an arbitrary point.

use crate::geom::project_onto_segment;
use crate::sampling::{Sample, SamplingParams};
use crate::{Result, SplineError, XSpline};
use nalgebra::Point2;
use tracing::{debug, trace};

/// Refinement rounds after which the search gives up shrinking the edge.
const MAX_REFINEMENTS: u32 = 48;

/// Parameter intervals this narrow cannot be split any further.
const MIN_PARAMETER_INTERVAL: f64 = 1e-15;

/// Result of [`XSpline::point_closest_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// Point on the spline.
    pub point: Point2<f64>,
    /// Parameter of `point`.
    pub t: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

/// Polyline edge nearest to a query point.
#[derive(Debug, Clone, Copy)]
struct Edge {
    from: Sample,
    to: Sample,
    /// Position of the projection along the edge.
    s: f64,
    sq_dist: f64,
}

impl Edge {
    fn chord(&self) -> f64 {
        (self.to.point - self.from.point).norm()
    }

    fn t(&self) -> f64 {
        self.from.t + self.s * (self.to.t - self.from.t)
    }
}

/// Nearest edge of the polyline through `samples`. Ties go to the earlier edge.
fn nearest_edge(to: Point2<f64>, samples: impl Iterator<Item = Sample>) -> Option<Edge> {
    let mut best: Option<Edge> = None;
    let mut prev: Option<Sample> = None;
    for sample in samples {
        if let Some(from) = prev {
            let (s, sq_dist) = project_onto_segment(to, from.point, sample.point);
            if best.is_none_or(|b| sq_dist < b.sq_dist) {
                best = Some(Edge {
                    from,
                    to: sample,
                    s,
                    sq_dist,
                });
            }
        }
        prev = Some(sample);
    }
    best
}

impl XSpline {
    /// Accuracy used by callers that have no better estimate of their own.
    pub const DEFAULT_ACCURACY: f64 = 0.2;

    /// Find the point on the spline closest to `to`.
    ///
    /// The spline is sampled into a polyline within `accuracy / 2`, the
    /// nearest polyline edge is located, and that edge's parameter interval
    /// is resampled with halving tolerances until the edge is shorter than a
    /// tenth of `accuracy`. The returned point is evaluated on the curve at
    /// the projected parameter, so it lies exactly on the spline and is within
    /// roughly `accuracy` of the true closest point's distance. When several
    /// points are equally close the one with the smallest `t` wins.
    ///
    /// # Errors
    ///
    /// - [`SplineError::InsufficientControlPoints`] with fewer than 2 control points
    /// - [`SplineError::InvalidArgument`] unless `accuracy` is finite and positive
    ///
    /// # Example
    ///
    /// ```
    /// use xspline::XSpline;
    /// use nalgebra::Point2;
    ///
    /// let spline = XSpline::from_control_points([
    ///     (Point2::new(0.0, 0.0), 0.0),
    ///     (Point2::new(10.0, 0.0), 0.0),
    /// ]).unwrap();
    ///
    /// let closest = spline.point_closest_to(Point2::new(2.5, 3.0), 0.01).unwrap();
    /// assert!((closest.point.x - 2.5).abs() < 0.01);
    /// assert!((closest.distance - 3.0).abs() < 0.01);
    /// ```
    pub fn point_closest_to(&self, to: Point2<f64>, accuracy: f64) -> Result<ClosestPoint> {
        self.ensure_evaluable()?;
        if !accuracy.is_finite() || accuracy <= 0.0 {
            return Err(SplineError::invalid_argument(format!(
                "accuracy must be finite and positive, got {accuracy}"
            )));
        }

        let mut tolerance = accuracy * 0.5;
        let params = SamplingParams::with_max_dist_from_spline(tolerance);
        let mut edge = nearest_edge(to, self.sample(&params, 0.0, 1.0)?)
            .ok_or_else(|| SplineError::invalid_argument("sampling produced no edges"))?;

        let mut rounds = 0;
        while rounds < MAX_REFINEMENTS
            && edge.chord() > accuracy * 0.1
            && edge.to.t - edge.from.t > MIN_PARAMETER_INTERVAL
        {
            tolerance *= 0.5;
            let params = SamplingParams::with_max_dist_from_spline(tolerance)
                .with_max_dist_between_samples(edge.chord() * 0.5);
            let Some(refined) = nearest_edge(to, self.sample(&params, edge.from.t, edge.to.t)?)
            else {
                break;
            };
            edge = refined;
            rounds += 1;
            trace!(
                round = rounds,
                t0 = edge.from.t,
                t1 = edge.to.t,
                chord = edge.chord(),
                "Refined closest edge"
            );
        }

        let t = edge.t();
        let point = self.eval_point(t);
        let distance = (point - to).norm();
        debug!(t, distance, rounds, "Closest point found");
        Ok(ClosestPoint { point, t, distance })
    }
}
