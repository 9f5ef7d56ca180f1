//! The X-Spline type and its control point editing operations.

use crate::control_point::validate_tension;
use crate::{ControlPoint, Result, SplineError};
use nalgebra::Point2;
use tracing::trace;

/// Minimum number of control points required for evaluation.
pub const MIN_CONTROL_POINTS: usize = 2;

/// An open X-Spline.
///
/// X-Splines (Blanc & Schlick, 1995) are defined by a sequence of control
/// points, each carrying a tension that decides locally whether the curve
/// interpolates or approximates the point. See [`ControlPoint`] for the
/// meaning of tension values.
///
/// The spline exclusively owns its control points. Segment `i` spans control
/// points `i` and `i + 1`, and the global parameter `t ∈ [0, 1]` is spread
/// uniformly over the segments.
///
/// Open ends always interpolate: the first and last control points are
/// evaluated with an effective tension of `min(tension, 0)`, so the curve
/// starts and ends exactly on them.
///
/// All evaluation methods take `&self` and are free of side effects, so a
/// spline that is not being mutated can be shared between threads.
///
/// # Example
///
/// ```
/// use xspline::XSpline;
/// use nalgebra::Point2;
///
/// let mut spline = XSpline::new();
/// spline.append_control_point(Point2::new(0.0, 0.0), 0.0).unwrap();
/// spline.append_control_point(Point2::new(1.0, 1.0), -1.0).unwrap();
/// spline.append_control_point(Point2::new(2.0, 0.0), 0.0).unwrap();
///
/// assert_eq!(spline.num_segments(), 2);
///
/// let start = spline.point_at(0.0).unwrap();
/// assert!((start - Point2::new(0.0, 0.0)).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XSpline {
    control_points: Vec<ControlPoint>,
}

impl XSpline {
    /// Create an empty spline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a spline from `(position, tension)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::InvalidTension`] if any tension is outside `[-1, 1]`.
    pub fn from_control_points<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Point2<f64>, f64)>,
    {
        let control_points = points
            .into_iter()
            .map(|(pos, tension)| ControlPoint::new(pos, tension))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { control_points })
    }

    /// Number of control points.
    #[must_use]
    pub fn num_control_points(&self) -> usize {
        self.control_points.len()
    }

    /// Whether the spline has no control points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }

    /// Number of segments, that is `max(0, num_control_points - 1)`.
    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.control_points.len().saturating_sub(1)
    }

    /// All control points in order.
    #[must_use]
    pub fn control_points(&self) -> &[ControlPoint] {
        &self.control_points
    }

    /// Global parameter at which control point `idx` sits, `idx / num_segments`.
    ///
    /// # Errors
    ///
    /// - [`SplineError::InsufficientControlPoints`] with fewer than 2 control points
    /// - [`SplineError::IndexOutOfRange`] if `idx >= num_control_points`
    pub fn control_point_index_to_t(&self, idx: usize) -> Result<f64> {
        self.ensure_evaluable()?;
        self.check_index(idx)?;
        Ok(self.junction_t(idx))
    }

    /// Append a control point to the end of the spline.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::InvalidTension`] if `tension` is outside `[-1, 1]`.
    pub fn append_control_point(&mut self, pos: Point2<f64>, tension: f64) -> Result<()> {
        let cp = ControlPoint::new(pos, tension)?;
        self.control_points.push(cp);
        Ok(())
    }

    /// Insert a control point so that it ends up at index `idx`.
    ///
    /// Control points from `idx` onwards shift one position up.
    ///
    /// # Errors
    ///
    /// - [`SplineError::IndexOutOfRange`] if `idx > num_control_points`
    /// - [`SplineError::InvalidTension`] if `tension` is outside `[-1, 1]`
    pub fn insert_control_point(
        &mut self,
        idx: usize,
        pos: Point2<f64>,
        tension: f64,
    ) -> Result<()> {
        if idx > self.control_points.len() {
            return Err(SplineError::index_out_of_range(
                idx,
                self.control_points.len(),
            ));
        }
        let cp = ControlPoint::new(pos, tension)?;
        self.control_points.insert(idx, cp);
        trace!(idx, len = self.control_points.len(), "Inserted control point");
        Ok(())
    }

    /// Remove the control point at `idx`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::IndexOutOfRange`] if `idx >= num_control_points`.
    pub fn erase_control_point(&mut self, idx: usize) -> Result<ControlPoint> {
        self.check_index(idx)?;
        let removed = self.control_points.remove(idx);
        trace!(idx, len = self.control_points.len(), "Erased control point");
        Ok(removed)
    }

    /// Position of the control point at `idx`.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::IndexOutOfRange`] if `idx >= num_control_points`.
    pub fn control_point_position(&self, idx: usize) -> Result<Point2<f64>> {
        self.check_index(idx)?;
        Ok(self.control_points[idx].position())
    }

    /// Move the control point at `idx` to `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::IndexOutOfRange`] if `idx >= num_control_points`.
    pub fn move_control_point(&mut self, idx: usize, pos: Point2<f64>) -> Result<()> {
        self.check_index(idx)?;
        self.control_points[idx].set_position(pos);
        Ok(())
    }

    /// Tension of the control point at `idx`.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::IndexOutOfRange`] if `idx >= num_control_points`.
    pub fn control_point_tension(&self, idx: usize) -> Result<f64> {
        self.check_index(idx)?;
        Ok(self.control_points[idx].tension())
    }

    /// Change the tension of the control point at `idx`.
    ///
    /// # Errors
    ///
    /// - [`SplineError::IndexOutOfRange`] if `idx >= num_control_points`
    /// - [`SplineError::InvalidTension`] if `tension` is outside `[-1, 1]`
    pub fn set_control_point_tension(&mut self, idx: usize, tension: f64) -> Result<()> {
        self.check_index(idx)?;
        let tension = validate_tension(tension)?;
        self.control_points[idx].set_tension_unchecked(tension);
        Ok(())
    }

    /// Exchange the control points of two splines.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.control_points, &mut other.control_points);
    }

    fn check_index(&self, idx: usize) -> Result<()> {
        if idx < self.control_points.len() {
            Ok(())
        } else {
            Err(SplineError::index_out_of_range(
                idx,
                self.control_points.len(),
            ))
        }
    }

    /// Fails unless the spline has enough control points to be evaluated.
    pub(crate) fn ensure_evaluable(&self) -> Result<()> {
        if self.control_points.len() < MIN_CONTROL_POINTS {
            return Err(SplineError::insufficient_control_points(
                MIN_CONTROL_POINTS,
                self.control_points.len(),
            ));
        }
        Ok(())
    }

    /// Parameter of control point `idx`. Requires an evaluable spline.
    pub(crate) fn junction_t(&self, idx: usize) -> f64 {
        idx as f64 / self.num_segments() as f64
    }

    pub(crate) fn position_of(&self, idx: usize) -> Point2<f64> {
        self.control_points[idx].position()
    }

    /// Tension used for evaluation. End points never approximate.
    pub(crate) fn effective_tension(&self, idx: usize) -> f64 {
        let tension = self.control_points[idx].tension();
        if idx == 0 || idx + 1 == self.control_points.len() {
            tension.min(0.0)
        } else {
            tension
        }
    }
}
