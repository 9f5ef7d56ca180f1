//! Adaptive polyline sampling.
//!
//! The sampler starts from the ends of the requested range and every
//! junction inside it, then bisects each interval until the chord is short
//! enough and the curve point at the interval's mid-parameter is close enough
//! to the chord. Subdivision runs on an explicit work stack, so samples come
//! out lazily and in increasing `t` order.

use crate::geom::project_onto_segment;
use crate::segment::check_parameter;
use crate::{Result, SplineError, XSpline};
use nalgebra::Point2;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default minimum number of bisection levels per junction interval.
pub const DEFAULT_MIN_DEPTH: u32 = 2;

/// Default maximum number of bisection levels per junction interval.
pub const DEFAULT_MAX_DEPTH: u32 = 30;

/// Error tolerances and safety bounds for [`XSpline::sample`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingParams {
    /// Maximum distance between the polyline and the curve. Default: unbounded.
    pub max_dist_from_spline: f64,

    /// Maximum distance between consecutive samples. Default: unbounded.
    pub max_dist_between_samples: f64,

    /// Bisection levels applied to every junction interval regardless of the
    /// tolerances. Catches S-shaped spans whose mid-parameter point happens to
    /// lie on the chord. Default: 2
    pub min_depth: u32,

    /// Bisection levels after which an interval is accepted even if it still
    /// violates a tolerance. Guarantees termination on degenerate geometry.
    /// Default: 30
    pub max_depth: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_dist_from_spline: f64::MAX,
            max_dist_between_samples: f64::MAX,
            min_depth: DEFAULT_MIN_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SamplingParams {
    /// Params bounding only the distance from the polyline to the curve.
    #[must_use]
    pub fn with_max_dist_from_spline(max_dist: f64) -> Self {
        Self {
            max_dist_from_spline: max_dist,
            ..Default::default()
        }
    }

    /// Set the maximum distance between consecutive samples.
    #[must_use]
    pub const fn with_max_dist_between_samples(mut self, max_dist: f64) -> Self {
        self.max_dist_between_samples = max_dist;
        self
    }

    /// Set the minimum bisection depth.
    #[must_use]
    pub const fn with_min_depth(mut self, depth: u32) -> Self {
        self.min_depth = depth;
        self
    }

    /// Set the bisection depth safety cap.
    #[must_use]
    pub const fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Check the params for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::InvalidArgument`] if a tolerance is negative or
    /// NaN, or if `min_depth > max_depth`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("max_dist_from_spline", self.max_dist_from_spline),
            ("max_dist_between_samples", self.max_dist_between_samples),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(SplineError::invalid_argument(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if self.min_depth > self.max_depth {
            return Err(SplineError::invalid_argument(format!(
                "min_depth {} exceeds max_depth {}",
                self.min_depth, self.max_depth
            )));
        }
        Ok(())
    }
}

/// Role of a sample in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleKind {
    /// First sample, at the start of the range.
    Head,
    /// Sample at a control point's parameter.
    Junction,
    /// Sample added by subdivision.
    Default,
    /// Last sample, at the end of the range.
    Tail,
}

/// A point on the spline and its parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Point on the spline.
    pub point: Point2<f64>,
    /// Parameter of the point.
    pub t: f64,
    /// Role of the sample.
    pub kind: SampleKind,
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    from: Sample,
    to: Sample,
    depth: u32,
}

/// Lazy sequence of samples produced by [`XSpline::sample`].
///
/// Clone it before iterating to walk the same sequence again.
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    spline: &'a XSpline,
    max_sq_dist_to_spline: f64,
    max_sq_dist_between_samples: f64,
    min_depth: u32,
    max_depth: u32,
    head: Option<Sample>,
    stack: Vec<Interval>,
    truncated: bool,
}

impl Samples<'_> {
    /// Bisect the interval if it violates a tolerance, returning the new
    /// middle sample.
    fn split(&mut self, interval: &Interval) -> Option<Sample> {
        let Interval { from, to, depth } = *interval;
        if to.t <= from.t {
            return None;
        }
        if depth >= self.max_depth {
            if !self.truncated {
                self.truncated = true;
                debug!(
                    t0 = from.t,
                    t1 = to.t,
                    max_depth = self.max_depth,
                    "Sampling depth cap reached, tolerances not met"
                );
            }
            return None;
        }

        let mid_t = 0.5 * (from.t + to.t);
        let mid = Sample {
            point: self.spline.eval_point(mid_t),
            t: mid_t,
            kind: SampleKind::Default,
        };
        if depth < self.min_depth {
            return Some(mid);
        }

        let chord_sq = (to.point - from.point).norm_squared();
        let (_, deviation_sq) = project_onto_segment(mid.point, from.point, to.point);
        if chord_sq <= self.max_sq_dist_between_samples
            && deviation_sq <= self.max_sq_dist_to_spline
        {
            None
        } else {
            Some(mid)
        }
    }
}

impl Iterator for Samples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if let Some(head) = self.head.take() {
            return Some(head);
        }
        while let Some(interval) = self.stack.pop() {
            match self.split(&interval) {
                Some(mid) => {
                    let depth = interval.depth + 1;
                    self.stack.push(Interval {
                        from: mid,
                        to: interval.to,
                        depth,
                    });
                    self.stack.push(Interval {
                        from: interval.from,
                        to: mid,
                        depth,
                    });
                }
                None => return Some(interval.to),
            }
        }
        None
    }
}

impl XSpline {
    /// Sample the spline over `[from_t, to_t]`.
    ///
    /// The sequence starts with a [`SampleKind::Head`] sample at `from_t`,
    /// ends with a [`SampleKind::Tail`] sample at `to_t`, contains a
    /// [`SampleKind::Junction`] sample for every control point parameter
    /// strictly inside the range, and is ordered by `t`. Consecutive samples
    /// are at most `max_dist_between_samples` apart and the curve at the
    /// middle of their parameter interval lies within `max_dist_from_spline`
    /// of the chord, unless the depth cap cut subdivision short.
    ///
    /// # Errors
    ///
    /// - [`SplineError::InsufficientControlPoints`] with fewer than 2 control points
    /// - [`SplineError::InvalidArgument`] for invalid params, a bound outside
    ///   `[0, 1]` or `from_t > to_t`
    ///
    /// # Example
    ///
    /// ```
    /// use xspline::{SamplingParams, XSpline};
    /// use nalgebra::Point2;
    ///
    /// let spline = XSpline::from_control_points([
    ///     (Point2::new(0.0, 0.0), 0.0),
    ///     (Point2::new(5.0, 5.0), -1.0),
    ///     (Point2::new(10.0, 0.0), 0.0),
    /// ]).unwrap();
    ///
    /// let params = SamplingParams::with_max_dist_from_spline(0.1);
    /// let samples: Vec<_> = spline.sample(&params, 0.0, 1.0).unwrap().collect();
    /// assert!(samples.windows(2).all(|w| w[0].t < w[1].t));
    /// ```
    pub fn sample(&self, params: &SamplingParams, from_t: f64, to_t: f64) -> Result<Samples<'_>> {
        self.ensure_evaluable()?;
        params.validate()?;
        check_parameter(from_t)?;
        check_parameter(to_t)?;
        if from_t > to_t {
            return Err(SplineError::invalid_argument(format!(
                "sample range start {from_t} is after its end {to_t}"
            )));
        }

        let head = Sample {
            point: self.eval_point(from_t),
            t: from_t,
            kind: SampleKind::Head,
        };
        let tail = Sample {
            point: self.eval_point(to_t),
            t: to_t,
            kind: SampleKind::Tail,
        };

        let mut knots = vec![head];
        knots.extend(
            (1..self.num_segments())
                .map(|idx| self.junction_t(idx))
                .filter(|&t| t > from_t && t < to_t)
                .map(|t| Sample {
                    point: self.eval_point(t),
                    t,
                    kind: SampleKind::Junction,
                }),
        );
        knots.push(tail);

        let stack = knots
            .windows(2)
            .rev()
            .map(|w| Interval {
                from: w[0],
                to: w[1],
                depth: 0,
            })
            .collect();

        Ok(Samples {
            spline: self,
            max_sq_dist_to_spline: params.max_dist_from_spline * params.max_dist_from_spline,
            max_sq_dist_between_samples: params.max_dist_between_samples
                * params.max_dist_between_samples,
            min_depth: params.min_depth,
            max_depth: params.max_depth,
            head: Some(head),
            stack,
            truncated: false,
        })
    }

    /// Sample the spline over `[from_t, to_t]` and keep only the points.
    ///
    /// # Errors
    ///
    /// Same as [`XSpline::sample`].
    pub fn to_polyline(
        &self,
        params: &SamplingParams,
        from_t: f64,
        to_t: f64,
    ) -> Result<Vec<Point2<f64>>> {
        Ok(self
            .sample(params, from_t, to_t)?
            .map(|sample| sample.point)
            .collect())
    }
}
