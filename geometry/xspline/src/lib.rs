//! Open X-Spline curves for interactive editing and curve fitting.
//!
//! X-Splines (Blanc & Schlick, 1995) give every control point a tension in
//! `[-1, 1]` that selects the local behaviour of the curve:
//!
//! - `tension < 0`: the curve passes through the control point smoothly
//! - `tension = 0`: the curve passes through it with a sharp corner
//! - `tension > 0`: the curve is pulled towards it without reaching it
//!
//! The crate covers:
//!
//! - **Editing**: append, insert, erase and move control points, change tensions
//! - **Evaluation**: points, first and second derivatives, signed curvature
//! - **Linear combinations**: any curve point as a weighted sum of control points
//! - **Sampling**: adaptive, error-bounded polylines via [`XSpline::sample`]
//! - **Projection**: the closest curve point to an arbitrary point
//! - **Fitting terms**: quadratic regularization energies over control point
//!   displacements, and the [`FittableSpline`] capability trait
//!
//! The curve itself is parametrized by `t ∈ [0, 1]`, spread uniformly over
//! the segments between consecutive control points. Open ends always
//! interpolate: the first and last control points are evaluated with a tension
//! of at most zero.
//!
//! # Example
//!
//! ```
//! use xspline::{SamplingParams, XSpline};
//! use nalgebra::Point2;
//!
//! let mut spline = XSpline::new();
//! spline.append_control_point(Point2::new(0.0, 0.0), 0.0).unwrap();
//! spline.append_control_point(Point2::new(4.0, 4.0), 1.0).unwrap();
//! spline.append_control_point(Point2::new(8.0, 0.0), 0.0).unwrap();
//!
//! // Points and derivatives
//! let mid = spline.point_at(0.5).unwrap();
//! assert!(mid.y > 0.0 && mid.y < 4.0);
//!
//! // Polyline within 0.05 of the curve
//! let params = SamplingParams::with_max_dist_from_spline(0.05);
//! let polyline = spline.to_polyline(&params, 0.0, 1.0).unwrap();
//! assert!(polyline.len() > 3);
//!
//! // Projection onto the curve
//! let closest = spline.point_closest_to(Point2::new(4.0, 10.0), 0.01).unwrap();
//! assert!((closest.t - 0.5).abs() < 0.01);
//! ```
//!
//! # Coordinate System
//!
//! Curves live in the plane. Nothing assumes an axis orientation except the
//! sign of [`PointAndDerivs::signed_curvature`], which is positive for turns
//! towards +y. With image coordinates (y pointing down) that is a clockwise
//! turn.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. Evaluation is
//! free of side effects, so a spline that is not being mutated can be read
//! from several threads.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization for [`SamplingParams`], [`SampleKind`] and
//!   [`LinearCoefficient`]

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::suboptimal_flops,
    clippy::missing_const_for_fn,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::float_cmp,
    clippy::needless_range_loop,
    clippy::return_self_not_must_use
)]

mod blend;
mod closest;
mod control_point;
mod energy;
mod error;
mod fittable;
mod geom;
mod linear;
mod quadratic;
mod sampling;
mod segment;
mod spline;

// Re-export core types
pub use blend::{BlendWeights, SegmentBlend, Shape, blend_weights};
pub use closest::ClosestPoint;
pub use control_point::{ControlPoint, MAX_TENSION, MIN_TENSION, validate_tension};
pub use energy::displacement_var;
pub use error::SplineError;
pub use fittable::{FittableSpline, apply_displacements};
pub use linear::LinearCoefficient;
pub use quadratic::QuadraticForm;
pub use sampling::{
    DEFAULT_MAX_DEPTH, DEFAULT_MIN_DEPTH, Sample, SampleKind, Samples, SamplingParams,
};
pub use segment::PointAndDerivs;
pub use spline::{MIN_CONTROL_POINTS, XSpline};

// Re-export nalgebra types for convenience
pub use nalgebra::{DMatrix, DVector, Point2, Vector2};

/// Result type for spline operations.
pub type Result<T> = std::result::Result<T, SplineError>;
