//! Point-to-segment projection.

use nalgebra::Point2;

/// Project `p` onto the segment `a..b`.
///
/// Returns `(s, sq_dist)` where `s ∈ [0, 1]` is the position of the
/// projection along the segment and `sq_dist` the squared distance from `p`
/// to it. A zero-length segment projects everything onto `a`.
pub(crate) fn project_onto_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> (f64, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    let s = if len_sq > 0.0 {
        ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let projection = a + ab * s;
    (s, (p - projection).norm_squared())
}
