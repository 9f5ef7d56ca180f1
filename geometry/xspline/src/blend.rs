//! X-Spline blending functions.
//!
//! A segment between control points `P1` and `P2` is a weighted combination of
//! four control points `P0..P3`. Each weight is a quintic polynomial in a
//! rescaled parameter, chosen per control point from two families defined in
//! section 5 of Blanc & Schlick, "X-splines: a spline model designed for the
//! end-user":
//!
//! ```text
//! g(u) = q u + 2q u² + (10 - 12q - p) u³ + (2p + 14q - 15) u⁴ + (6 - 5q - p) u⁵
//! h(u) = q u + 2q u² - 2q u⁴ - q u⁵
//! ```
//!
//! `g` carries the usual approximating influence. `h` only becomes non-zero
//! for negative tensions and produces the interpolating overshoot. The raw
//! weights are normalized to sum to one.

/// Local knots of the four control points around a segment. The segment
/// itself spans `[KNOTS[1], KNOTS[2]] = [0, 1]`.
const KNOTS: [f64; 4] = [-1.0, 0.0, 1.0, 2.0];

/// The effect a tension value has on the curve near its control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Negative tension. The curve passes through the point, `q ∈ (0, 0.5]`
    /// controls how round the passage is.
    Interpolating {
        /// Blend parameter, `-tension / 2`.
        q: f64,
    },
    /// Zero tension. The curve passes through the point with a sharp corner.
    Corner,
    /// Positive tension. The curve is pulled towards the point, `s ∈ (0, 1]`
    /// widens the point's influence.
    Approximating {
        /// Knot offset, equal to the tension.
        s: f64,
    },
}

impl Shape {
    /// Classify a tension value in `[-1, 1]`.
    #[must_use]
    pub fn from_tension(tension: f64) -> Self {
        if tension < 0.0 {
            Self::Interpolating { q: -0.5 * tension }
        } else if tension > 0.0 {
            Self::Approximating { s: tension }
        } else {
            Self::Corner
        }
    }

    /// Knot offset. Non-zero only for approximating shapes.
    #[must_use]
    pub fn s(self) -> f64 {
        match self {
            Self::Approximating { s } => s,
            Self::Interpolating { .. } | Self::Corner => 0.0,
        }
    }

    /// Interpolation blend parameter. Non-zero only for interpolating shapes.
    #[must_use]
    pub fn q(self) -> f64 {
        match self {
            Self::Interpolating { q } => q,
            Self::Approximating { .. } | Self::Corner => 0.0,
        }
    }
}

/// A quintic without constant term, `c1 u + c2 u² + c3 u³ + c4 u⁴ + c5 u⁵`.
#[derive(Debug, Clone, Copy)]
struct Quintic([f64; 5]);

impl Quintic {
    fn g(q: f64, p: f64) -> Self {
        Self([
            q,
            2.0 * q,
            10.0 - 12.0 * q - p,
            2.0 * p + 14.0 * q - 15.0,
            6.0 - 5.0 * q - p,
        ])
    }

    fn h(q: f64) -> Self {
        Self([q, 2.0 * q, 0.0, -2.0 * q, -q])
    }

    /// Value, first and second derivative at `u`.
    fn eval(&self, u: f64) -> (f64, f64, f64) {
        let [c1, c2, c3, c4, c5] = self.0;
        let value = u * (c1 + u * (c2 + u * (c3 + u * (c4 + u * c5))));
        let d1 = c1 + u * (2.0 * c2 + u * (3.0 * c3 + u * (4.0 * c4 + u * 5.0 * c5)));
        let d2 = 2.0 * c2 + u * (6.0 * c3 + u * (12.0 * c4 + u * 20.0 * c5));
        (value, d1, d2)
    }
}

/// Blend weights of the four control points defining a segment, with their
/// first and second derivatives with respect to the local parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    /// Weights of `P0..P3`.
    pub values: [f64; 4],
    /// First derivatives of the weights.
    pub first: [f64; 4],
    /// Second derivatives of the weights.
    pub second: [f64; 4],
}

/// Blending functions of one segment, derived from the tensions of the
/// segment's start and end control points.
///
/// This is a pure value: building and evaluating it touches no shared state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBlend {
    /// `T0+`, `T1+`, `T2-`, `T3-`: where each control point's influence ends.
    bounds: [f64; 4],
    q: [f64; 4],
    p: [f64; 4],
}

impl SegmentBlend {
    /// Build the blending functions for a segment whose start and end
    /// control points have the given tensions.
    #[must_use]
    pub fn new(start_tension: f64, end_tension: f64) -> Self {
        let start = Shape::from_tension(start_tension);
        let end = Shape::from_tension(end_tension);

        // Tk+ = t(k+1) + s(k+1), Tk- = t(k-1) - s(k-1)
        let bounds = [
            KNOTS[1] + start.s(),
            KNOTS[2] + end.s(),
            KNOTS[1] - start.s(),
            KNOTS[2] - end.s(),
        ];
        let q = [start.q(), end.q(), start.q(), end.q()];
        let p = std::array::from_fn(|i| {
            let d = KNOTS[i] - bounds[i];
            2.0 * d * d
        });

        Self { bounds, q, p }
    }

    /// Raw, unnormalized weights at local parameter `u ∈ [0, 1]`.
    fn raw(&self, u: f64) -> BlendWeights {
        let polys = [
            if u <= self.bounds[0] {
                Quintic::g(self.q[0], self.p[0])
            } else {
                Quintic::h(self.q[0])
            },
            Quintic::g(self.q[1], self.p[1]),
            Quintic::g(self.q[2], self.p[2]),
            if u >= self.bounds[3] {
                Quintic::g(self.q[3], self.p[3])
            } else {
                Quintic::h(self.q[3])
            },
        ];

        let mut out = BlendWeights {
            values: [0.0; 4],
            first: [0.0; 4],
            second: [0.0; 4],
        };
        for (i, poly) in polys.iter().enumerate() {
            let du = 1.0 / (KNOTS[i] - self.bounds[i]);
            let (v, d1, d2) = poly.eval((u - self.bounds[i]) * du);
            out.values[i] = v;
            out.first[i] = d1 * du;
            out.second[i] = d2 * du * du;
        }
        out
    }

    /// Normalized weights at local parameter `u ∈ [0, 1]`, summing to one.
    ///
    /// Derivatives follow the quotient rule, so the first derivatives sum to
    /// zero and so do the second derivatives.
    #[must_use]
    pub fn weights(&self, u: f64) -> BlendWeights {
        let raw = self.raw(u);
        let sum: f64 = raw.values.iter().sum();
        let sum_d1: f64 = raw.first.iter().sum();
        let sum_d2: f64 = raw.second.iter().sum();

        let mut out = raw;
        for i in 0..4 {
            let w = raw.values[i] / sum;
            let w1 = (raw.first[i] - w * sum_d1) / sum;
            let w2 = (raw.second[i] - 2.0 * w1 * sum_d1 - w * sum_d2) / sum;
            out.values[i] = w;
            out.first[i] = w1;
            out.second[i] = w2;
        }
        out
    }
}

/// Normalized blend weights of a segment at local parameter `u`.
///
/// Shorthand for `SegmentBlend::new(start_tension, end_tension).weights(u)`.
#[must_use]
pub fn blend_weights(start_tension: f64, end_tension: f64, u: f64) -> BlendWeights {
    SegmentBlend::new(start_tension, end_tension).weights(u)
}
