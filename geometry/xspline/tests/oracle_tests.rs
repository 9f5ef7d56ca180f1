//! Randomized tests comparing spline queries against brute-force oracles.
//!
//! Run with: cargo test -p xspline --test oracle_tests

#![allow(clippy::unwrap_used, clippy::expect_used)]

use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xspline::{SampleKind, SamplingParams, XSpline};

// =============================================================================
// Helpers
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Tensions {
    Fixed(f64),
    Random,
}

fn random_spline(rng: &mut StdRng, tensions: Tensions) -> XSpline {
    let num_points = rng.gen_range(2..8);
    let mut spline = XSpline::new();
    for _ in 0..num_points {
        let pos = Point2::new(rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0));
        let tension = match tensions {
            Tensions::Fixed(tension) => tension,
            Tensions::Random => rng.gen_range(-1.0..=1.0),
        };
        spline.append_control_point(pos, tension).unwrap();
    }
    spline
}

fn distance_to_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let s = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * s)).norm()
}

/// Smallest distance from `to` to a dense uniform sampling of the spline.
fn brute_force_distance(spline: &XSpline, to: Point2<f64>) -> f64 {
    const STEPS: u32 = 20_000;
    (0..=STEPS)
        .map(|i| (spline.point_at(f64::from(i) / f64::from(STEPS)).unwrap() - to).norm())
        .fold(f64::INFINITY, f64::min)
}

// =============================================================================
// Linear combinations
// =============================================================================

#[test]
fn linear_combination_matches_evaluation() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let spline = random_spline(&mut rng, Tensions::Random);
        for _ in 0..100 {
            let t = rng.gen_range(0.0..=1.0);
            let combined = spline
                .linear_combination_at(t)
                .unwrap()
                .iter()
                .fold(Vector2::zeros(), |acc, c| {
                    acc + spline.control_point_position(c.control_point_idx).unwrap().coords
                        * c.coeff
                });
            let point = spline.point_at(t).unwrap();
            assert!(
                (combined - point.coords).norm() < 1e-9,
                "t = {t}: {combined:?} vs {point:?}"
            );
        }
    }
}

// =============================================================================
// Sampling
// =============================================================================

#[test]
fn sampling_respects_tolerances() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let spline = random_spline(&mut rng, Tensions::Random);
        let fit = rng.gen_range(0.005..0.2);
        let density = rng.gen_range(0.2..3.0);
        let params = SamplingParams::with_max_dist_from_spline(fit)
            .with_max_dist_between_samples(density);

        let samples: Vec<_> = spline.sample(&params, 0.0, 1.0).unwrap().collect();
        let junctions = samples
            .iter()
            .filter(|s| s.kind == SampleKind::Junction)
            .count();
        assert_eq!(junctions, spline.num_segments() - 1);

        for w in samples.windows(2) {
            let (a, b) = (w[0], w[1]);
            assert!(a.t < b.t);
            assert!((b.point - a.point).norm() <= density + 1e-12);

            let mid = spline.point_at(0.5 * (a.t + b.t)).unwrap();
            assert!(distance_to_segment(mid, a.point, b.point) <= fit + 1e-12);
        }
    }
}

#[test]
fn sub_range_sampling_matches_full_curve() {
    let mut rng = StdRng::seed_from_u64(11);
    let spline = random_spline(&mut rng, Tensions::Fixed(0.5));
    let params = SamplingParams::with_max_dist_from_spline(0.02);

    for _ in 0..20 {
        let a: f64 = rng.gen_range(0.0..=1.0);
        let b: f64 = rng.gen_range(0.0..=1.0);
        let (from_t, to_t) = (a.min(b), a.max(b));
        for sample in spline.sample(&params, from_t, to_t).unwrap() {
            assert!(sample.t >= from_t && sample.t <= to_t);
            let expected = spline.point_at(sample.t).unwrap();
            assert!((sample.point - expected).norm() < 1e-12);
        }
    }
}

// =============================================================================
// Closest point
// =============================================================================

#[test]
fn closest_point_is_within_accuracy_of_oracle() {
    let mut rng = StdRng::seed_from_u64(3);
    for tensions in [
        Tensions::Fixed(-1.0),
        Tensions::Fixed(0.0),
        Tensions::Fixed(1.0),
        Tensions::Random,
    ] {
        for _ in 0..3 {
            let spline = random_spline(&mut rng, tensions);
            for accuracy in [0.05, XSpline::DEFAULT_ACCURACY] {
                for _ in 0..4 {
                    let query = Point2::new(rng.gen_range(-2.0..12.0), rng.gen_range(-2.0..12.0));
                    let closest = spline.point_closest_to(query, accuracy).unwrap();
                    let oracle = brute_force_distance(&spline, query);

                    assert!(
                        closest.distance <= oracle + accuracy,
                        "{tensions:?}, accuracy {accuracy}, query {query:?}: {} vs {oracle}",
                        closest.distance
                    );
                    let on_curve = spline.point_at(closest.t).unwrap();
                    assert!((on_curve - closest.point).norm() < 1e-12);
                    assert!(((closest.point - query).norm() - closest.distance).abs() < 1e-12);
                }
            }
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn corner_arch_passes_through_apex() {
    let spline = XSpline::from_control_points([
        (Point2::new(0.0, 0.0), 0.0),
        (Point2::new(1.0, 1.0), 0.0),
        (Point2::new(2.0, 0.0), 0.0),
    ])
    .unwrap();
    let mid = spline.point_at(0.5).unwrap();
    assert!((mid - Point2::new(1.0, 1.0)).norm() < 1e-12);
}

#[test]
fn approximating_arch_stays_below_apex() {
    let spline = XSpline::from_control_points([
        (Point2::new(0.0, 0.0), 1.0),
        (Point2::new(1.0, 1.0), 1.0),
        (Point2::new(2.0, 0.0), 1.0),
    ])
    .unwrap();
    let mid = spline.point_at(0.5).unwrap();
    assert!((mid.x - 1.0).abs() < 1e-12);
    assert!(mid.y > 0.0 && mid.y < 1.0);

    // Ends still interpolate
    assert!((spline.point_at(0.0).unwrap() - Point2::new(0.0, 0.0)).norm() < 1e-12);
    assert!((spline.point_at(1.0).unwrap() - Point2::new(2.0, 0.0)).norm() < 1e-12);
}

#[test]
fn erasing_below_two_points_blocks_evaluation() {
    let mut spline = XSpline::from_control_points([
        (Point2::new(0.0, 0.0), 0.0),
        (Point2::new(1.0, 1.0), 0.0),
    ])
    .unwrap();
    assert!(spline.point_at(0.5).is_ok());

    spline.erase_control_point(0).unwrap();
    assert!(spline.point_at(0.5).unwrap_err().is_invalid_state());
    assert!(spline.linear_combination_at(0.5).unwrap_err().is_invalid_state());
    assert!(
        spline
            .sample(&SamplingParams::default(), 0.0, 1.0)
            .unwrap_err()
            .is_invalid_state()
    );
    assert!(
        spline
            .point_closest_to(Point2::origin(), 0.1)
            .unwrap_err()
            .is_invalid_state()
    );

    // Editing keeps working
    spline.append_control_point(Point2::new(3.0, 0.0), -1.0).unwrap();
    assert!(spline.point_at(0.5).is_ok());
}
