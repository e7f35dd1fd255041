//! # Conductor Geometry
//!
//! Pure functions turning conductor coordinates into the two geometric
//! quantities the line model needs:
//!
//! - **GMR** (geometric mean radius) of one phase bundle
//! - **GMD** (geometric mean distance) between two phase bundles
//!
//! All functions are unit-agnostic; the session feeds them meters.
//! Products of many distances are evaluated as sums of logarithms so large
//! bundles and widely spread values neither overflow nor underflow.
//!
//! ## Example
//!
//! ```rust
//! use tline_core::geometry::{compute_gmd, compute_gmr, Point};
//!
//! let a = vec![Point::new(-0.2, 0.0), Point::new(0.2, 0.0)];
//! let b = vec![Point::new(9.8, 0.0), Point::new(10.2, 0.0)];
//!
//! let gmr = compute_gmr(&a, 0.01);
//! // 4th root of r'^2 * d^2 with d = 0.4
//! assert!((gmr - (0.01f64 * 0.4).sqrt()).abs() < 1e-12);
//!
//! let gmd = compute_gmd(&a, &b);
//! assert!((gmd - 10.0).abs() < 0.01);
//! ```

pub mod presets;

use serde::{Deserialize, Serialize};

pub use presets::BundlePreset;

/// Self-GMR of a solid round conductor as a fraction of its radius,
/// e^(-1/4) rounded to four places.
pub const SOLID_CONDUCTOR_GMR_FACTOR: f64 = 0.7788;

/// A 2-D conductor position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Multiply both coordinates by `factor`
    pub fn scaled(self, factor: f64) -> Self {
        Point::new(self.x * factor, self.y * factor)
    }
}

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    (p1.x - p2.x).hypot(p1.y - p2.y)
}

/// Geometric mean of positive values, computed in log space.
///
/// An empty slice yields 1.0, the neutral element of the product. A zero
/// anywhere in the input yields 0.0. Negative inputs are outside the
/// contract and produce NaN.
pub fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    (log_sum / values.len() as f64).exp()
}

/// Arithmetic mean; 1.0 for an empty slice to mirror [`geometric_mean`].
pub fn arithmetic_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Distances between every unordered pair of points, C(n, 2) of them.
pub fn pairwise_distances(points: &[Point]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
    for (i, p1) in points.iter().enumerate() {
        for p2 in &points[i + 1..] {
            distances.push(distance(*p1, *p2));
        }
    }
    distances
}

/// Geometric mean radius of a bundle of parallel sub-conductors.
///
/// GMR is the n²-th root of the n² distance terms: n self terms equal to
/// `r_self` and n(n-1) mutual terms, each unordered pair counted twice.
///
/// - 0 points: 1.0 (neutral)
/// - 1 point: `r_self` exactly
/// - coincident sub-conductors: 0.0
pub fn compute_gmr(bundle_points: &[Point], r_self: f64) -> f64 {
    let n = bundle_points.len();
    match n {
        0 => 1.0,
        1 => r_self,
        _ => {
            let n_f = n as f64;
            let mutual_log_sum: f64 = pairwise_distances(bundle_points)
                .iter()
                .map(|d| d.ln())
                .sum();
            let log_gmr = (n_f * r_self.ln() + 2.0 * mutual_log_sum) / (n_f * n_f);
            log_gmr.exp()
        }
    }
}

/// Geometric mean distance between two bundles over all m×n cross pairs.
///
/// Returns 1.0 if either bundle is empty.
pub fn compute_gmd(bundle1: &[Point], bundle2: &[Point]) -> f64 {
    if bundle1.is_empty() || bundle2.is_empty() {
        return 1.0;
    }
    let distances: Vec<f64> = bundle1
        .iter()
        .flat_map(|p1| bundle2.iter().map(move |p2| distance(*p1, *p2)))
        .collect();
    geometric_mean(&distances)
}

/// Self-GMR (r') of a solid round conductor with the given physical radius.
pub fn self_gmr_from_radius(radius: f64) -> f64 {
    SOLID_CONDUCTOR_GMR_FACTOR * radius
}
