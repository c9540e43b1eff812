//! Membership function shapes.
//!
//! Piecewise-linear, total functions: every finite `x` maps to a degree in
//! `[0, 1]`.  Flat regions are tested before slopes, so a slope is only ever
//! evaluated when its run is strictly positive; a zero-run edge behaves as a
//! step.

use serde::{Deserialize, Serialize};

/// A membership function over one fuzzy variable's universe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Peak at `b`, zero at and beyond `a` and `c`.
    Triangular(f64, f64, f64),
    /// Plateau on `[b, c]`, zero at and beyond `a` and `d`.
    Trapezoidal(f64, f64, f64, f64),
}

impl MembershipFunction {
    /// Degree of membership of `x`.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular(a, b, c) => triangular(x, a, b, c),
            Self::Trapezoidal(a, b, c, d) => trapezoidal(x, a, b, c, d),
        }
    }

    /// Control points are finite and non-decreasing.
    pub fn is_well_formed(&self) -> bool {
        let points: &[f64] = match self {
            Self::Triangular(a, b, c) => &[*a, *b, *c],
            Self::Trapezoidal(a, b, c, d) => &[*a, *b, *c, *d],
        };
        points.iter().all(|p| p.is_finite()) && points.windows(2).all(|w| w[0] <= w[1])
    }

    /// Outer support bounds `(left, right)`.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Self::Triangular(a, _, c) => (a, c),
            Self::Trapezoidal(a, _, _, d) => (a, d),
        }
    }
}

fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    // Checked first so a == b == c still yields 1 at the single point.
    if x == b {
        return 1.0;
    }
    if x <= a || x >= c {
        return 0.0;
    }
    if x < b {
        // a < x < b, so b - a > 0
        (x - a) / (b - a)
    } else {
        (c - x) / (c - b)
    }
}

fn trapezoidal(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if b <= x && x <= c {
        return 1.0;
    }
    if x <= a || x >= d {
        return 0.0;
    }
    if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    }
}
