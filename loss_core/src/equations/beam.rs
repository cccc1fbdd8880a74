//! # Simply-Supported Beam Formulas
//!
//! Moments in a simply-supported span with a pin at x = 0 and a roller at
//! x = L. Units follow the caller (kip and in for the loss engine).
//!
//! ## Notation
//!
//! - `L` = Span length
//! - `x` = Position along beam from left support
//! - `a` = Load position from left support
//! - `P` = Point load magnitude
//! - `w` = Uniform load intensity (force per unit length)

// =============================================================================
// POINT LOAD FORMULAS
// =============================================================================

/// Moment at x for a point load P at position a
///
/// ```text
///        P
///        ↓
///    ────┬────────────
///    △   a            △
///       ←───────L────→
/// ```
///
/// # Formulas (Roark's Table 8.1, Case 1a)
/// - M(x) = P(L-a)x/L           for x ≤ a
/// - M(x) = P(L-a)x/L - P(x-a)  for x > a
#[inline]
pub fn point_load_moment(p: f64, a: f64, l: f64, x: f64) -> f64 {
    let r1 = p * (l - a) / l;
    if x <= a {
        r1 * x
    } else {
        r1 * x - p * (x - a)
    }
}

/// Largest moment at x produced by a point load anywhere on the span
///
/// The governing position is the point itself: M = Px(L-x)/L.
#[inline]
pub fn moving_point_load_moment(p: f64, l: f64, x: f64) -> f64 {
    point_load_moment(p, x, l, x)
}

// =============================================================================
// UNIFORM LOAD FORMULAS
// =============================================================================

/// Moment at x for a uniform load w over the full span
///
/// # Formula (Roark's Table 8.1, Case 2a)
/// M(x) = wx(L-x)/2
#[inline]
pub fn uniform_load_moment(w: f64, l: f64, x: f64) -> f64 {
    w * x * (l - x) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON || (a - b).abs() / b.abs().max(1.0) < 0.001
    }

    #[test]
    fn test_point_load_moment_max() {
        // 100 ft span, 40 kip at midspan: PL/4 = 40 * 1200 / 4
        let m = point_load_moment(40.0, 600.0, 1200.0, 600.0);
        assert!(approx_eq(m, 12_000.0), "M = {} (expected 12000)", m);
    }

    #[test]
    fn test_point_load_moment_zero_at_supports() {
        let m0 = point_load_moment(40.0, 300.0, 1200.0, 0.0);
        let ml = point_load_moment(40.0, 300.0, 1200.0, 1200.0);
        assert!(approx_eq(m0, 0.0), "M(0) = {}", m0);
        assert!(approx_eq(ml, 0.0), "M(L) = {}", ml);
    }

    #[test]
    fn test_moving_point_load_governs() {
        let x = 300.0;
        let governing = moving_point_load_moment(40.0, 1200.0, x);
        for a in [0.0, 150.0, 450.0, 600.0, 900.0] {
            assert!(point_load_moment(40.0, a, 1200.0, x) <= governing + EPSILON);
        }
        assert!(approx_eq(governing, 40.0 * 300.0 * 900.0 / 1200.0));
    }

    #[test]
    fn test_uniform_load_midspan_moment() {
        // 0.0685 kip/in over 1200 in: wL²/8
        let m = uniform_load_moment(0.0685, 1200.0, 600.0);
        assert!(approx_eq(m, 12_330.0), "M = {}", m);
    }

    #[test]
    fn test_uniform_load_moment_symmetry() {
        let left = uniform_load_moment(0.05, 1200.0, 200.0);
        let right = uniform_load_moment(0.05, 1200.0, 1000.0);
        assert!(approx_eq(left, right));
    }
}
