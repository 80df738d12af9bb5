//! # Boundary handling
//!
//! Operators that keep candidate solutions inside the search space, plus
//! uniform sampling within it.
//!
//! [`toro`] is the repair used by every optimiser in this crate. It wraps an
//! out-of-range coordinate around the interval instead of clamping it:
//!
//! ```rust
//! use sosbench::boundary::toro;
//! use sosbench::problem::Bounds;
//!
//! let bounds = Bounds::uniform(0.0, 10.0);
//! let repaired = toro(&[12.5, -2.5, 4.0], &bounds);
//! assert!((repaired[0] - 2.5).abs() < 1e-12);
//! assert!((repaired[1] - 7.5).abs() < 1e-12);
//! assert_eq!(repaired[2], 4.0);
//! ```

use crate::problem::Bounds;
use crate::rng::RandomSource;

/// Toroidal correction of `x` within `bounds`.
///
/// Each coordinate is normalised to `u = (x - low) / (high - low)`. When
/// `u > 1` the integer part is removed (`u - trunc(u)`), when `u < 0` it is
/// reflected as `1 - |u - trunc(u)|`; the result is then rescaled to
/// `[low, high]`. `trunc` rounds toward zero, never toward negative infinity.
///
/// Coordinates already inside their interval are returned untouched, so the
/// operator is idempotent. Coordinates beyond the last declared per-dimension
/// interval have no bounds and are passed through as well.
pub fn toro(x: &[f64], bounds: &Bounds) -> Vec<f64> {
    x.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let Some((low, high)) = bounds.get(i) else {
                return xi;
            };
            if low <= xi && xi <= high {
                return xi;
            }

            let width = high - low;
            let mut u = (xi - low) / width;
            if u > 1.0 {
                u -= u.trunc();
            } else if u < 0.0 {
                u = 1.0 - (u - u.trunc()).abs();
            }

            // a few ulps outside the box normalise to exactly 0 or 1; rescaling
            // can also round a hair past either end
            (u * width + low).clamp(low, high)
        })
        .collect()
}

/// Saturation on the bounds of the search space.
///
/// Like [`toro`], coordinates without a declared interval pass through.
pub fn saturate(x: &[f64], bounds: &Bounds) -> Vec<f64> {
    x.iter()
        .enumerate()
        .map(|(i, &xi)| match bounds.get(i) {
            Some((low, high)) => xi.max(low).min(high),
            None => xi,
        })
        .collect()
}

/// Draws a point uniformly at random inside `bounds`.
///
/// # Panics
///
/// Panics if per-dimension bounds declare fewer than `dimension` intervals;
/// [`Bounds::validate`] rules this out for any problem an optimiser accepts.
pub fn random_solution(bounds: &Bounds, dimension: usize, rng: &mut dyn RandomSource) -> Vec<f64> {
    (0..dimension)
        .map(|i| {
            let (low, high) = bounds.interval(i);
            low + (high - low) * rng.uniform()
        })
        .collect()
}
