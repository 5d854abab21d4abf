//! Bounded random draws used for unobservable fields.
//!
//! Callers always pass the generator in; nothing here touches a thread-local
//! or entropy-seeded RNG.

use rand::Rng;
use std::ops::RangeInclusive;

/// Uniform perturbation in `[-amplitude, amplitude]`.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, amplitude: f64) -> f64 {
    if amplitude.is_nan() || amplitude <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-amplitude..=amplitude)
}

/// Uniform draw from `range`. Inverted bounds are swapped.
pub fn draw<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<f64>) -> f64 {
    let (lo, hi) = ordered(range);
    if lo == hi {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

fn ordered(range: &RangeInclusive<f64>) -> (f64, f64) {
    let (a, b) = (*range.start(), *range.end());
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
