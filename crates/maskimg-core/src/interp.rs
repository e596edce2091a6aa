//! Piecewise-linear interpolation over sampled knots.
//!
//! Used for palette expansion (fractional palette indices blend adjacent
//! entries) and histogram equalization (values mapped through a cumulative
//! distribution).
//!
//! ```rust
//! use maskimg_core::interp::interp;
//!
//! let xp = [0.0, 1.0, 2.0];
//! let fp = [0.0, 10.0, 40.0];
//! assert_eq!(interp(0.5, &xp, &fp), 5.0);
//! assert_eq!(interp(1.5, &xp, &fp), 25.0);
//! // Clamped at both ends
//! assert_eq!(interp(-3.0, &xp, &fp), 0.0);
//! assert_eq!(interp(9.0, &xp, &fp), 40.0);
//! ```

/// Linearly interpolates `x` against knots `xp` (increasing) with values `fp`.
///
/// Values left of the first knot take `fp[0]`, values right of (or at) the
/// last knot take the last value. Repeated knots resolve to the rightmost
/// segment. A NaN input yields NaN; empty knots yield NaN.
///
/// # Panics
///
/// Panics in debug builds if `xp` and `fp` differ in length.
pub fn interp(x: f32, xp: &[f32], fp: &[f32]) -> f32 {
    debug_assert_eq!(xp.len(), fp.len(), "knot/value length mismatch");
    let n = xp.len();
    if n == 0 || x.is_nan() {
        return f32::NAN;
    }
    let j = xp.partition_point(|&k| k <= x);
    if j == 0 {
        return fp[0];
    }
    if j == n {
        return fp[n - 1];
    }
    let i = j - 1;
    let t = (x - xp[i]) / (xp[j] - xp[i]);
    fp[i] + (fp[j] - fp[i]) * t
}

/// Interpolates against unit-spaced knots `0, 1, ..., fp.len() - 1`.
///
/// Equivalent to [`interp`] with `xp = [0, 1, 2, ...]` without building the
/// knot array.
pub fn interp_uniform(x: f32, fp: &[f32]) -> f32 {
    let n = fp.len();
    if n == 0 || x.is_nan() {
        return f32::NAN;
    }
    let last = (n - 1) as f32;
    if x <= 0.0 {
        return fp[0];
    }
    if x >= last {
        return fp[n - 1];
    }
    let i = x.floor() as usize;
    let t = x - i as f32;
    if t == 0.0 {
        return fp[i];
    }
    fp[i] + (fp[i + 1] - fp[i]) * t
}
