//! Fixed-decimal rounding for animation state.
//!
//! Every field function rounds its intermediate values through [`round`]
//! before they feed the next expression. Chained trig and accumulation then
//! stay on a fixed decimal grid, so evaluating the same inputs twice gives
//! bit-identical output and small floating-point noise never shows up as
//! jitter on screen.
//!
//! # Digit budgets
//!
//! | Quantity | Digits |
//! |----------|--------|
//! | Angles | [`ANGLE_DIGITS`] (6) |
//! | Length/width/intensity factors | [`FACTOR_DIGITS`] (4) |
//! | Coarse spatial coordinates | [`COORD_DIGITS`] (2) |
//!
//! # Example
//!
//! ```
//! use vecflow::precision::{round, round_or};
//!
//! assert_eq!(round(1.23456789, 4), 1.2346);
//! assert_eq!(round_or(f64::NAN, 4, 1.0), 1.0);
//! ```

/// Digits kept for angles (degrees or radians).
pub const ANGLE_DIGITS: u32 = 6;

/// Digits kept for length, width and intensity factors.
pub const FACTOR_DIGITS: u32 = 4;

/// Digits kept for pixel coordinates and distances.
pub const COORD_DIGITS: u32 = 2;

/// Lower bound for length and width factors returned by a field.
pub const MIN_FACTOR: f64 = 0.5;

/// Upper bound for length and width factors returned by a field.
pub const MAX_FACTOR: f64 = 2.0;

/// Powers of ten up to 10^15, indexed by digit count.
const POW10: [f64; 16] = [
    1.0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
];

/// Round `value` to `digits` decimal digits.
///
/// Non-finite input (NaN, ±infinity) becomes `0.0`. Use [`round_or`] to pick
/// a different fallback. Digit counts above 15 are treated as 15.
#[inline]
pub fn round(value: f64, digits: u32) -> f64 {
    round_or(value, digits, 0.0)
}

/// Round `value` to `digits` decimal digits, substituting `default` for
/// non-finite input.
#[inline]
pub fn round_or(value: f64, digits: u32, default: f64) -> f64 {
    if !value.is_finite() {
        return default;
    }
    let scale = POW10[digits.min(15) as usize];
    let scaled = value * scale;
    // Beyond 2^52 every f64 is already an integer at this scale
    if !scaled.is_finite() || scaled.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }
    let rounded = scaled.round() / scale;
    // Normalize -0.0 so equal states compare and hash identically
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round an angle with the angle digit budget.
#[inline]
pub fn angle(value: f64) -> f64 {
    round(value, ANGLE_DIGITS)
}

/// Round a length/width/intensity factor with the factor digit budget.
#[inline]
pub fn factor(value: f64) -> f64 {
    round(value, FACTOR_DIGITS)
}

/// Round a pixel coordinate or distance with the coordinate digit budget.
#[inline]
pub fn coord(value: f64) -> f64 {
    round(value, COORD_DIGITS)
}

/// Clamp a factor into `[MIN_FACTOR, MAX_FACTOR]` and round it.
///
/// Non-finite input becomes the neutral factor `1.0`.
#[inline]
pub fn clamp_factor(value: f64) -> f64 {
    if !value.is_finite() {
        return 1.0;
    }
    factor(value.clamp(MIN_FACTOR, MAX_FACTOR))
}

/// Rounded sine of an angle given in radians.
#[inline]
pub fn sin(radians: f64) -> f64 {
    round(radians.sin(), ANGLE_DIGITS)
}

/// Rounded cosine of an angle given in radians.
#[inline]
pub fn cos(radians: f64) -> f64 {
    round(radians.cos(), ANGLE_DIGITS)
}

/// Rounded `atan2`, returned in degrees.
#[inline]
pub fn atan2_deg(y: f64, x: f64) -> f64 {
    round(y.atan2(x).to_degrees(), ANGLE_DIGITS)
}

/// Wrap an angle in degrees into `[0, 360)` and round it.
pub fn normalize_deg(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = round(degrees.rem_euclid(360.0), ANGLE_DIGITS);
    // Rounding can push 359.9999999 up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle in radians into `[0, 2π)` and round it.
pub fn normalize_rad(radians: f64) -> f64 {
    use std::f64::consts::TAU;
    if !radians.is_finite() {
        return 0.0;
    }
    let wrapped = round(radians.rem_euclid(TAU), ANGLE_DIGITS);
    if wrapped >= round(TAU, ANGLE_DIGITS) {
        0.0
    } else {
        wrapped
    }
}
