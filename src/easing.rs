//! Interpolation and easing primitives.
//!
//! - [`lerp`] - plain linear interpolation (the caller clamps `t` if needed)
//! - [`lerp_angle`] / [`lerp_angle_deg`] - shortest-path circular interpolation
//! - [`lerp_color`] - per-channel RGB interpolation of 24-bit hex colors
//! - [`Easing`] - quadratic, cubic, sinusoidal and elastic curves that reshape
//!   a linear progress fraction before it is fed to the interpolators
//!
//! # Example
//!
//! ```
//! use vecflow::easing::{lerp_angle_deg, Easing};
//!
//! let t = Easing::InOutQuad.apply(0.5);
//! assert_eq!(t, 0.5);
//!
//! // 350° -> 10° goes through 0°, not 180°
//! assert_eq!(lerp_angle_deg(350.0, 10.0, 0.5), 0.0);
//! ```

use crate::error::ColorError;
use crate::precision;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Linear interpolation between `a` and `b`.
///
/// `t` is not clamped; values outside `[0, 1]` extrapolate.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate between two angles in radians along the shortest arc.
///
/// Both inputs are wrapped into `[0, 2π)` first and the result is wrapped
/// back into that range.
pub fn lerp_angle(a: f64, b: f64, t: f64) -> f64 {
    let a = precision::normalize_rad(a);
    let b = precision::normalize_rad(b);
    let mut delta = b - a;
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    precision::normalize_rad(a + delta * t)
}

/// Interpolate between two angles in degrees along the shortest arc.
///
/// Both inputs are wrapped into `[0, 360)` first and the result is wrapped
/// back into that range.
pub fn lerp_angle_deg(a: f64, b: f64, t: f64) -> f64 {
    let a = precision::normalize_deg(a);
    let b = precision::normalize_deg(b);
    let mut delta = b - a;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    precision::normalize_deg(a + delta * t)
}

/// Signed shortest difference `b - a` between two angles in degrees, in `(-180, 180]`.
pub fn angle_delta_deg(a: f64, b: f64) -> f64 {
    let mut delta = (b - a).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    precision::angle(delta)
}

/// Parse a 24-bit hex color (`#rrggbb`, `rrggbb`, `#rgb` or `rgb`).
pub fn parse_hex(hex: &str) -> Result<[u8; 3], ColorError> {
    let invalid = || ColorError::InvalidHex(hex.to_string());
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    match digits.len() {
        6 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
            Ok([channel(0)?, channel(2)?, channel(4)?])
        }
        3 => {
            let channel = |i: usize| {
                u8::from_str_radix(&digits[i..i + 1], 16)
                    .map(|v| v * 17)
                    .map_err(|_| invalid())
            };
            Ok([channel(0)?, channel(1)?, channel(2)?])
        }
        _ => Err(invalid()),
    }
}

/// Format an RGB triple as `#rrggbb`.
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Interpolate two hex colors channel by channel.
///
/// Returns an error when either input is not a valid hex color. Channels are
/// rounded and clamped to `0..=255`, so `t` outside `[0, 1]` saturates.
pub fn lerp_color(hex_a: &str, hex_b: &str, t: f64) -> Result<String, ColorError> {
    let a = parse_hex(hex_a)?;
    let b = parse_hex(hex_b)?;
    let mut out = [0u8; 3];
    for i in 0..3 {
        let value = lerp(a[i] as f64, b[i] as f64, t).round();
        out[i] = value.clamp(0.0, 255.0) as u8;
    }
    Ok(to_hex(out))
}

/// Easing curves mapping `[0, 1]` progress to `[0, 1]`.
///
/// Elastic curves intentionally overshoot outside `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// No reshaping.
    Linear,
    /// Accelerate from zero velocity.
    InQuad,
    /// Decelerate to zero velocity.
    OutQuad,
    /// Accelerate until halfway, then decelerate.
    #[default]
    InOutQuad,
    /// Cubic acceleration.
    InCubic,
    /// Cubic deceleration.
    OutCubic,
    /// Cubic in-out.
    InOutCubic,
    /// Sinusoidal acceleration.
    InSine,
    /// Sinusoidal deceleration.
    OutSine,
    /// Sinusoidal in-out.
    InOutSine,
    /// Spring wind-up before the move.
    InElastic,
    /// Spring overshoot after the move.
    OutElastic,
    /// Spring at both ends.
    InOutElastic,
}

impl Easing {
    /// Apply this curve to a progress fraction.
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::InQuad => ease_in_quad(t),
            Easing::OutQuad => ease_out_quad(t),
            Easing::InOutQuad => ease_in_out_quad(t),
            Easing::InCubic => ease_in_cubic(t),
            Easing::OutCubic => ease_out_cubic(t),
            Easing::InOutCubic => ease_in_out_cubic(t),
            Easing::InSine => ease_in_sine(t),
            Easing::OutSine => ease_out_sine(t),
            Easing::InOutSine => ease_in_out_sine(t),
            Easing::InElastic => ease_in_elastic(t),
            Easing::OutElastic => ease_out_elastic(t),
            Easing::InOutElastic => ease_in_out_elastic(t),
        }
    }
}

pub fn ease_in_quad(t: f64) -> f64 {
    t * t
}

pub fn ease_out_quad(t: f64) -> f64 {
    t * (2.0 - t)
}

pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

pub fn ease_in_cubic(t: f64) -> f64 {
    t * t * t
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let u = t - 1.0;
    u * u * u + 1.0
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

pub fn ease_in_sine(t: f64) -> f64 {
    1.0 - (t * PI / 2.0).cos()
}

pub fn ease_out_sine(t: f64) -> f64 {
    (t * PI / 2.0).sin()
}

pub fn ease_in_out_sine(t: f64) -> f64 {
    -((PI * t).cos() - 1.0) / 2.0
}

pub fn ease_in_elastic(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c4 = TAU / 3.0;
    -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * c4).sin()
}

pub fn ease_out_elastic(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c4 = TAU / 3.0;
    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
}

pub fn ease_in_out_elastic(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c5 = TAU / 4.5;
    if t < 0.5 {
        -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
    } else {
        2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin() / 2.0 + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_lerp_extrapolates() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 1.5), 15.0);
    }

    #[test]
    fn test_lerp_angle_wraparound_radians() {
        let a = 350f64.to_radians();
        let b = 10f64.to_radians();
        assert_eq!(lerp_angle(a, b, 0.5), 0.0);
    }

    #[test]
    fn test_lerp_angle_wraparound_degrees() {
        assert_eq!(lerp_angle_deg(350.0, 10.0, 0.5), 0.0);
        assert_eq!(lerp_angle_deg(10.0, 350.0, 0.5), 0.0);
        assert_eq!(lerp_angle_deg(-10.0, 30.0, 0.5), 10.0);
    }

    #[test]
    fn test_lerp_angle_endpoints() {
        assert_eq!(lerp_angle_deg(90.0, 180.0, 0.0), 90.0);
        assert_eq!(lerp_angle_deg(90.0, 180.0, 1.0), 180.0);
    }

    #[test]
    fn test_angle_delta() {
        assert_eq!(angle_delta_deg(350.0, 10.0), 20.0);
        assert_eq!(angle_delta_deg(10.0, 350.0), -20.0);
    }

    #[test]
    fn test_lerp_color() {
        assert_eq!(lerp_color("#000000", "#ffffff", 0.5).unwrap(), "#808080");
        assert_eq!(lerp_color("#ff0000", "#0000ff", 0.0).unwrap(), "#ff0000");
        assert_eq!(lerp_color("#f00", "#00f", 1.0).unwrap(), "#0000ff");
    }

    #[test]
    fn test_lerp_color_rejects_malformed() {
        assert!(matches!(
            lerp_color("#12345", "#ffffff", 0.5),
            Err(ColorError::InvalidHex(_))
        ));
        assert!(lerp_color("#ffffff", "#gg0000", 0.5).is_err());
        assert!(lerp_color("", "#ffffff", 0.5).is_err());
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::InQuad,
            Easing::OutQuad,
            Easing::InOutQuad,
            Easing::InCubic,
            Easing::OutCubic,
            Easing::InOutCubic,
            Easing::InSine,
            Easing::OutSine,
            Easing::InOutSine,
            Easing::InElastic,
            Easing::OutElastic,
            Easing::InOutElastic,
        ] {
            assert!(approx(easing.apply(0.0), 0.0), "{:?} at 0", easing);
            assert!(approx(easing.apply(1.0), 1.0), "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_in_out_symmetry() {
        assert!(approx(ease_in_out_quad(0.5), 0.5));
        assert!(approx(ease_in_out_cubic(0.5), 0.5));
        assert!(approx(ease_in_out_sine(0.5), 0.5));
    }

    #[test]
    fn test_out_elastic_overshoots() {
        let overshoot = (1..100)
            .map(|i| ease_out_elastic(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(overshoot > 1.0);
    }
}
