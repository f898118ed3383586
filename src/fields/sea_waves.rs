//! Ocean swell: a primary directional wave plus a faster ripple, with
//! asymmetric sharpening near the crests.

use super::{FieldContext, FieldOutput};
use crate::precision::{self, ANGLE_DIGITS};
use crate::vector::VectorItem;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Normalized phase past which crests sharpen.
const CREST_START: f64 = 0.7;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeaWavesProps {
    /// Primary swing in degrees.
    pub amplitude: f64,
    /// Primary wavelength in pixels.
    pub wave_length: f64,
    /// Phase speed in radians per millisecond.
    pub speed: f64,
    /// Travel direction in degrees.
    pub direction: f64,
    /// Ripple swing in degrees.
    pub ripple_amplitude: f64,
    /// Ripple frequency as a multiple of the primary.
    pub ripple_frequency: f64,
    /// Extra swing gained near crests (0 = symmetric waves).
    pub choppiness: f64,
    /// Length factor swing driven by wave height.
    pub height_variation: f64,
}

impl Default for SeaWavesProps {
    fn default() -> Self {
        Self {
            amplitude: 40.0,
            wave_length: 220.0,
            speed: 0.002,
            direction: 0.0,
            ripple_amplitude: 8.0,
            ripple_frequency: 3.5,
            choppiness: 0.6,
            height_variation: 0.3,
        }
    }
}

pub fn update(vector: &VectorItem, props: &SeaWavesProps, ctx: &FieldContext) -> FieldOutput {
    let pos = vector.position();
    let dir = props.direction.to_radians();
    let (dx, dy) = (precision::cos(dir), precision::sin(dir));

    let k = TAU / props.wave_length.max(1.0);
    let travel = precision::round(props.speed * ctx.time, ANGLE_DIGITS);
    let along = precision::coord(pos.x * dx + pos.y * dy);
    let phase = precision::round(k * along - travel, ANGLE_DIGITS);

    let primary = precision::sin(phase);
    let ripple_phase = precision::round(phase * props.ripple_frequency + travel * 0.5, ANGLE_DIGITS);
    let ripple = precision::sin(ripple_phase);

    // Where in the cycle this vector sits, in [0, 1)
    let cycle = precision::round(phase.rem_euclid(TAU) / TAU, ANGLE_DIGITS);
    let sharpen = if cycle > CREST_START {
        let u = (cycle - CREST_START) / (1.0 - CREST_START);
        precision::round(props.choppiness * u * u, ANGLE_DIGITS)
    } else {
        0.0
    };

    let swing = precision::angle(props.amplitude * primary * (1.0 + sharpen));
    let chop = precision::angle(props.ripple_amplitude * ripple);
    let angle = precision::normalize_deg(props.direction + swing + chop);

    let height_phase = precision::round(phase * 0.5 + travel * 0.25, ANGLE_DIGITS);
    let height = precision::sin(height_phase);
    let length = precision::factor(1.0 + props.height_variation * height);
    let width = precision::factor(1.0 + props.height_variation * 0.5 * height.abs());
    let intensity = precision::factor(0.5 + 0.5 * height);

    FieldOutput::new(angle, length, width).with_intensity(intensity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::{assert_valid, vector_at};
    use crate::settings::{AnimationSettings, FieldType};

    #[test]
    fn test_output_bounded() {
        let settings = AnimationSettings::new(FieldType::SeaWaves, 800.0, 600.0);
        let props = SeaWavesProps::default();
        let limit = props.amplitude * (1.0 + props.choppiness) + props.ripple_amplitude;
        for step in 0..200 {
            let ctx = FieldContext::new(step as f64 * 33.0, &settings);
            let v = vector_at(step, (step * 13 % 800) as f64, (step * 7 % 600) as f64, 0.0);
            let out = update(&v, &props, &ctx);
            assert_valid(&out);
            let swing = crate::easing::angle_delta_deg(props.direction, out.angle).abs();
            assert!(swing <= limit + 1e-6, "swing {} over {}", swing, limit);
            assert!((0.7..=1.3).contains(&out.length_factor));
            let intensity = out.intensity.unwrap();
            assert!((0.0..=1.0).contains(&intensity));
        }
    }

    #[test]
    fn test_calm_sea_points_along_direction() {
        let settings = AnimationSettings::new(FieldType::SeaWaves, 800.0, 600.0);
        let props = SeaWavesProps {
            amplitude: 0.0,
            ripple_amplitude: 0.0,
            direction: 135.0,
            ..Default::default()
        };
        let ctx = FieldContext::new(500.0, &settings);
        let out = update(&vector_at(0, 100.0, 100.0, 0.0), &props, &ctx);
        assert_eq!(out.angle, 135.0);
    }

    #[test]
    fn test_choppiness_sharpens_crests() {
        let settings = AnimationSettings::new(FieldType::SeaWaves, 800.0, 600.0);
        let calm = SeaWavesProps {
            choppiness: 0.0,
            ripple_amplitude: 0.0,
            ..Default::default()
        };
        let choppy = SeaWavesProps {
            choppiness: 1.0,
            ..calm.clone()
        };
        // x = 0.85 wavelength puts the phase in the crest region at t = 0
        let v = vector_at(0, 0.85 * calm.wave_length, 0.0, 0.0);
        let ctx = FieldContext::new(0.0, &settings);
        let a = crate::easing::angle_delta_deg(0.0, update(&v, &calm, &ctx).angle).abs();
        let b = crate::easing::angle_delta_deg(0.0, update(&v, &choppy, &ctx).angle).abs();
        assert!(b > a);
    }
}
