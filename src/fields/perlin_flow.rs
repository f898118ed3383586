//! Noise-driven flow field.
//!
//! Two decorrelated noise samples at the vector's scaled position form a
//! flow direction. `Trig` is the cheap product-of-sines noise; `Gradient`
//! is hashed-lattice gradient noise layered into fBm.

use super::{FieldContext, FieldOutput, COINCIDENT};
use crate::noise;
use crate::precision::{self, ANGLE_DIGITS};
use crate::vector::VectorItem;
use serde::{Deserialize, Serialize};

/// Offset of the second sample, chosen off-lattice to decorrelate it.
const SECOND_SAMPLE: (f64, f64) = (31.7, 47.3);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoiseKind {
    #[default]
    Trig,
    Gradient,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerlinFlowProps {
    /// Noise frequency per pixel.
    pub scale: f64,
    /// Noise drift per millisecond.
    pub speed: f64,
    /// fBm layers for gradient noise.
    pub octaves: u32,
    pub noise: NoiseKind,
    pub seed: u32,
}

impl Default for PerlinFlowProps {
    fn default() -> Self {
        Self {
            scale: 0.005,
            speed: 0.0003,
            octaves: 2,
            noise: NoiseKind::Trig,
            seed: 0,
        }
    }
}

fn sample(props: &PerlinFlowProps, x: f64, y: f64, z: f64) -> f64 {
    let n = match props.noise {
        NoiseKind::Trig => noise::trig_noise(x, y, z),
        NoiseKind::Gradient => noise::fbm3(x, y, z, props.octaves, props.seed),
    };
    precision::round(n, ANGLE_DIGITS)
}

pub fn update(vector: &VectorItem, props: &PerlinFlowProps, ctx: &FieldContext) -> FieldOutput {
    let pos = vector.position();
    let x = precision::round(pos.x * props.scale, ANGLE_DIGITS);
    let y = precision::round(pos.y * props.scale, ANGLE_DIGITS);
    let z = precision::round(ctx.time * props.speed, ANGLE_DIGITS);

    let n1 = sample(props, x, y, z);
    let n2 = sample(props, x + SECOND_SAMPLE.0, y + SECOND_SAMPLE.1, z);
    if n1.abs() <= COINCIDENT && n2.abs() <= COINCIDENT {
        return FieldOutput::unchanged(vector);
    }

    let angle = precision::normalize_deg(precision::atan2_deg(n2, n1));
    let length = precision::factor(1.0 + 0.3 * n1);
    FieldOutput::new(angle, length, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::{assert_valid, vector_at};
    use crate::settings::{AnimationSettings, FieldType};

    #[test]
    fn test_both_noise_kinds_in_range() {
        let settings = AnimationSettings::new(FieldType::PerlinFlow, 800.0, 600.0);
        for noise in [NoiseKind::Trig, NoiseKind::Gradient] {
            let props = PerlinFlowProps {
                noise,
                octaves: 3,
                seed: 11,
                ..Default::default()
            };
            for i in 0..200u32 {
                let ctx = FieldContext::new(i as f64 * 50.0, &settings);
                let v = vector_at(i, (i * 17 % 800) as f64 + 0.5, (i * 29 % 600) as f64 + 0.5, 0.0);
                let out = update(&v, &props, &ctx);
                assert_valid(&out);
                assert!((0.7..=1.3).contains(&out.length_factor));
            }
        }
    }

    #[test]
    fn test_seed_changes_gradient_field() {
        let settings = AnimationSettings::new(FieldType::PerlinFlow, 800.0, 600.0);
        let ctx = FieldContext::new(1000.0, &settings);
        let a = PerlinFlowProps {
            noise: NoiseKind::Gradient,
            ..Default::default()
        };
        let b = PerlinFlowProps { seed: 99, ..a.clone() };
        let differs = (0..20u32).any(|i| {
            let v = vector_at(i, 37.0 + i as f64 * 41.0, 53.0 + i as f64 * 13.0, 0.0);
            update(&v, &a, &ctx).angle != update(&v, &b, &ctx).angle
        });
        assert!(differs);
    }
}
