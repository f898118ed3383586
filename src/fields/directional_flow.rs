//! Uniform flow in one direction, roughened by deterministic turbulence.

use super::{FieldContext, FieldOutput};
use crate::noise;
use crate::precision::{self, ANGLE_DIGITS};
use crate::vector::VectorItem;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectionalFlowProps {
    /// Flow heading in degrees.
    pub angle: f64,
    /// Maximum deviation from the heading in degrees.
    pub turbulence: f64,
    /// Turbulence spatial frequency per pixel.
    pub turbulence_scale: f64,
    /// Turbulence drift per millisecond.
    pub speed: f64,
    pub length_variation: f64,
}

impl Default for DirectionalFlowProps {
    fn default() -> Self {
        Self {
            angle: 45.0,
            turbulence: 20.0,
            turbulence_scale: 0.01,
            speed: 0.001,
            length_variation: 0.15,
        }
    }
}

pub fn update(vector: &VectorItem, props: &DirectionalFlowProps, ctx: &FieldContext) -> FieldOutput {
    let pos = vector.position();
    let sx = precision::round(pos.x * props.turbulence_scale, ANGLE_DIGITS);
    let sy = precision::round(pos.y * props.turbulence_scale, ANGLE_DIGITS);
    let drift = precision::round(ctx.time * props.speed, ANGLE_DIGITS);

    let n = precision::round(noise::trig_noise(sx, sy, drift), ANGLE_DIGITS);
    let offset = precision::angle(props.turbulence * n);
    let angle = precision::normalize_deg(props.angle + offset);

    let wobble = precision::sin(precision::round(sx * 0.5 + drift, ANGLE_DIGITS));
    let length = precision::factor(1.0 + props.length_variation * wobble);

    FieldOutput::new(angle, length, 1.0)
}
