//! Harmonic motion traced by two independent sinusoids.

use super::{FieldContext, FieldOutput, COINCIDENT};
use crate::precision::{self, ANGLE_DIGITS};
use crate::vector::VectorItem;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LissajousProps {
    pub freq_x: f64,
    pub freq_y: f64,
    pub amp_x: f64,
    pub amp_y: f64,
    /// Phase of the x component relative to y, in degrees.
    pub phase: f64,
    /// Parameter advance per millisecond.
    pub speed: f64,
    /// Parameter offset per pixel of `x + y`, so neighbors trail each other.
    pub spatial_offset: f64,
}

impl Default for LissajousProps {
    fn default() -> Self {
        Self {
            freq_x: 3.0,
            freq_y: 2.0,
            amp_x: 1.0,
            amp_y: 1.0,
            phase: 90.0,
            speed: 0.001,
            spatial_offset: 0.004,
        }
    }
}

pub fn update(vector: &VectorItem, props: &LissajousProps, ctx: &FieldContext) -> FieldOutput {
    let max = precision::round(props.amp_x.hypot(props.amp_y), ANGLE_DIGITS);
    if max <= COINCIDENT {
        return FieldOutput::unchanged(vector);
    }

    let pos = vector.position();
    let tau = precision::round(
        ctx.time * props.speed + (pos.x + pos.y) * props.spatial_offset,
        ANGLE_DIGITS,
    );
    let phase = props.phase.to_radians();
    let lx = precision::round(
        props.amp_x * precision::sin(precision::round(props.freq_x * tau + phase, ANGLE_DIGITS)),
        ANGLE_DIGITS,
    );
    let ly = precision::round(
        props.amp_y * precision::sin(precision::round(props.freq_y * tau, ANGLE_DIGITS)),
        ANGLE_DIGITS,
    );
    let magnitude = precision::round(lx.hypot(ly), ANGLE_DIGITS);
    if magnitude <= COINCIDENT {
        return FieldOutput::unchanged(vector);
    }

    let angle = precision::normalize_deg(precision::atan2_deg(ly, lx));
    let length = precision::factor(0.75 + 0.5 * magnitude / max);
    FieldOutput::new(angle, length, 1.0)
}
