//! Smooth sinusoidal waves sweeping across the grid.

use super::{FieldContext, FieldOutput};
use crate::precision::{self, ANGLE_DIGITS};
use crate::vector::VectorItem;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, TAU};

/// Spatial profile of the wave phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WavePattern {
    /// Phase advances along x.
    #[default]
    Linear,
    /// Phase advances along the x = y diagonal.
    Diagonal,
    /// Phase advances with distance from `center`.
    Circular,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmoothWavesProps {
    /// Peak angular swing in degrees.
    pub amplitude: f64,
    /// Temporal frequency in cycles per millisecond.
    pub frequency: f64,
    /// Spatial phase per pixel (radians/px).
    pub spatial_scale: f64,
    pub pattern: WavePattern,
    /// Normalized center for the circular profile.
    pub center: DVec2,
    /// Length factor swing around 1.
    pub length_amplitude: f64,
    /// Width factor swing around 1.
    pub width_amplitude: f64,
}

impl Default for SmoothWavesProps {
    fn default() -> Self {
        Self {
            amplitude: 30.0,
            frequency: 0.001,
            spatial_scale: 0.01,
            pattern: WavePattern::Linear,
            center: DVec2::splat(0.5),
            length_amplitude: 0.2,
            width_amplitude: 0.0,
        }
    }
}

pub fn update(vector: &VectorItem, props: &SmoothWavesProps, ctx: &FieldContext) -> FieldOutput {
    let pos = vector.position();
    let spatial = match props.pattern {
        WavePattern::Linear => pos.x * props.spatial_scale,
        WavePattern::Diagonal => (pos.x + pos.y) * FRAC_1_SQRT_2 * props.spatial_scale,
        WavePattern::Circular => {
            let center = ctx.denormalize(props.center);
            precision::coord(pos.distance(center)) * props.spatial_scale
        }
    };
    let spatial = precision::round(spatial, ANGLE_DIGITS);
    let temporal = precision::round(TAU * props.frequency * ctx.time, ANGLE_DIGITS);
    let phase = precision::round(spatial - temporal, ANGLE_DIGITS);

    let s = precision::sin(phase);
    let c = precision::cos(phase);

    let swing = precision::angle(props.amplitude * s);
    let angle = precision::normalize_deg(vector.initial_angle + swing);
    let length = precision::factor(1.0 + props.length_amplitude * c);
    let width = precision::factor(1.0 + props.width_amplitude * s);

    FieldOutput::new(angle, length, width)
}
