//! Pointer interaction: vectors inside a radius around the pointer turn
//! toward it, away from it, or around it.

use super::{FieldContext, FieldOutput, COINCIDENT};
use crate::easing::lerp_angle_deg;
use crate::precision::{self, ANGLE_DIGITS};
use crate::vector::VectorItem;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseMode {
    /// Point at the pointer.
    #[default]
    Attract,
    /// Point away from the pointer.
    Repel,
    /// Circle the pointer.
    Rotate,
}

impl MouseMode {
    /// Offset from the vector-to-pointer bearing, in degrees.
    fn offset(self) -> f64 {
        match self {
            MouseMode::Attract => 0.0,
            MouseMode::Repel => 180.0,
            MouseMode::Rotate => 90.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MouseProps {
    /// Interaction radius in pixels.
    pub radius: f64,
    pub strength: f64,
    pub mode: MouseMode,
    /// Exponent on `1 - distance / radius`.
    pub falloff_power: f64,
    pub length_boost: f64,
}

impl Default for MouseProps {
    fn default() -> Self {
        Self {
            radius: 150.0,
            strength: 1.0,
            mode: MouseMode::Attract,
            falloff_power: 2.0,
            length_boost: 0.5,
        }
    }
}

pub fn update(vector: &VectorItem, props: &MouseProps, ctx: &FieldContext) -> FieldOutput {
    let Some(pointer) = ctx.settings.mouse else {
        return FieldOutput::unchanged(vector);
    };

    let delta = pointer - vector.position();
    let distance = precision::coord(delta.length());
    if distance > props.radius {
        return FieldOutput::rest(vector);
    }
    if distance <= COINCIDENT {
        return FieldOutput::unchanged(vector);
    }

    let normalized = precision::round(1.0 - distance / props.radius, ANGLE_DIGITS);
    let intensity = precision::factor(
        (props.strength * normalized.powf(props.falloff_power)).clamp(0.0, 1.0),
    );

    let bearing = precision::atan2_deg(delta.y, delta.x);
    let target = precision::normalize_deg(bearing + props.mode.offset());
    let angle = lerp_angle_deg(vector.initial_angle, target, intensity);

    FieldOutput::new(
        angle,
        precision::factor(1.0 + props.length_boost * intensity),
        precision::factor(1.0 + 0.5 * props.length_boost * intensity),
    )
    .with_intensity(intensity)
}
