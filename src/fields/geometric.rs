//! Geometric patterns: spirals, rings, rays, checkerboard and a clamped
//! tangent sweep.

use super::{FieldContext, FieldOutput, COINCIDENT};
use crate::precision::{self, ANGLE_DIGITS};
use crate::vector::VectorItem;
use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeometricPattern {
    /// Tangent to circles, twisted with distance.
    #[default]
    Spiral,
    /// Tangent to circles around the center.
    Concentric,
    /// Pointing away from the center.
    Radial,
    /// Alternating quarter turns by grid parity.
    Grid,
    /// `tan` sweep along x, clamped near its asymptotes.
    Tangent,
}

impl GeometricPattern {
    fn uses_center(self) -> bool {
        matches!(
            self,
            GeometricPattern::Spiral | GeometricPattern::Concentric | GeometricPattern::Radial
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometricProps {
    pub pattern: GeometricPattern,
    /// Normalized pattern center.
    pub center: DVec2,
    /// Spin in degrees per millisecond.
    pub speed: f64,
    /// Spatial frequency per pixel.
    pub density: f64,
    /// Bound applied to `tan` before it becomes an angle.
    pub tangent_clamp: f64,
}

impl Default for GeometricProps {
    fn default() -> Self {
        Self {
            pattern: GeometricPattern::Spiral,
            center: DVec2::splat(0.5),
            speed: 0.02,
            density: 0.05,
            tangent_clamp: 3.0,
        }
    }
}

/// `tan(phase)` clamped to `[-limit, limit]`.
pub fn clamped_tan(phase: f64, limit: f64) -> f64 {
    let limit = limit.abs().max(COINCIDENT);
    let raw = phase.tan();
    if !raw.is_finite() {
        return limit.copysign(raw);
    }
    precision::round(raw.clamp(-limit, limit), ANGLE_DIGITS)
}

pub fn update(vector: &VectorItem, props: &GeometricProps, ctx: &FieldContext) -> FieldOutput {
    let pos = vector.position();
    let spin = precision::angle(props.speed * ctx.time);
    let spin_rad = precision::round(spin.to_radians(), ANGLE_DIGITS);

    if props.pattern.uses_center() {
        let delta = pos - ctx.denormalize(props.center);
        let distance = precision::coord(delta.length());
        if distance <= COINCIDENT {
            return FieldOutput::unchanged(vector);
        }
        let radial = precision::atan2_deg(delta.y, delta.x);
        let ring = precision::round(distance * props.density, ANGLE_DIGITS);
        let angle = match props.pattern {
            GeometricPattern::Spiral => radial + 90.0 + precision::angle(ring.to_degrees() * 0.1) + spin,
            GeometricPattern::Concentric => radial + 90.0 + spin,
            _ => radial + spin,
        };
        let length = precision::factor(1.0 + 0.2 * precision::sin(ring - spin_rad));
        return FieldOutput::new(precision::normalize_deg(angle), length, 1.0);
    }

    match props.pattern {
        GeometricPattern::Grid => {
            let turn = if (vector.r % 2) ^ (vector.c % 2) == 0 { 0.0 } else { 90.0 };
            FieldOutput::new(precision::normalize_deg(vector.initial_angle + turn + spin), 1.0, 1.0)
        }
        _ => {
            let limit = props.tangent_clamp.abs().max(COINCIDENT);
            let phase = precision::round(pos.x * props.density + spin_rad, ANGLE_DIGITS);
            let raw = clamped_tan(phase, limit);
            let swing = precision::angle(raw / limit * 90.0);
            FieldOutput::new(
                precision::normalize_deg(vector.initial_angle + swing),
                precision::factor(1.0 + 0.25 * raw.abs() / limit),
                1.0,
            )
        }
    }
}
