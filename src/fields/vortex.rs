//! Swirl around a center point.
//!
//! Vectors near the center turn fully tangential; influence decays with
//! distance, either as a power law or exponentially, and far vectors
//! relax toward their initial angle.

use super::{FieldContext, FieldOutput, COINCIDENT};
use crate::easing::lerp_angle_deg;
use crate::precision::{self, ANGLE_DIGITS};
use crate::vector::VectorItem;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// How influence decays with distance from the center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VortexFalloff {
    /// `strength / distance^(radius_falloff / 10)`
    #[default]
    PowerLaw,
    /// `(strength / 100) * exp(-distance / decay_radius)`
    Exponential,
}

/// Which way the swirl turns (y-down canvas).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwirlDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl SwirlDirection {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            SwirlDirection::Clockwise => 1.0,
            SwirlDirection::CounterClockwise => -1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VortexProps {
    /// Normalized vortex center.
    pub center: DVec2,
    pub strength: f64,
    /// Power-law exponent times ten.
    pub radius_falloff: f64,
    pub falloff: VortexFalloff,
    /// Exponential decay length in pixels.
    pub decay_radius: f64,
    pub swirl: SwirlDirection,
    /// Extra spin in degrees per millisecond at full influence.
    pub rotation_speed: f64,
}

impl Default for VortexProps {
    fn default() -> Self {
        Self {
            center: DVec2::splat(0.5),
            strength: 120.0,
            radius_falloff: 10.0,
            falloff: VortexFalloff::PowerLaw,
            decay_radius: 200.0,
            swirl: SwirlDirection::Clockwise,
            rotation_speed: 0.02,
        }
    }
}

/// Influence in `[0, 1]` at `distance` pixels from the center.
pub fn influence(props: &VortexProps, distance: f64) -> f64 {
    let raw = match props.falloff {
        VortexFalloff::PowerLaw => {
            let exponent = precision::round(props.radius_falloff / 10.0, ANGLE_DIGITS);
            let denom = precision::round(distance.powf(exponent), ANGLE_DIGITS);
            if denom <= 0.0 {
                return 1.0;
            }
            props.strength / denom
        }
        VortexFalloff::Exponential => {
            let decay = props.decay_radius.max(1.0);
            let e = precision::round((-distance / decay).exp(), ANGLE_DIGITS);
            props.strength / 100.0 * e
        }
    };
    precision::factor(precision::round(raw, ANGLE_DIGITS).clamp(0.0, 1.0))
}

pub fn update(vector: &VectorItem, props: &VortexProps, ctx: &FieldContext) -> FieldOutput {
    let center = ctx.denormalize(props.center);
    let delta = vector.position() - center;
    let distance = precision::coord(delta.length());
    if distance <= COINCIDENT {
        return FieldOutput::unchanged(vector);
    }

    let sign = props.swirl.sign();
    let radial = precision::atan2_deg(delta.y, delta.x);
    let tangent = precision::normalize_deg(radial + 90.0 * sign);
    let infl = influence(props, distance);

    let swirled = lerp_angle_deg(vector.initial_angle, tangent, infl);
    let spin = precision::angle(props.rotation_speed * ctx.time * infl * sign);
    let angle = precision::normalize_deg(swirled + spin);

    FieldOutput::new(
        angle,
        precision::factor(1.0 + 0.5 * infl),
        precision::factor(1.0 + 0.25 * infl),
    )
    .with_intensity(infl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::{assert_valid, vector_at};
    use crate::settings::{AnimationSettings, FieldType};

    fn settings() -> AnimationSettings {
        AnimationSettings::new(FieldType::Vortex, 800.0, 600.0)
    }

    #[test]
    fn test_center_keeps_current_angle() {
        let settings = settings();
        let ctx = FieldContext::new(100.0, &settings);
        let mut v = vector_at(0, 400.0, 300.0, 10.0);
        v.current_angle = 77.0;
        let out = update(&v, &VortexProps::default(), &ctx);
        assert_eq!(out.angle, 77.0);
        assert_valid(&out);
    }

    #[test]
    fn test_near_center_is_tangential() {
        let settings = settings();
        let ctx = FieldContext::new(0.0, &settings);
        // Directly right of center: radial 0°, clockwise tangent 90°
        let v = vector_at(0, 450.0, 300.0, 0.0);
        let out = update(&v, &VortexProps::default(), &ctx);
        assert_eq!(out.angle, 90.0);
        assert_eq!(out.intensity, Some(1.0));

        let ccw = VortexProps {
            swirl: SwirlDirection::CounterClockwise,
            ..Default::default()
        };
        assert_eq!(update(&v, &ccw, &ctx).angle, 270.0);
    }

    #[test]
    fn test_influence_decays() {
        let props = VortexProps::default();
        assert_eq!(influence(&props, 60.0), 1.0);
        assert_eq!(influence(&props, 240.0), 0.5);
        assert!(influence(&props, 480.0) < influence(&props, 240.0));

        let exp = VortexProps {
            falloff: VortexFalloff::Exponential,
            strength: 100.0,
            ..Default::default()
        };
        assert!((influence(&exp, 200.0) - (-1.0f64).exp()).abs() < 1e-4);
        assert!(influence(&exp, 0.0) <= 1.0);
    }

    #[test]
    fn test_output_always_finite() {
        let settings = settings();
        for falloff in [VortexFalloff::PowerLaw, VortexFalloff::Exponential] {
            let props = VortexProps { falloff, ..Default::default() };
            for i in 0..100u32 {
                let ctx = FieldContext::new(i as f64 * 100.0, &settings);
                let v = vector_at(i, (i * 8) as f64, (i * 6) as f64, 30.0);
                assert_valid(&update(&v, &props, &ctx));
            }
        }
    }
}
