//! Procedural motion fields.
//!
//! Each field is a pure function of one vector's state, the frame time and
//! the field's property record. It returns a [`FieldOutput`] with the new
//! angle, length/width factors, optional intensity and optional scratch state.
//!
//! # Field Catalogue
//!
//! | Field | Module | Motion |
//! |-------|--------|--------|
//! | Smooth waves | [`smooth_waves`] | sinusoidal sweep, linear/diagonal/circular profile |
//! | Sea waves | [`sea_waves`] | directional swell + ripples with choppy crests |
//! | Directional flow | [`directional_flow`] | fixed heading with bounded turbulence |
//! | Vortex | [`vortex`] | tangential swirl around a center |
//! | Lissajous | [`lissajous`] | harmonic motion from two sinusoids |
//! | Perlin flow | [`perlin_flow`] | noise-driven flow field |
//! | Random loop | [`random_loop`] | hold, then ease to a new random heading |
//! | Mouse | [`mouse`] | attract/repel/rotate around the pointer |
//! | Geometric | [`geometric`] | spiral, concentric, radial, grid, tangent patterns |
//!
//! Center pulse and flocking need state that outlives a single vector and
//! live in [`crate::pulse`] and [`crate::flocking`].
//!
//! # Shared Edge Cases
//!
//! - Coincident points (zero distance to a center) return the vector's
//!   current angle unchanged.
//! - Every trig/exponential intermediate goes through [`crate::precision`].
//! - Missing scratch state means "first frame under this field".

pub mod directional_flow;
pub mod geometric;
pub mod lissajous;
pub mod mouse;
pub mod perlin_flow;
pub mod random_loop;
pub mod sea_waves;
pub mod smooth_waves;
pub mod vortex;

use crate::settings::AnimationSettings;
use crate::vector::{AnimationState, VectorItem};
use glam::DVec2;

/// Distances at or below this are treated as coincident points.
pub(crate) const COINCIDENT: f64 = 1e-6;

/// Frame-wide inputs shared by every field call.
#[derive(Clone, Copy, Debug)]
pub struct FieldContext<'a> {
    /// Scaled frame time in milliseconds.
    pub time: f64,
    pub settings: &'a AnimationSettings,
}

impl<'a> FieldContext<'a> {
    pub fn new(time: f64, settings: &'a AnimationSettings) -> Self {
        Self { time, settings }
    }

    /// Convert a normalized point to canvas pixels.
    #[inline]
    pub fn denormalize(&self, point: DVec2) -> DVec2 {
        self.settings.denormalize(point)
    }
}

/// Result of one field evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldOutput {
    /// New angle in degrees.
    pub angle: f64,
    pub length_factor: f64,
    pub width_factor: f64,
    pub intensity: Option<f64>,
    /// Scratch state to store on the vector, if the field keeps any.
    pub state: Option<AnimationState>,
}

impl FieldOutput {
    pub fn new(angle: f64, length_factor: f64, width_factor: f64) -> Self {
        Self {
            angle,
            length_factor,
            width_factor,
            intensity: None,
            state: None,
        }
    }

    /// Keep the vector exactly as it is.
    pub fn unchanged(vector: &VectorItem) -> Self {
        Self {
            angle: vector.current_angle,
            length_factor: vector.length_factor,
            width_factor: vector.width_factor,
            intensity: vector.intensity_factor,
            state: vector.animation_state.clone(),
        }
    }

    /// The vector's rest pose: initial angle, neutral factors.
    pub fn rest(vector: &VectorItem) -> Self {
        Self::new(vector.initial_angle, 1.0, 1.0)
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_state(mut self, state: AnimationState) -> Self {
        self.state = Some(state);
        self
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::vector::{SeedVector, VectorId, VectorItem};

    pub fn vector_at(id: u32, x: f64, y: f64, angle: f64) -> VectorItem {
        VectorItem::from_seed(&SeedVector {
            id: VectorId(id),
            r: 0,
            c: id,
            base_x: x,
            base_y: y,
            initial_angle: angle,
            flock_id: None,
        })
    }

    pub fn assert_valid(out: &super::FieldOutput) {
        assert!(out.angle.is_finite());
        assert!((0.0..360.0).contains(&out.angle), "angle {} out of range", out.angle);
        assert!(out.length_factor.is_finite());
        assert!(out.width_factor.is_finite());
    }
}
