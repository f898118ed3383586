//! Frame dispatcher.
//!
//! [`Animator`] routes each vector to the active field, then normalizes the
//! result: angles are wrapped into `[0, 360)`, factors are clamped into
//! `[MIN_FACTOR, MAX_FACTOR]`, non-finite output falls back to the previous
//! value, and optional transitions ease the vector toward the field output.
//!
//! The animator also owns the state that outlives a single vector: the
//! center-pulse list and the flocking grid. Both are discarded whenever the
//! active field changes.
//!
//! ```
//! use vecflow::{Animator, AnimationSettings, FieldType, SeedVector, VectorId, VectorItem};
//!
//! let settings = AnimationSettings::new(FieldType::SmoothWaves, 800.0, 600.0);
//! let vectors: Vec<VectorItem> = (0..4)
//!     .map(|i| VectorItem::from_seed(&SeedVector {
//!         id: VectorId(i),
//!         r: 0,
//!         c: i,
//!         base_x: i as f64 * 40.0,
//!         base_y: 20.0,
//!         initial_angle: 0.0,
//!         flock_id: None,
//!     }))
//!     .collect();
//!
//! let mut animator = Animator::new();
//! let next = animator.update_frame(&vectors, 16.0, &settings);
//! assert_eq!(next.len(), 4);
//! assert!(next.iter().all(|v| (0.0..360.0).contains(&v.current_angle)));
//! ```

use crate::easing::{lerp, lerp_angle_deg};
use crate::fields::{
    directional_flow, geometric, lissajous, mouse, perlin_flow, random_loop, sea_waves,
    smooth_waves, vortex, FieldContext, FieldOutput,
};
use crate::flocking::FlockingField;
use crate::precision::{self, ANGLE_DIGITS};
use crate::pulse::PulseManager;
use crate::settings::{AnimationSettings, FieldType};
use crate::vector::VectorItem;

/// Per-host dispatcher owning pulse and flocking state.
#[derive(Debug)]
pub struct Animator {
    pulses: PulseManager,
    flocking: FlockingField,
    active_field: Option<FieldType>,
    time_scale: f64,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame time as seen by fields.
pub fn effective_time(time_ms: f64, settings: &AnimationSettings) -> f64 {
    let scale = if settings.time_scale.is_finite() {
        settings.time_scale
    } else {
        1.0
    };
    precision::round(time_ms * scale, ANGLE_DIGITS)
}

impl Animator {
    pub fn new() -> Self {
        Self {
            pulses: PulseManager::new(),
            flocking: FlockingField::new(),
            active_field: None,
            time_scale: 1.0,
        }
    }

    pub fn pulses(&self) -> &PulseManager {
        &self.pulses
    }

    pub fn flocking(&self) -> &FlockingField {
        &self.flocking
    }

    /// Field seen by the most recent update.
    pub fn active_field(&self) -> Option<FieldType> {
        self.active_field
    }

    /// Spawn a center pulse at normalized `(x, y)`.
    ///
    /// `time_ms` is on the same clock as the update calls and is scaled by
    /// the last seen `time_scale`. The pulse cap is applied by the next
    /// update, against the `maxPulses` configured at that point.
    pub fn trigger_pulse(&mut self, x: f64, y: f64, time_ms: f64) {
        let time = precision::round(time_ms * self.time_scale, ANGLE_DIGITS);
        self.pulses.queue_pulse(x, y, time);
    }

    /// Adopt the field and time scale of `settings` ahead of the next
    /// update, so pulses triggered afterwards survive a field switch.
    pub fn apply_settings(&mut self, settings: &AnimationSettings) {
        self.time_scale = if settings.time_scale.is_finite() {
            settings.time_scale
        } else {
            1.0
        };
        self.sync_field(settings.field_type);
    }

    pub fn clear_pulses(&mut self) {
        self.pulses.clear_pulses();
    }

    /// Forget all cross-frame state.
    pub fn reset(&mut self) {
        self.pulses.clear_pulses();
        self.flocking.reset();
        self.active_field = None;
    }

    fn sync_field(&mut self, field: FieldType) {
        if self.active_field == Some(field) {
            return;
        }
        // Nothing to discard before the first update
        if let Some(previous) = self.active_field {
            log::debug!("Field changed: {} -> {}", previous, field);
            self.pulses.clear_pulses();
            self.flocking.reset();
        }
        self.active_field = Some(field);
    }

    /// Field-type bookkeeping shared by single-vector and frame updates.
    /// Idempotent for a given time.
    fn begin_frame(&mut self, time: f64, settings: &AnimationSettings, all: Option<&[VectorItem]>) {
        self.apply_settings(settings);
        match settings.field_type {
            FieldType::CenterPulse => self.pulses.advance(time, &settings.properties.center_pulse),
            field if field.requires_neighbors() => {
                if let Some(all) = all {
                    self.flocking.prepare(all, settings, &settings.properties.flocking, time);
                }
            }
            _ => {}
        }
    }

    /// Compute the next state of one vector.
    ///
    /// `all` is the previous frame's full vector array; flocking reads
    /// neighbors from it and runs goal-seeking only without it.
    pub fn update_vector_by_type(
        &mut self,
        vector: &VectorItem,
        time_ms: f64,
        settings: &AnimationSettings,
        all: Option<&[VectorItem]>,
    ) -> VectorItem {
        let time = effective_time(time_ms, settings);
        self.begin_frame(time, settings, all);
        self.compute(vector, time, settings, all.unwrap_or(&[]))
    }

    /// Compute the next state of every vector against the same snapshot.
    ///
    /// The returned array replaces `vectors` as a whole; no vector sees a
    /// neighbor's new state within a frame.
    pub fn update_frame(&mut self, vectors: &[VectorItem], time_ms: f64, settings: &AnimationSettings) -> Vec<VectorItem> {
        let time = effective_time(time_ms, settings);
        self.begin_frame(time, settings, Some(vectors));
        vectors
            .iter()
            .map(|v| self.compute(v, time, settings, vectors))
            .collect()
    }

    fn compute(&self, vector: &VectorItem, time: f64, settings: &AnimationSettings, all: &[VectorItem]) -> VectorItem {
        let field = settings.field_type;
        let mut base = vector.clone();
        if base.animation_state.as_ref().is_some_and(|s| s.field() != field) {
            base.animation_state = None;
        }

        let ctx = FieldContext::new(time, settings);
        let props = &settings.properties;
        let out = match field {
            FieldType::None => return settle(base),
            FieldType::SmoothWaves => smooth_waves::update(&base, &props.smooth_waves, &ctx),
            FieldType::SeaWaves => sea_waves::update(&base, &props.sea_waves, &ctx),
            FieldType::DirectionalFlow => directional_flow::update(&base, &props.directional_flow, &ctx),
            FieldType::Vortex => vortex::update(&base, &props.vortex, &ctx),
            FieldType::Lissajous => lissajous::update(&base, &props.lissajous, &ctx),
            FieldType::PerlinFlow => perlin_flow::update(&base, &props.perlin_flow, &ctx),
            FieldType::RandomLoop => random_loop::update(&base, &props.random_loop, &ctx),
            FieldType::MouseInteraction => mouse::update(&base, &props.mouse_interaction, &ctx),
            FieldType::CenterPulse => self.pulses.apply(&base, &props.center_pulse, &ctx),
            FieldType::Flocking => self.flocking.update(&base, all, &props.flocking, &ctx),
            FieldType::Geometric => geometric::update(&base, &props.geometric, &ctx),
        };
        commit(base, out, settings)
    }
}

/// Hold the pose, only normalizing values.
fn settle(mut vector: VectorItem) -> VectorItem {
    vector.current_angle = precision::normalize_deg(vector.current_angle);
    vector.length_factor = precision::clamp_factor(vector.length_factor);
    vector.width_factor = precision::clamp_factor(vector.width_factor);
    vector.animation_state = None;
    vector
}

fn finite_or(value: f64, fallback: f64, what: &str, vector: &VectorItem) -> f64 {
    if value.is_finite() {
        value
    } else {
        log::trace!("Non-finite {} for vector {}, keeping {}", what, vector.id, fallback);
        fallback
    }
}

/// Apply a field output to a vector with normalization and transitions.
fn commit(mut vector: VectorItem, out: FieldOutput, settings: &AnimationSettings) -> VectorItem {
    let transitions = &settings.transitions;
    let smoothing = if transitions.smoothing.is_finite() {
        transitions.smoothing.clamp(0.0, 1.0)
    } else {
        1.0
    };

    let old_angle = precision::normalize_deg(vector.current_angle);
    let target = precision::normalize_deg(finite_or(out.angle, old_angle, "angle", &vector));
    let angle = if transitions.angle {
        lerp_angle_deg(old_angle, target, smoothing)
    } else {
        target
    };

    let length = finite_or(out.length_factor, vector.length_factor, "length", &vector);
    let width = finite_or(out.width_factor, vector.width_factor, "width", &vector);
    let (length, width) = if transitions.length {
        (
            lerp(vector.length_factor, length, smoothing),
            lerp(vector.width_factor, width, smoothing),
        )
    } else {
        (length, width)
    };

    vector.previous_angle = old_angle;
    vector.target_angle = target;
    vector.current_angle = angle;
    vector.length_factor = precision::clamp_factor(length);
    vector.width_factor = precision::clamp_factor(width);
    let intensity = out.intensity.filter(|i| i.is_finite()).map(|i| i.max(0.0));
    let intensity = match intensity {
        Some(i) if transitions.color => Some(lerp(vector.intensity_factor.unwrap_or(0.0), i, smoothing)),
        other => other,
    };
    vector.intensity_factor = intensity.map(precision::factor);
    vector.animation_state = out.state;
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::vector_at;
    use crate::vector::{AnimationState, FlockingState, RandomLoopState};
    use glam::DVec2;

    fn grid(n: u32) -> Vec<VectorItem> {
        (0..n)
            .map(|i| vector_at(i, (i % 10) as f64 * 40.0 + 20.0, (i / 10) as f64 * 40.0 + 20.0, 0.0))
            .collect()
    }

    #[test]
    fn test_none_only_normalizes() {
        let settings = AnimationSettings::new(FieldType::None, 800.0, 600.0);
        let mut v = vector_at(0, 10.0, 10.0, 0.0);
        v.current_angle = -30.0;
        v.length_factor = 9.0;
        let mut animator = Animator::new();
        let out = animator.update_vector_by_type(&v, 100.0, &settings, None);
        assert_eq!(out.current_angle, 330.0);
        assert_eq!(out.length_factor, precision::MAX_FACTOR);
    }

    #[test]
    fn test_factors_clamped() {
        let mut settings = AnimationSettings::new(FieldType::SmoothWaves, 800.0, 600.0);
        settings.properties.smooth_waves.length_amplitude = 5.0;
        let mut animator = Animator::new();
        for t in [0.0, 250.0, 500.0, 750.0] {
            for v in animator.update_frame(&grid(20), t, &settings) {
                assert!((precision::MIN_FACTOR..=precision::MAX_FACTOR).contains(&v.length_factor));
            }
        }
    }

    #[test]
    fn test_non_finite_output_recovers() {
        let mut settings = AnimationSettings::new(FieldType::SmoothWaves, 800.0, 600.0);
        settings.properties.smooth_waves.amplitude = f64::NAN;
        settings.properties.smooth_waves.length_amplitude = f64::INFINITY;
        let mut v = vector_at(0, 10.0, 10.0, 0.0);
        v.current_angle = 42.0;
        let mut animator = Animator::new();
        let out = animator.update_vector_by_type(&v, 500.0, &settings, None);
        assert!(out.current_angle.is_finite());
        assert!(out.length_factor.is_finite());
        assert!((0.0..360.0).contains(&out.current_angle));
    }

    #[test]
    fn test_time_scale_applies() {
        let slow = AnimationSettings::new(FieldType::SmoothWaves, 800.0, 600.0);
        let mut fast = slow.clone();
        fast.time_scale = 2.0;
        let v = vector_at(0, 123.0, 45.0, 10.0);
        let a = Animator::new().update_vector_by_type(&v, 2000.0, &slow, None);
        let b = Animator::new().update_vector_by_type(&v, 1000.0, &fast, None);
        assert_eq!(a.current_angle, b.current_angle);
        assert_eq!(a.length_factor, b.length_factor);
    }

    #[test]
    fn test_transition_eases_angle() {
        let mut settings = AnimationSettings::new(FieldType::DirectionalFlow, 800.0, 600.0);
        settings.properties.directional_flow.turbulence = 0.0;
        settings.properties.directional_flow.angle = 100.0;
        settings.transitions.angle = true;
        settings.transitions.smoothing = 0.5;
        let v = vector_at(0, 10.0, 10.0, 0.0);
        let out = Animator::new().update_vector_by_type(&v, 0.0, &settings, None);
        assert_eq!(out.previous_angle, 0.0);
        assert_eq!(out.target_angle, 100.0);
        assert_eq!(out.current_angle, 50.0);
    }

    #[test]
    fn test_foreign_state_dropped() {
        let settings = AnimationSettings::new(FieldType::Flocking, 800.0, 600.0);
        let mut v = vector_at(0, 100.0, 100.0, 0.0);
        v.animation_state = Some(AnimationState::RandomLoop(RandomLoopState {
            previous_angle: 0.0,
            target_angle: 0.0,
            segment_start: 0.0,
            next_change: 0.0,
            changes: 3,
        }));
        let out = Animator::new().update_vector_by_type(&v, 0.0, &settings, None);
        assert!(matches!(out.animation_state, Some(AnimationState::Flocking(_))));

        let calm = AnimationSettings::new(FieldType::SmoothWaves, 800.0, 600.0);
        let mut w = out.clone();
        w.animation_state = Some(AnimationState::Flocking(FlockingState { velocity: DVec2::X }));
        let out = Animator::new().update_vector_by_type(&w, 0.0, &calm, None);
        assert!(out.animation_state.is_none());
    }

    #[test]
    fn test_field_change_clears_pulses_and_grid() {
        let mut settings = AnimationSettings::new(FieldType::CenterPulse, 800.0, 600.0);
        let vectors = grid(30);
        let mut animator = Animator::new();
        animator.update_frame(&vectors, 0.0, &settings);
        animator.trigger_pulse(0.5, 0.5, 0.0);
        animator.update_frame(&vectors, 16.0, &settings);
        assert_eq!(animator.pulses().len(), 1);

        settings.field_type = FieldType::Flocking;
        animator.update_frame(&vectors, 32.0, &settings);
        assert!(animator.pulses().is_empty());
        assert!(animator.flocking().grid().is_some());

        settings.field_type = FieldType::Vortex;
        animator.update_frame(&vectors, 48.0, &settings);
        assert!(animator.flocking().grid().is_none());
        assert_eq!(animator.active_field(), Some(FieldType::Vortex));
    }

    #[test]
    fn test_pulse_before_first_frame_survives() {
        let settings = AnimationSettings::new(FieldType::CenterPulse, 800.0, 600.0);
        let mut animator = Animator::new();
        animator.trigger_pulse(0.5, 0.5, 0.0);
        animator.update_frame(&grid(10), 0.0, &settings);
        assert_eq!(animator.pulses().len(), 1);
    }

    #[test]
    fn test_pulse_after_applied_switch_survives() {
        let waves = AnimationSettings::new(FieldType::SmoothWaves, 800.0, 600.0);
        let pulse = waves.clone().with_field(FieldType::CenterPulse);
        let vectors = grid(10);
        let mut animator = Animator::new();
        animator.update_frame(&vectors, 0.0, &waves);

        animator.apply_settings(&pulse);
        animator.trigger_pulse(0.5, 0.5, 16.0);
        animator.update_frame(&vectors, 16.0, &pulse);
        assert_eq!(animator.active_field(), Some(FieldType::CenterPulse));
        assert_eq!(animator.pulses().len(), 1);
    }

    #[test]
    fn test_raised_pulse_cap_keeps_new_pulses() {
        let mut settings = AnimationSettings::new(FieldType::CenterPulse, 800.0, 600.0);
        let vectors = grid(10);
        let mut animator = Animator::new();
        animator.update_frame(&vectors, 0.0, &settings);

        settings.properties.center_pulse.max_pulses = 5;
        for i in 0..5 {
            animator.trigger_pulse(0.5, 0.5, i as f64);
        }
        animator.update_frame(&vectors, 10.0, &settings);
        assert_eq!(animator.pulses().len(), 5);

        settings.properties.center_pulse.max_pulses = 2;
        animator.update_frame(&vectors, 20.0, &settings);
        let starts: Vec<f64> = animator.pulses().pulses().iter().map(|p| p.start_time).collect();
        assert_eq!(starts, vec![3.0, 4.0]);
    }

    #[test]
    fn test_color_transition_eases_intensity() {
        let mut settings = AnimationSettings::new(FieldType::Vortex, 800.0, 600.0);
        settings.transitions.smoothing = 0.1;
        let v = vector_at(0, 500.0, 300.0, 0.0);

        let snap = Animator::new().update_vector_by_type(&v, 0.0, &settings, None);
        assert_eq!(snap.intensity_factor, Some(1.0));

        settings.transitions.color = true;
        let eased = Animator::new().update_vector_by_type(&v, 0.0, &settings, None);
        assert_eq!(eased.intensity_factor, Some(0.1));
        let again = Animator::new().update_vector_by_type(&eased, 0.0, &settings, None);
        assert_eq!(again.intensity_factor, Some(0.19));
        assert_eq!(eased.current_angle, snap.current_angle);
    }

    #[test]
    fn test_frame_is_atomic() {
        let settings = AnimationSettings::new(FieldType::Flocking, 800.0, 600.0);
        let vectors = grid(40);
        let mut animator = Animator::new();
        let frame = animator.update_frame(&vectors, 0.0, &settings);

        // Each vector computed alone against the same untouched snapshot
        let mut single = Animator::new();
        for (i, v) in vectors.iter().enumerate() {
            let alone = single.update_vector_by_type(v, 0.0, &settings, Some(&vectors));
            assert_eq!(alone, frame[i]);
        }
    }

    #[test]
    fn test_repeatable_runs() {
        let settings = AnimationSettings::new(FieldType::RandomLoop, 800.0, 600.0);
        let run = || {
            let mut animator = Animator::new();
            let mut vectors = grid(25);
            for frame in 0..200 {
                vectors = animator.update_frame(&vectors, frame as f64 * 16.0, &settings);
            }
            vectors
        };
        assert_eq!(run(), run());
    }
}
