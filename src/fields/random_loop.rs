//! Hold a heading, then ease toward a freshly picked random one.
//!
//! Each vector keeps a [`RandomLoopState`] with the segment it is in. When
//! the frame time passes `next_change`, a new target is drawn from a
//! [`StdRng`] seeded by `(seed, id, change index)`, so the same seed replays
//! the same sequence of headings.

use super::{FieldContext, FieldOutput};
use crate::easing::{lerp_angle_deg, Easing};
use crate::noise;
use crate::precision;
use crate::settings::FieldType;
use crate::vector::{AnimationState, RandomLoopState, VectorItem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RandomLoopProps {
    /// Time between target changes in milliseconds.
    pub interval: f64,
    /// Fraction of the interval spent easing toward the new target.
    pub transition_fraction: f64,
    /// Width of the window targets are drawn from, centered on the
    /// initial angle, in degrees.
    pub angle_range: f64,
    pub seed: u64,
    pub easing: Easing,
}

impl Default for RandomLoopProps {
    fn default() -> Self {
        Self {
            interval: 2000.0,
            transition_fraction: 0.5,
            angle_range: 360.0,
            seed: 0,
            easing: Easing::InOutQuad,
        }
    }
}

/// Draw the target for the `changes`-th change of `vector`.
pub fn pick_target(vector: &VectorItem, props: &RandomLoopProps, changes: u64) -> f64 {
    let key = props.seed
        ^ ((vector.id.0 as u64) << 32)
        ^ changes.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut rng = StdRng::seed_from_u64(key);
    let half = (props.angle_range.abs() * 0.5).min(180.0);
    let offset = if half > 0.0 {
        rng.gen_range(-half..=half)
    } else {
        0.0
    };
    precision::normalize_deg(vector.initial_angle + precision::angle(offset))
}

fn initial_state(vector: &VectorItem, props: &RandomLoopProps, time: f64) -> RandomLoopState {
    let interval = props.interval.max(1.0);
    let stagger = noise::rand01(vector.id.0 ^ props.seed as u32) * interval;
    RandomLoopState {
        previous_angle: vector.current_angle,
        target_angle: vector.current_angle,
        segment_start: time,
        next_change: precision::coord(time + stagger),
        changes: 0,
    }
}

/// Eased progress through the transition part of the current segment.
fn progress(state: &RandomLoopState, props: &RandomLoopProps, time: f64) -> f64 {
    let span = props.interval.max(1.0) * props.transition_fraction.clamp(0.0, 1.0);
    if span <= 0.0 {
        return 1.0;
    }
    precision::round((time - state.segment_start) / span, precision::ANGLE_DIGITS).clamp(0.0, 1.0)
}

fn angle_at(state: &RandomLoopState, props: &RandomLoopProps, time: f64) -> f64 {
    let eased = precision::round(props.easing.apply(progress(state, props, time)), precision::ANGLE_DIGITS);
    lerp_angle_deg(state.previous_angle, state.target_angle, eased)
}

pub fn update(vector: &VectorItem, props: &RandomLoopProps, ctx: &FieldContext) -> FieldOutput {
    let time = ctx.time;
    let mut state = match vector.state_for(FieldType::RandomLoop) {
        // Time running backwards (seek or reset) restarts the loop
        Some(AnimationState::RandomLoop(s)) if time >= s.segment_start => s.clone(),
        _ => initial_state(vector, props, time),
    };

    if time >= state.next_change {
        state.previous_angle = angle_at(&state, props, time);
        state.changes += 1;
        state.target_angle = pick_target(vector, props, state.changes);
        state.segment_start = time;
        state.next_change = precision::coord(time + props.interval.max(1.0));
    }

    let p = progress(&state, props, time);
    let angle = angle_at(&state, props, time);
    let length = precision::factor(1.0 + 0.15 * precision::sin(PI * p));

    FieldOutput::new(angle, length, 1.0).with_state(AnimationState::RandomLoop(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::{assert_valid, vector_at};
    use crate::settings::AnimationSettings;

    fn run(vector: &mut VectorItem, props: &RandomLoopProps, settings: &AnimationSettings, time: f64) -> FieldOutput {
        let out = update(vector, props, &FieldContext::new(time, settings));
        vector.current_angle = out.angle;
        vector.animation_state = out.state.clone();
        out
    }

    fn state_of(out: &FieldOutput) -> RandomLoopState {
        match out.state.clone() {
            Some(AnimationState::RandomLoop(s)) => s,
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_first_frame_initializes_and_holds() {
        let settings = AnimationSettings::new(FieldType::RandomLoop, 800.0, 600.0);
        let props = RandomLoopProps::default();
        let mut v = vector_at(4, 0.0, 0.0, 45.0);
        let out = run(&mut v, &props, &settings, 0.0);
        let state = state_of(&out);
        assert!(state.next_change >= 0.0 && state.next_change <= props.interval);
        if state.next_change > 0.0 {
            assert_eq!(out.angle, 45.0);
            assert_eq!(state.changes, 0);
        }
    }

    #[test]
    fn test_reaches_target_after_transition() {
        let settings = AnimationSettings::new(FieldType::RandomLoop, 800.0, 600.0);
        let props = RandomLoopProps::default();
        let mut v = vector_at(1, 0.0, 0.0, 0.0);
        let mut t = 0.0;
        while t <= 10_000.0 {
            let out = run(&mut v, &props, &settings, t);
            assert_valid(&out);
            assert!((1.0..=1.15).contains(&out.length_factor));
            t += 16.0;
        }
        let state = match v.animation_state.clone() {
            Some(AnimationState::RandomLoop(s)) => s,
            _ => panic!("missing state"),
        };
        assert!(state.changes >= 4);
        // Settled once the transition fraction has elapsed
        let settled = state.segment_start + props.interval * props.transition_fraction;
        let out = update(&v, &props, &FieldContext::new(settled.min(state.next_change - 1.0), &settings));
        assert_eq!(out.angle, state.target_angle);
    }

    #[test]
    fn test_targets_replay_for_same_seed() {
        let props = RandomLoopProps::default();
        let v = vector_at(12, 0.0, 0.0, 90.0);
        let a: Vec<f64> = (1..6).map(|n| pick_target(&v, &props, n)).collect();
        let b: Vec<f64> = (1..6).map(|n| pick_target(&v, &props, n)).collect();
        assert_eq!(a, b);

        let other = RandomLoopProps { seed: 7, ..props.clone() };
        let c: Vec<f64> = (1..6).map(|n| pick_target(&v, &other, n)).collect();
        assert_ne!(a, c);
    }

    #[test]
    fn test_narrow_range_stays_near_initial() {
        let props = RandomLoopProps {
            angle_range: 30.0,
            ..Default::default()
        };
        let v = vector_at(3, 0.0, 0.0, 100.0);
        for n in 1..50 {
            let target = pick_target(&v, &props, n);
            assert!(crate::easing::angle_delta_deg(100.0, target).abs() <= 15.0 + 1e-6);
        }
    }

    #[test]
    fn test_time_reversal_restarts() {
        let settings = AnimationSettings::new(FieldType::RandomLoop, 800.0, 600.0);
        let props = RandomLoopProps::default();
        let mut v = vector_at(2, 0.0, 0.0, 0.0);
        for t in [0.0, 3000.0, 6000.0] {
            run(&mut v, &props, &settings, t);
        }
        let out = run(&mut v, &props, &settings, 100.0);
        let state = state_of(&out);
        assert!(state.segment_start <= 100.0);
        assert!(state.changes <= 1);
    }
}
