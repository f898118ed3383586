//! Center pulses: expanding rings that push vectors outward as they pass.
//!
//! A pulse is spawned by [`PulseManager::trigger_pulse`], propagates while
//! its progress is in `(0, 1)` and is dropped by the next
//! [`PulseManager::advance`] once progress reaches 1.
//!
//! Each manager owns its own pulse list; two hosts never share pulses.

use crate::easing::lerp_angle_deg;
use crate::fields::{FieldContext, FieldOutput, COINCIDENT};
use crate::noise;
use crate::precision::{self, ANGLE_DIGITS};
use crate::vector::VectorItem;
use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CenterPulseProps {
    /// Lifetime of one pulse in milliseconds.
    pub duration: f64,
    /// Reach of the wavefront at the end of a pulse, in pixels.
    /// `None` uses half the canvas diagonal.
    pub max_effect_distance: Option<f64>,
    pub propagation_speed: f64,
    /// Half-thickness of the wavefront in pixels.
    pub band_width: f64,
    /// Peak deterministic jitter around the outward direction, in degrees.
    pub angle_displacement: f64,
    pub length_boost: f64,
    /// Auto-trigger a pulse at `center` every `interval` milliseconds.
    pub continuous: bool,
    pub interval: f64,
    /// Extra exponential fade per unit progress in continuous mode.
    pub fade_rate: f64,
    /// Cap on concurrently tracked pulses.
    pub max_pulses: usize,
    /// Normalized auto-trigger center.
    pub center: DVec2,
}

impl Default for CenterPulseProps {
    fn default() -> Self {
        Self {
            duration: 2000.0,
            max_effect_distance: None,
            propagation_speed: 1.0,
            band_width: 80.0,
            angle_displacement: 45.0,
            length_boost: 0.5,
            continuous: false,
            interval: 3000.0,
            fade_rate: 3.0,
            max_pulses: 3,
            center: DVec2::splat(0.5),
        }
    }
}

/// One expanding ring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePulse {
    pub start_time: f64,
    /// Normalized center.
    pub center: DVec2,
}

impl ActivePulse {
    /// Elapsed fraction of `duration`, clamped to `[0, 1]`.
    pub fn progress(&self, time: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 1.0;
        }
        precision::round((time - self.start_time) / duration, ANGLE_DIGITS).clamp(0.0, 1.0)
    }
}

/// Owner of the active pulse list of one animation host.
#[derive(Clone, Debug)]
pub struct PulseManager {
    pulses: Vec<ActivePulse>,
    max_pulses: usize,
    last_auto: Option<f64>,
}

impl Default for PulseManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseManager {
    pub fn new() -> Self {
        Self {
            pulses: Vec::new(),
            max_pulses: CenterPulseProps::default().max_pulses,
            last_auto: None,
        }
    }

    pub fn pulses(&self) -> &[ActivePulse] {
        &self.pulses
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Spawn a pulse at normalized `(x, y)` starting at `time`.
    ///
    /// When the cap is exceeded the oldest pulses are dropped.
    pub fn trigger_pulse(&mut self, x: f64, y: f64, time: f64) {
        self.queue_pulse(x, y, time);
        self.enforce_cap();
    }

    /// Spawn a pulse without applying the cap. The next
    /// [`advance`](Self::advance) evicts against the cap configured then.
    pub fn queue_pulse(&mut self, x: f64, y: f64, time: f64) {
        let center = DVec2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
        self.pulses.push(ActivePulse {
            start_time: time,
            center,
        });
        log::debug!("Pulse triggered at ({:.3}, {:.3}), t={}", center.x, center.y, time);
    }

    pub fn max_pulses(&self) -> usize {
        self.max_pulses
    }

    /// Change the cap, evicting the oldest pulses above it.
    pub fn set_max_pulses(&mut self, cap: usize) {
        self.max_pulses = cap;
        self.enforce_cap();
    }

    fn enforce_cap(&mut self) {
        let cap = self.max_pulses.max(1);
        while self.pulses.len() > cap {
            let oldest = self
                .pulses
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.start_time.total_cmp(&b.start_time))
                .map(|(i, _)| i);
            let Some(i) = oldest else { break };
            let dropped = self.pulses.remove(i);
            log::debug!("Pulse cap {} reached, evicted pulse from t={}", cap, dropped.start_time);
        }
    }

    /// Drop every pulse and reset the auto-trigger schedule.
    pub fn clear_pulses(&mut self) {
        self.pulses.clear();
        self.last_auto = None;
    }

    /// Per-frame bookkeeping: prune finished pulses, apply the cap from
    /// `props` and fire the continuous-mode trigger when it is due.
    ///
    /// Calling it again with the same time changes nothing.
    pub fn advance(&mut self, time: f64, props: &CenterPulseProps) {
        self.pulses.retain(|p| p.progress(time, props.duration) < 1.0);
        self.set_max_pulses(props.max_pulses);

        if !props.continuous {
            self.last_auto = None;
            return;
        }
        let interval = props.interval.max(1.0);
        let due = match self.last_auto {
            Some(last) if time >= last => time - last >= interval,
            _ => true,
        };
        if due {
            self.trigger_pulse(props.center.x, props.center.y, time);
            self.last_auto = Some(time);
        }
    }

    /// Deterministic jitter in `[-1, 1]` for a vector/pulse pair.
    pub fn jitter(vector: &VectorItem, pulse: &ActivePulse) -> f64 {
        let h = noise::hash_str(&format!("{}:{}", vector.id, pulse.start_time));
        precision::round(h as f64 / u32::MAX as f64 * 2.0 - 1.0, ANGLE_DIGITS)
    }

    /// Combined effect of every active pulse on `vector`.
    ///
    /// Pulses combine by intensity-weighted circular mean, so overlapping
    /// rings never add up past a single full-strength ring.
    pub fn apply(&self, vector: &VectorItem, props: &CenterPulseProps, ctx: &FieldContext) -> FieldOutput {
        let reach = props.max_effect_distance.unwrap_or_else(|| ctx.settings.half_diagonal());
        let band = props.band_width.max(1.0);
        let pos = vector.position();

        let mut total = 0.0;
        let mut sum = DVec2::ZERO;
        let mut boost = 0.0;

        for pulse in &self.pulses {
            let progress = pulse.progress(ctx.time, props.duration);
            if progress >= 1.0 || ctx.time < pulse.start_time {
                continue;
            }
            let delta = pos - ctx.denormalize(pulse.center);
            let distance = precision::coord(delta.length());
            let radius = precision::coord(progress * reach * props.propagation_speed);
            let off = (distance - radius).abs();
            if off >= band {
                continue;
            }

            let mut intensity = (1.0 - off / band) * (1.0 - progress);
            if props.continuous {
                intensity *= precision::round((-props.fade_rate * progress).exp(), ANGLE_DIGITS);
            }
            let intensity = precision::round(intensity, ANGLE_DIGITS);
            if intensity <= 0.0 {
                continue;
            }

            let outward = if distance <= COINCIDENT {
                vector.initial_angle
            } else {
                precision::atan2_deg(delta.y, delta.x)
            };
            let effect = precision::angle(outward + props.angle_displacement * Self::jitter(vector, pulse));
            let rad = effect.to_radians();
            sum += DVec2::new(precision::cos(rad), precision::sin(rad)) * intensity;
            boost += intensity * props.length_boost * intensity;
            total += intensity;
        }

        if total <= 0.0 {
            return FieldOutput::rest(vector).with_intensity(0.0);
        }

        let mean_angle = if sum.length_squared() <= COINCIDENT {
            vector.initial_angle
        } else {
            precision::atan2_deg(sum.y, sum.x)
        };
        let strength = precision::factor(total.min(1.0));
        let boost = precision::round(boost / total, ANGLE_DIGITS);
        FieldOutput::new(
            lerp_angle_deg(vector.initial_angle, mean_angle, strength),
            precision::factor(1.0 + boost),
            precision::factor(1.0 + 0.5 * boost),
        )
        .with_intensity(strength)
    }
}
