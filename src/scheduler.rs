//! Animation loop host.
//!
//! An [`AnimationLoop`] pulls frame timestamps from a [`TickSource`], runs
//! one dispatcher pass per frame and hands culled render copies to a commit
//! callback at most every `commit_interval_ms`. Other threads steer it
//! through a [`LoopHandle`] (settings swaps, pointer moves, pulse triggers)
//! and stop it with a [`CancellationToken`]; queued commands are applied
//! between frames, never during one.
//!
//! ```
//! use vecflow::scheduler::{AnimationLoop, FixedStep};
//! use vecflow::{AnimationSettings, FieldType};
//!
//! let settings = AnimationSettings::new(FieldType::Vortex, 400.0, 300.0);
//! let vectors = vecflow::demo_grid(400.0, 300.0, 40.0);
//! let mut host = AnimationLoop::new(FixedStep::fps(60.0).with_limit(30), vectors, settings);
//!
//! let mut commits = 0;
//! let summary = host.run(|_commit| commits += 1);
//! assert_eq!(summary.frames, 30);
//! assert_eq!(summary.commits, commits);
//! ```

use crate::culling::{apply_culling, CullingOptions};
use crate::dispatch::Animator;
use crate::settings::AnimationSettings;
use crate::time::FrameClock;
use crate::vector::VectorItem;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Source of frame timestamps in milliseconds.
pub trait TickSource {
    /// Timestamp of the next frame, or `None` when the source is exhausted.
    fn next_tick(&mut self) -> Option<f64>;
}

/// Evenly spaced synthetic timestamps, for headless runs and tests.
#[derive(Clone, Debug)]
pub struct FixedStep {
    interval_ms: f64,
    now: f64,
    remaining: Option<u64>,
}

impl FixedStep {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            now: 0.0,
            remaining: None,
        }
    }

    pub fn fps(fps: f64) -> Self {
        Self::new(if fps > 0.0 { 1000.0 / fps } else { 0.0 })
    }

    /// Stop after `frames` ticks.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }
}

impl TickSource for FixedStep {
    fn next_tick(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        let t = self.now;
        self.now += self.interval_ms;
        Some(t)
    }
}

/// Real-time timestamps, sleeping to hold a target frame rate.
#[derive(Debug)]
pub struct WallClock {
    start: Instant,
    frame: Duration,
    last: Option<Instant>,
    remaining: Option<u64>,
}

impl WallClock {
    pub fn new(target_fps: f64) -> Self {
        let fps = if target_fps > 0.0 { target_fps } else { 60.0 };
        Self {
            start: Instant::now(),
            frame: Duration::from_secs_f64(1.0 / fps),
            last: None,
            remaining: None,
        }
    }

    pub fn with_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }
}

impl TickSource for WallClock {
    fn next_tick(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        if let Some(last) = self.last {
            let due = last + self.frame;
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
        }
        let now = Instant::now();
        self.last = Some(now);
        Some(now.duration_since(self.start).as_secs_f64() * 1000.0)
    }
}

/// Shared stop flag. Cancelling is idempotent and safe from any thread.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Changes queued for the next frame boundary.
#[derive(Clone, Debug)]
pub enum LoopCommand {
    /// Replace the settings wholesale.
    Settings(Box<AnimationSettings>),
    /// Pointer position in canvas pixels, `None` when it left the canvas.
    Pointer(Option<DVec2>),
    /// Center pulse at a normalized point.
    Pulse { x: f64, y: f64 },
    /// Drop pulses and flocking state.
    Reset,
}

/// Cloneable sender side of a loop's command queue.
#[derive(Clone, Debug)]
pub struct LoopHandle {
    sender: Sender<LoopCommand>,
    token: CancellationToken,
}

impl LoopHandle {
    /// Queue a command. Returns `false` if the loop is gone.
    pub fn send(&self, command: LoopCommand) -> bool {
        self.sender.send(command).is_ok()
    }

    pub fn set_settings(&self, settings: AnimationSettings) -> bool {
        self.send(LoopCommand::Settings(Box::new(settings)))
    }

    pub fn trigger_pulse(&self, x: f64, y: f64) -> bool {
        self.send(LoopCommand::Pulse { x, y })
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoopConfig {
    /// Minimum animation time between commits.
    pub commit_interval_ms: f64,
    pub culling: CullingOptions,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            commit_interval_ms: 16.0,
            culling: CullingOptions::default(),
        }
    }
}

/// One batch of render-ready vectors.
#[derive(Debug)]
pub struct Commit<'a> {
    pub frame: u64,
    /// Animation time in milliseconds.
    pub time: f64,
    /// Culled, LOD-reduced copies.
    pub visible: &'a [VectorItem],
    /// Size of the full animated array.
    pub total: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub commits: u64,
    pub cancelled: bool,
    /// Animation time reached, in milliseconds.
    pub elapsed: f64,
}

/// Owner of one animated vector array and everything that drives it.
pub struct AnimationLoop<S: TickSource> {
    source: S,
    clock: FrameClock,
    animator: Animator,
    vectors: Vec<VectorItem>,
    settings: AnimationSettings,
    config: LoopConfig,
    token: CancellationToken,
    sender: Sender<LoopCommand>,
    commands: Receiver<LoopCommand>,
    last_commit: Option<f64>,
}

impl<S: TickSource> AnimationLoop<S> {
    pub fn new(source: S, vectors: Vec<VectorItem>, settings: AnimationSettings) -> Self {
        let (sender, commands) = mpsc::channel();
        Self {
            source,
            clock: FrameClock::new(),
            animator: Animator::new(),
            vectors,
            settings,
            config: LoopConfig::default(),
            token: CancellationToken::new(),
            sender,
            commands,
            last_commit: None,
        }
    }

    pub fn with_config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            sender: self.sender.clone(),
            token: self.token.clone(),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn vectors(&self) -> &[VectorItem] {
        &self.vectors
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                LoopCommand::Settings(settings) => match settings.validate() {
                    Ok(()) => {
                        self.settings = *settings;
                        self.animator.apply_settings(&self.settings);
                    }
                    Err(e) => log::warn!("Ignoring settings update: {}", e),
                },
                LoopCommand::Pointer(pointer) => self.settings.mouse = pointer,
                LoopCommand::Pulse { x, y } => {
                    self.animator.trigger_pulse(x, y, self.clock.elapsed());
                }
                LoopCommand::Reset => self.animator.reset(),
            }
        }
    }

    /// Run one frame. Returns the frame's animation time, or `None` when the
    /// tick source is exhausted.
    pub fn step(&mut self) -> Option<f64> {
        self.drain_commands();
        let stamp = self.source.next_tick()?;
        let (time, _) = self.clock.tick(stamp);
        self.vectors = self.animator.update_frame(&self.vectors, time, &self.settings);
        Some(time)
    }

    fn commit_due(&self, time: f64) -> bool {
        match self.last_commit {
            None => true,
            Some(last) if time < last => true,
            Some(last) => time - last >= self.config.commit_interval_ms,
        }
    }

    /// Run until the source ends or the token is cancelled.
    pub fn run<F: FnMut(&Commit)>(&mut self, mut on_commit: F) -> RunSummary {
        let mut summary = RunSummary::default();
        loop {
            if self.token.is_cancelled() {
                log::info!("Animation loop cancelled after {} frames", summary.frames);
                summary.cancelled = true;
                break;
            }
            let Some(time) = self.step() else {
                break;
            };
            summary.frames += 1;
            summary.elapsed = time;

            if self.commit_due(time) {
                let visible = apply_culling(
                    &self.vectors,
                    self.settings.canvas_width,
                    self.settings.canvas_height,
                    &self.config.culling,
                );
                on_commit(&Commit {
                    frame: self.clock.frame(),
                    time,
                    visible: &visible,
                    total: self.vectors.len(),
                });
                self.last_commit = Some(time);
                summary.commits += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FieldType;
    use crate::demo_grid;

    fn host(frames: u64, field: FieldType) -> AnimationLoop<FixedStep> {
        let settings = AnimationSettings::new(field, 400.0, 300.0);
        AnimationLoop::new(FixedStep::new(16.0).with_limit(frames), demo_grid(400.0, 300.0, 50.0), settings)
    }

    #[test]
    fn test_fixed_step_sequence() {
        let mut step = FixedStep::new(10.0).with_limit(3);
        assert_eq!(step.next_tick(), Some(0.0));
        assert_eq!(step.next_tick(), Some(10.0));
        assert_eq!(step.next_tick(), Some(20.0));
        assert_eq!(step.next_tick(), None);
    }

    #[test]
    fn test_token_is_idempotent() {
        let token = CancellationToken::new();
        let other = token.clone();
        token.cancel();
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_cancelled_before_start_runs_nothing() {
        let mut host = host(100, FieldType::SmoothWaves);
        host.token().cancel();
        let summary = host.run(|_| panic!("no commit expected"));
        assert!(summary.cancelled);
        assert_eq!(summary.frames, 0);
    }

    #[test]
    fn test_cancel_from_callback_stops_loop() {
        let mut host = host(1000, FieldType::SmoothWaves);
        let handle = host.handle();
        let summary = host.run(|commit| {
            if commit.frame >= 10 {
                handle.cancel();
            }
        });
        assert!(summary.cancelled);
        assert_eq!(summary.frames, 10);
    }

    #[test]
    fn test_commits_are_throttled() {
        let config = LoopConfig {
            commit_interval_ms: 48.0,
            ..Default::default()
        };
        let mut host = host(13, FieldType::SmoothWaves).with_config(config);
        let mut times = Vec::new();
        let summary = host.run(|commit| times.push(commit.time));
        assert_eq!(summary.frames, 13);
        assert_eq!(times, vec![0.0, 48.0, 96.0, 144.0, 192.0]);
    }

    #[test]
    fn test_queued_settings_apply_between_frames() {
        let mut host = host(5, FieldType::None);
        let handle = host.handle();
        host.step();
        assert!(handle.set_settings(AnimationSettings::new(FieldType::Vortex, 400.0, 300.0)));
        assert_eq!(host.settings().field_type, FieldType::None);
        host.step();
        assert_eq!(host.settings().field_type, FieldType::Vortex);
        assert_eq!(host.animator().active_field(), Some(FieldType::Vortex));
    }

    #[test]
    fn test_invalid_settings_ignored() {
        let mut host = host(5, FieldType::None);
        let mut bad = AnimationSettings::new(FieldType::Vortex, 0.0, 300.0);
        bad.canvas_width = f64::NAN;
        host.handle().set_settings(bad);
        host.step();
        assert_eq!(host.settings().field_type, FieldType::None);
    }

    #[test]
    fn test_pulse_and_pointer_commands() {
        let mut host = host(5, FieldType::CenterPulse);
        let handle = host.handle();
        host.step();
        handle.trigger_pulse(0.5, 0.5);
        handle.send(LoopCommand::Pointer(Some(DVec2::new(10.0, 20.0))));
        host.step();
        assert_eq!(host.animator().pulses().len(), 1);
        assert_eq!(host.settings().mouse, Some(DVec2::new(10.0, 20.0)));
    }

    #[test]
    fn test_pulse_before_first_step_survives() {
        let mut host = host(5, FieldType::CenterPulse);
        assert!(host.handle().trigger_pulse(0.5, 0.5));
        host.step();
        assert_eq!(host.animator().pulses().len(), 1);
    }

    #[test]
    fn test_switch_and_click_in_one_batch() {
        let mut host = host(5, FieldType::SmoothWaves);
        let handle = host.handle();
        host.step();
        handle.set_settings(AnimationSettings::new(FieldType::CenterPulse, 400.0, 300.0));
        handle.trigger_pulse(0.25, 0.25);
        host.step();
        assert_eq!(host.animator().active_field(), Some(FieldType::CenterPulse));
        assert_eq!(host.animator().pulses().len(), 1);
    }

    #[test]
    fn test_commit_vectors_are_culled_copies() {
        let mut host = host(3, FieldType::SmoothWaves);
        let total = host.vectors().len();
        host.run(|commit| {
            assert_eq!(commit.total, total);
            assert!(commit.visible.len() <= total);
        });
        assert!(host.vectors().iter().all(|v| !v.simplified));
    }
}
