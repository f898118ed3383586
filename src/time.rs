//! Frame timing for the animation loop.
//!
//! [`FrameClock`] turns raw frame timestamps (milliseconds, from any
//! [`TickSource`](crate::scheduler::TickSource)) into the animation time
//! handed to the engine. It supports pausing, a fixed delta for
//! deterministic playback and a time scale.
//!
//! # Example
//!
//! ```
//! use vecflow::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//! clock.tick(0.0);
//! clock.tick(16.0);
//! clock.tick(32.0);
//!
//! assert_eq!(clock.elapsed(), 32.0);
//! assert_eq!(clock.delta(), 16.0);
//! assert_eq!(clock.frame(), 3);
//! ```

/// Animation time derived from frame timestamps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Timestamp of the previous tick.
    last_stamp: Option<f64>,
    /// Animation time in milliseconds.
    elapsed_ms: f64,
    /// Animation time advanced by the last tick.
    delta_ms: f64,
    /// Total ticks since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f64,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Timestamp of last FPS calculation.
    fps_update_stamp: Option<f64>,
    /// How often to update FPS calculation, in milliseconds.
    fps_update_interval: f64,
    paused: bool,
    /// Fixed delta in milliseconds for deterministic playback.
    fixed_delta: Option<f64>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_stamp: None,
            elapsed_ms: 0.0,
            delta_ms: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_stamp: None,
            fps_update_interval: 500.0,
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Advance to the frame stamped `now_ms`.
    ///
    /// Returns `(elapsed, delta)` in animation milliseconds. Timestamps that
    /// go backwards advance by zero.
    pub fn tick(&mut self, now_ms: f64) -> (f64, f64) {
        let raw_delta = match self.last_stamp {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_stamp = Some(now_ms);
        self.frame_count += 1;

        if self.paused {
            self.delta_ms = 0.0;
        } else {
            let step = if self.frame_count > 1 {
                self.fixed_delta.unwrap_or(raw_delta)
            } else {
                0.0
            };
            self.delta_ms = step * self.time_scale;
            self.elapsed_ms += self.delta_ms;
        }

        // Update FPS periodically
        let since = self.fps_update_stamp.map(|s| now_ms - s);
        match since {
            None => self.fps_update_stamp = Some(now_ms),
            Some(span) if span >= self.fps_update_interval => {
                let frames = self.frame_count - self.fps_frame_count;
                self.fps = frames as f64 * 1000.0 / span;
                self.fps_frame_count = self.frame_count;
                self.fps_update_stamp = Some(now_ms);
            }
            Some(_) => {}
        }

        (self.elapsed_ms, self.delta_ms)
    }

    /// Animation time in milliseconds.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_ms
    }

    /// Animation time advanced by the last tick.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta_ms
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Stop animation time. Ticks still count frames.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Advance by `delta` milliseconds per tick regardless of timestamps.
    /// `None` restores timestamp-driven deltas.
    pub fn set_fixed_delta(&mut self, delta: Option<f64>) {
        self.fixed_delta = delta.map(|d| d.max(0.0));
    }

    /// Negative scales clamp to 0.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    /// Back to frame zero, keeping pause, fixed delta and scale settings.
    pub fn reset(&mut self) {
        self.last_stamp = None;
        self.elapsed_ms = 0.0;
        self.delta_ms = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_stamp = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
