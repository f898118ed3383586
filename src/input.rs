//! Pointer input for interactive hosts.
//!
//! [`PointerTracker`] folds raw pointer events from whatever windowing layer
//! hosts the animation into per-frame state: the pointer position used by
//! the mouse-interaction field, held buttons, and clicks that trigger center
//! pulses.
//!
//! ```
//! use vecflow::input::{MouseButton, PointerEvent, PointerTracker};
//! use vecflow::{AnimationSettings, DVec2, FieldType};
//!
//! let mut pointer = PointerTracker::new(800.0, 600.0);
//! pointer.handle_event(&PointerEvent::Moved { x: 200.0, y: 150.0 });
//! pointer.handle_event(&PointerEvent::Pressed(MouseButton::Left));
//!
//! let mut settings = AnimationSettings::new(FieldType::MouseInteraction, 800.0, 600.0);
//! pointer.apply_to(&mut settings);
//! assert_eq!(settings.mouse, Some(DVec2::new(200.0, 150.0)));
//! assert_eq!(pointer.take_clicks(), vec![DVec2::new(0.25, 0.25)]);
//! ```

use crate::precision;
use crate::scheduler::{LoopCommand, LoopHandle};
use crate::settings::AnimationSettings;
use glam::DVec2;
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Raw pointer event in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved { x: f64, y: f64 },
    /// Pointer left the canvas.
    Left,
    Pressed(MouseButton),
    Released(MouseButton),
}

/// Pointer state tracking.
///
/// Tracks both instantaneous events (pressed/released this frame) and
/// continuous state (held, position).
#[derive(Debug, Default)]
pub struct PointerTracker {
    held: HashSet<MouseButton>,
    pressed: HashSet<MouseButton>,
    released: HashSet<MouseButton>,

    position: Option<DVec2>,
    delta: DVec2,

    /// Normalized points of left clicks not yet taken.
    clicks: Vec<DVec2>,
    canvas: DVec2,
}

impl PointerTracker {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            canvas: DVec2::new(canvas_width, canvas_height),
            ..Default::default()
        }
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = DVec2::new(width, height);
    }

    // ========== Button Queries ==========

    /// Check if a button was pressed this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    /// Check if a button is currently held down.
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.held.contains(&button)
    }

    /// Check if a button was released this frame.
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.released.contains(&button)
    }

    // ========== Position Queries ==========

    /// Pointer position in canvas pixels, `None` when outside the canvas.
    pub fn position(&self) -> Option<DVec2> {
        self.position
    }

    /// Pointer position as a `[0, 1]` canvas fraction.
    pub fn normalized(&self) -> Option<DVec2> {
        self.position.map(|p| self.normalize(p))
    }

    /// Pointer movement since last frame in pixels.
    pub fn delta(&self) -> DVec2 {
        self.delta
    }

    fn normalize(&self, p: DVec2) -> DVec2 {
        let size = self.canvas.max(DVec2::ONE);
        let n = (p / size).clamp(DVec2::ZERO, DVec2::ONE);
        DVec2::new(
            precision::round(n.x, precision::FACTOR_DIGITS),
            precision::round(n.y, precision::FACTOR_DIGITS),
        )
    }

    /// Clear per-frame state. Call once at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.delta = DVec2::ZERO;
    }

    pub fn handle_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Moved { x, y } => {
                let next = DVec2::new(x, y);
                if !next.is_finite() {
                    return;
                }
                if let Some(prev) = self.position {
                    self.delta += next - prev;
                }
                self.position = Some(next);
            }
            PointerEvent::Left => {
                self.position = None;
                self.held.clear();
            }
            PointerEvent::Pressed(button) => {
                if !self.held.contains(&button) {
                    self.pressed.insert(button);
                }
                self.held.insert(button);
                if button == MouseButton::Left {
                    if let Some(p) = self.position {
                        let click = self.normalize(p);
                        self.clicks.push(click);
                    }
                }
            }
            PointerEvent::Released(button) => {
                self.held.remove(&button);
                self.released.insert(button);
            }
        }
    }

    /// Take the normalized points of clicks since the last call.
    pub fn take_clicks(&mut self) -> Vec<DVec2> {
        std::mem::take(&mut self.clicks)
    }

    /// Write the pointer into `settings.mouse`.
    pub fn apply_to(&self, settings: &mut AnimationSettings) {
        settings.mouse = self.position;
    }

    /// Queue the pointer position and one pulse per pending click on a
    /// running loop.
    pub fn forward(&mut self, handle: &LoopHandle) {
        handle.send(LoopCommand::Pointer(self.position));
        for click in self.take_clicks() {
            handle.trigger_pulse(click.x, click.y);
        }
    }
}
