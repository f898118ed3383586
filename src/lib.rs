//! # vecflow - Vector Field Animation Engine
//!
//! Procedural motion for large grids of 2D vectors: waves, vortices, noise
//! flows, pointer interaction, expanding pulses and flocking, each a pure
//! function of a vector, the frame time and a property record.
//!
//! vecflow owns the per-frame math only. Layout generation, rendering and
//! UI belong to the host; the engine takes an array of [`VectorItem`]s and
//! returns the next one.
//!
//! ## Quick Start
//!
//! ```
//! use vecflow::prelude::*;
//!
//! let settings = AnimationSettings::new(FieldType::SmoothWaves, 800.0, 600.0);
//! let mut vectors = vecflow::demo_grid(800.0, 600.0, 40.0);
//! let mut animator = Animator::new();
//!
//! for frame in 0..60 {
//!     vectors = animator.update_frame(&vectors, frame as f64 * 16.0, &settings);
//! }
//!
//! let visible = apply_culling(&vectors, 800.0, 600.0, &CullingOptions::default());
//! assert!(!visible.is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! ### Vectors
//!
//! A [`VectorItem`] is one grid cell: a fixed anchor, an initial angle, and
//! per-frame state (current angle, length and width factors, optional
//! intensity and field-owned scratch state). Angles are degrees in
//! `[0, 360)`, canvas y points down.
//!
//! ### Fields
//!
//! [`FieldType`] is the closed set of motions. [`AnimationSettings`] picks
//! the active one and carries every field's properties; only the active
//! field's entry is read. See [`fields`] for the catalogue.
//!
//! ### Dispatcher
//!
//! [`Animator`] routes each vector to the active field and normalizes the
//! result. It also owns the state that outlives one vector: center pulses
//! ([`pulse`]) and the flocking grid ([`flocking`]).
//!
//! ### Loop Host
//!
//! [`scheduler::AnimationLoop`] drives an animator from a tick source,
//! applies queued commands between frames and commits culled copies to the
//! render layer.
//!
//! ## Determinism
//!
//! Every intermediate goes through [`precision`], randomness is seeded from
//! vector ids, and pulse jitter is a string hash. Two runs with the same
//! inputs produce bit-identical frames.
//!
//! ## Feature Overview
//!
//! | Concern | Module |
//! |---------|--------|
//! | Rounding and angle math | [`precision`], [`easing`] |
//! | Neighbor queries | [`spatial`] |
//! | Motion fields | [`fields`], [`pulse`], [`flocking`] |
//! | Frame dispatch | [`dispatch`] |
//! | Visibility and LOD | [`culling`] |
//! | Loop, timing, input | [`scheduler`], [`time`], [`input`] |
//! | Render upload | [`instance`] |

pub mod culling;
pub mod dispatch;
pub mod easing;
pub mod error;
pub mod fields;
pub mod flocking;
pub mod input;
pub mod instance;
pub mod noise;
pub mod precision;
pub mod pulse;
pub mod scheduler;
pub mod settings;
pub mod spatial;
pub mod time;
pub mod vector;

pub use bytemuck;
pub use culling::{apply_culling, apply_lod, filter_visible, is_visible, CullingOptions, VectorDims};
pub use dispatch::Animator;
pub use easing::Easing;
pub use error::{ColorError, SettingsError};
pub use glam::DVec2;
pub use pulse::PulseManager;
pub use settings::{AnimationSettings, FieldProperties, FieldType, TransitionSettings};
pub use spatial::SpatialGrid;
pub use vecflow_derive::FieldKind;
pub use vector::{AnimationState, SeedVector, VectorId, VectorItem};

/// Seed a regular grid of vectors covering a canvas, all pointing right.
///
/// Cells are `spacing` pixels apart, anchored at cell centers. Ids run row
/// by row. Hosts usually bring their own layout; this one backs the demo
/// binary, tests and benchmarks.
pub fn demo_grid(width: f64, height: f64, spacing: f64) -> Vec<VectorItem> {
    let spacing = if spacing.is_finite() && spacing > 0.0 {
        spacing
    } else {
        return Vec::new();
    };
    let cols = (width / spacing).floor().max(0.0) as u32;
    let rows = (height / spacing).floor().max(0.0) as u32;
    let mut vectors = Vec::with_capacity((cols * rows) as usize);
    for r in 0..rows {
        for c in 0..cols {
            vectors.push(VectorItem::from_seed(&SeedVector {
                id: VectorId(r * cols + c),
                r,
                c,
                base_x: precision::coord((c as f64 + 0.5) * spacing),
                base_y: precision::coord((r as f64 + 0.5) * spacing),
                initial_angle: 0.0,
                flock_id: None,
            }));
        }
    }
    vectors
}

/// Convenient re-exports for common usage.
///
/// ```
/// use vecflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::culling::{apply_culling, CullingOptions, VectorDims};
    pub use crate::dispatch::Animator;
    pub use crate::scheduler::{AnimationLoop, CancellationToken, FixedStep, TickSource, WallClock};
    pub use crate::settings::{AnimationSettings, FieldType};
    pub use crate::spatial::SpatialGrid;
    pub use crate::vector::{SeedVector, VectorId, VectorItem};
    pub use crate::FieldKind;
    pub use glam::DVec2;
}
