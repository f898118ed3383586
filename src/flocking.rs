//! Boids steering for vectors.
//!
//! Anchors never move. Each vector carries a virtual boid velocity in its
//! [`FlockingState`] and points along it. Separation, alignment, cohesion and
//! goal seeking each contribute a unit steering direction scaled by its
//! weight; the sum, scaled by `max_force`, is added to the velocity, which is
//! then clamped to `max_speed`.
//!
//! Neighbor lookups go through a [`SpatialGrid`] with cells the size of the
//! perception radius, so each query touches at most nine cells.

use crate::fields::{FieldContext, FieldOutput, COINCIDENT};
use crate::noise;
use crate::precision::{self, ANGLE_DIGITS};
use crate::settings::{AnimationSettings, FieldType};
use crate::spatial::SpatialGrid;
use crate::vector::{AnimationState, FlockingState, VectorId, VectorItem};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fraction of `max_speed` a fresh boid starts with.
const SPAWN_SPEED: f64 = 0.25;
/// Peak heading jitter of a fresh boid, in degrees.
const SPAWN_JITTER: f64 = 15.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlockingProps {
    /// Neighbor radius in pixels.
    pub perception_radius: f64,
    /// Velocity cap in pixels per frame.
    pub max_speed: f64,
    /// Scale of the summed steering per frame.
    pub max_force: f64,
    pub separation_force: f64,
    pub alignment_force: f64,
    pub cohesion_force: f64,
    pub goal_force: f64,
    /// Normalized goal point.
    pub goal: DVec2,
    /// Only flock with vectors of the same `flock_id`.
    pub use_flock_groups: bool,
    /// Minimum milliseconds between grid rebuilds after a canvas resize.
    pub rebuild_interval: f64,
}

impl Default for FlockingProps {
    fn default() -> Self {
        Self {
            perception_radius: 60.0,
            max_speed: 2.0,
            max_force: 0.08,
            separation_force: 1.5,
            alignment_force: 1.0,
            cohesion_force: 1.0,
            goal_force: 0.6,
            goal: DVec2::splat(0.5),
            use_flock_groups: true,
            rebuild_interval: 100.0,
        }
    }
}

/// Spatial index and bookkeeping for the flocking field of one host.
#[derive(Debug, Default)]
pub struct FlockingField {
    grid: Option<SpatialGrid>,
    index: HashMap<VectorId, usize>,
    canvas: (f64, f64),
    last_rebuild: f64,
    prepared_at: Option<f64>,
}

impl FlockingField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self) -> Option<&SpatialGrid> {
        self.grid.as_ref()
    }

    /// Number of vectors currently indexed.
    pub fn tracked(&self) -> usize {
        self.index.len()
    }

    /// Drop the grid and every index entry.
    pub fn reset(&mut self) {
        self.grid = None;
        self.index.clear();
        self.prepared_at = None;
        self.last_rebuild = 0.0;
    }

    /// Index the frame's snapshot.
    ///
    /// The grid is rebuilt when the radius changes, when time runs
    /// backwards, and at most every `rebuild_interval` while the canvas size
    /// differs from the one it was built for. Otherwise positions are
    /// updated in place and ids missing from `all` are purged. Calling it
    /// again for the same frame is a no-op.
    pub fn prepare(&mut self, all: &[VectorItem], settings: &AnimationSettings, props: &FlockingProps, time: f64) {
        if self.prepared_at == Some(time) && self.index.len() == all.len() {
            return;
        }
        let radius = props.perception_radius.max(1.0);
        let canvas = (settings.canvas_width, settings.canvas_height);
        let rewound = self.prepared_at.is_some_and(|t| time < t);
        let resized = canvas != self.canvas && time - self.last_rebuild >= props.rebuild_interval;

        let rebuild = match &self.grid {
            None => true,
            Some(grid) => grid.cell_size() != radius || resized || rewound,
        };

        self.index.clear();
        self.index.extend(all.iter().enumerate().map(|(i, v)| (v.id, i)));

        if rebuild {
            let mut grid = SpatialGrid::new(radius, canvas.0, canvas.1);
            for v in all {
                grid.insert(v.id, v.position());
            }
            log::debug!(
                "Flocking grid rebuilt: {} vectors, cell {}px, {:?} cells",
                all.len(),
                radius,
                grid.dims()
            );
            self.grid = Some(grid);
            self.canvas = canvas;
            self.last_rebuild = time;
        } else if let Some(grid) = self.grid.as_mut() {
            for v in all {
                grid.update(v.id, v.position());
            }
            let stale: Vec<VectorId> = grid
                .iter()
                .map(|(id, _)| id)
                .filter(|id| !self.index.contains_key(id))
                .collect();
            for id in &stale {
                grid.remove(*id);
            }
            if !stale.is_empty() {
                log::trace!("Flocking purged {} stale ids", stale.len());
            }
        }
        self.prepared_at = Some(time);
    }

    /// Velocity stored on `vector`, or a deterministic spawn velocity along
    /// its current heading.
    pub fn velocity_of(vector: &VectorItem, props: &FlockingProps) -> DVec2 {
        if let Some(AnimationState::Flocking(state)) = vector.state_for(FieldType::Flocking) {
            if state.velocity.is_finite() {
                return state.velocity;
            }
        }
        let jitter = noise::rand_signed(vector.id.0) * SPAWN_JITTER;
        let heading = precision::round((vector.current_angle + jitter).to_radians(), ANGLE_DIGITS);
        let speed = props.max_speed.max(0.0) * SPAWN_SPEED;
        DVec2::new(precision::cos(heading), precision::sin(heading)) * speed
    }

    /// Neighbors of `vector` within the perception radius, itself excluded.
    pub fn neighbors<'a>(&self, vector: &VectorItem, all: &'a [VectorItem], props: &FlockingProps) -> Vec<&'a VectorItem> {
        let Some(grid) = &self.grid else {
            return Vec::new();
        };
        let radius = props.perception_radius.max(1.0);
        grid.query(vector.position(), radius)
            .into_iter()
            .filter(|id| *id != vector.id)
            .filter_map(|id| self.index.get(&id).and_then(|&i| all.get(i)))
            .filter(|n| n.id != vector.id)
            .filter(|n| !props.use_flock_groups || n.flock_id == vector.flock_id)
            .collect()
    }

    /// Steer one vector against the prepared snapshot.
    pub fn update(&self, vector: &VectorItem, all: &[VectorItem], props: &FlockingProps, ctx: &FieldContext) -> FieldOutput {
        let pos = vector.position();
        let radius = props.perception_radius.max(1.0);
        let velocity = Self::velocity_of(vector, props);

        let mut separation = DVec2::ZERO;
        let mut alignment = DVec2::ZERO;
        let mut centroid = DVec2::ZERO;
        let neighbors = self.neighbors(vector, all, props);

        for n in &neighbors {
            let away = pos - n.position();
            let d = precision::coord(away.length());
            if d > COINCIDENT && d < radius * 0.5 {
                separation += away / (d * d);
            }
            alignment += Self::velocity_of(n, props);
            centroid += n.position();
        }

        let mut steer = separation.normalize_or_zero() * props.separation_force;
        if !neighbors.is_empty() {
            let count = neighbors.len() as f64;
            steer += (alignment / count).normalize_or_zero() * props.alignment_force;
            steer += (centroid / count - pos).normalize_or_zero() * props.cohesion_force;
        }
        let goal = ctx.denormalize(props.goal);
        steer += (goal - pos).normalize_or_zero() * props.goal_force;

        let next = (velocity + steer * props.max_force).clamp_length_max(props.max_speed.max(0.0));
        let next = DVec2::new(
            precision::round(next.x, ANGLE_DIGITS),
            precision::round(next.y, ANGLE_DIGITS),
        );
        let state = AnimationState::Flocking(FlockingState { velocity: next });

        let speed = next.length();
        if speed <= COINCIDENT {
            return FieldOutput::unchanged(vector).with_state(state);
        }
        let angle = precision::normalize_deg(precision::atan2_deg(next.y, next.x));
        let ratio = if props.max_speed > 0.0 { speed / props.max_speed } else { 0.0 };
        FieldOutput::new(angle, precision::factor(1.0 + 0.5 * ratio), 1.0).with_state(state)
    }
}
