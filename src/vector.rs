//! Per-cell animated vector state.
//!
//! A [`VectorItem`] is created once from a [`SeedVector`] handed over by the
//! layout generator and then replaced every frame by the dispatcher. Spawn
//! data (`id`, grid coordinates, anchor, initial angle) never changes after
//! construction; everything else is per-frame state.
//!
//! Angles are in degrees, canonical range `[0, 360)`.

use crate::settings::FieldType;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a vector across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorId(pub u32);

impl fmt::Display for VectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VectorId {
    fn from(id: u32) -> Self {
        VectorId(id)
    }
}

/// Spawn data produced by the layout generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedVector {
    pub id: VectorId,
    /// Grid row.
    pub r: u32,
    /// Grid column.
    pub c: u32,
    /// Anchor x in canvas pixels.
    pub base_x: f64,
    /// Anchor y in canvas pixels.
    pub base_y: f64,
    /// Starting angle in degrees.
    pub initial_angle: f64,
    /// Optional flocking group.
    #[serde(default)]
    pub flock_id: Option<u32>,
}

/// Scratch state of the random-loop field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomLoopState {
    /// Angle the current transition started from.
    pub previous_angle: f64,
    /// Angle the current transition heads toward.
    pub target_angle: f64,
    /// Time the current hold/transition segment began (ms).
    pub segment_start: f64,
    /// Time of the next target change (ms).
    pub next_change: f64,
    /// Number of target changes so far; part of the RNG seed.
    pub changes: u64,
}

/// Scratch state of the flocking field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlockingState {
    /// Virtual boid velocity in pixels per frame.
    pub velocity: DVec2,
}

/// Field-owned scratch state attached to a vector.
///
/// Each variant belongs to exactly one field. The dispatcher discards any
/// state whose owner is not the active field, so a field never sees a
/// scratch record written by another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum AnimationState {
    RandomLoop(RandomLoopState),
    Flocking(FlockingState),
}

impl AnimationState {
    /// The field that owns this state.
    pub fn field(&self) -> FieldType {
        match self {
            AnimationState::RandomLoop(_) => FieldType::RandomLoop,
            AnimationState::Flocking(_) => FieldType::Flocking,
        }
    }
}

/// One grid cell's animated state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorItem {
    pub id: VectorId,
    pub r: u32,
    pub c: u32,
    pub base_x: f64,
    pub base_y: f64,
    pub initial_angle: f64,

    pub current_angle: f64,
    pub previous_angle: f64,
    pub target_angle: f64,
    /// Multiplier on the base length, within `[MIN_FACTOR, MAX_FACTOR]`.
    pub length_factor: f64,
    /// Multiplier on the base width, within `[MIN_FACTOR, MAX_FACTOR]`.
    pub width_factor: f64,
    /// Drives color/opacity effects in the render layer.
    #[serde(default)]
    pub intensity_factor: Option<f64>,
    #[serde(default)]
    pub flock_id: Option<u32>,
    #[serde(default)]
    pub animation_state: Option<AnimationState>,
    /// Set by level-of-detail reduction on render copies.
    #[serde(default)]
    pub simplified: bool,
}

impl VectorItem {
    /// Create a vector at rest from its spawn data.
    pub fn from_seed(seed: &SeedVector) -> Self {
        let angle = crate::precision::normalize_deg(seed.initial_angle);
        Self {
            id: seed.id,
            r: seed.r,
            c: seed.c,
            base_x: seed.base_x,
            base_y: seed.base_y,
            initial_angle: angle,
            current_angle: angle,
            previous_angle: angle,
            target_angle: angle,
            length_factor: 1.0,
            width_factor: 1.0,
            intensity_factor: None,
            flock_id: seed.flock_id,
            animation_state: None,
            simplified: false,
        }
    }

    /// Anchor position in canvas pixels.
    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.base_x, self.base_y)
    }

    /// Current direction as a unit vector (y down).
    pub fn direction(&self) -> DVec2 {
        let rad = self.current_angle.to_radians();
        DVec2::new(rad.cos(), rad.sin())
    }

    /// Scratch state for `field`, if the vector holds one for it.
    pub fn state_for(&self, field: FieldType) -> Option<&AnimationState> {
        self.animation_state.as_ref().filter(|s| s.field() == field)
    }
}

impl From<&SeedVector> for VectorItem {
    fn from(seed: &SeedVector) -> Self {
        VectorItem::from_seed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> SeedVector {
        SeedVector {
            id: VectorId(7),
            r: 1,
            c: 2,
            base_x: 40.0,
            base_y: 20.0,
            initial_angle: -90.0,
            flock_id: Some(3),
        }
    }

    #[test]
    fn test_from_seed_normalizes_angle() {
        let v = VectorItem::from_seed(&seed());
        assert_eq!(v.initial_angle, 270.0);
        assert_eq!(v.current_angle, 270.0);
        assert_eq!(v.length_factor, 1.0);
        assert_eq!(v.flock_id, Some(3));
        assert!(v.animation_state.is_none());
    }

    #[test]
    fn test_state_for_filters_by_owner() {
        let mut v = VectorItem::from_seed(&seed());
        v.animation_state = Some(AnimationState::Flocking(FlockingState {
            velocity: DVec2::X,
        }));
        assert!(v.state_for(FieldType::Flocking).is_some());
        assert!(v.state_for(FieldType::RandomLoop).is_none());
    }

    #[test]
    fn test_seed_json_defaults() {
        let json = r#"{"id":1,"r":0,"c":0,"baseX":5.0,"baseY":6.0,"initialAngle":0.0}"#;
        let seed: SeedVector = serde_json::from_str(json).unwrap();
        assert_eq!(seed.id, VectorId(1));
        assert_eq!(seed.flock_id, None);
    }
}
