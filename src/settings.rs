//! Animation settings shared by every field.
//!
//! [`AnimationSettings`] is the process-wide configuration of one animation
//! host. It is mutated between frames by the hosting UI and read-only while a
//! frame is being computed.
//!
//! Settings serialize to JSON with camelCase keys. Only the active field's
//! entry under `properties` is read, and every property falls back to a
//! documented default, so the smallest useful document is just the field key:
//!
//! ```
//! use vecflow::{AnimationSettings, FieldType};
//!
//! let settings = AnimationSettings::from_json_str(r#"{ "type": "vortex" }"#).unwrap();
//! assert_eq!(settings.field_type, FieldType::Vortex);
//! assert_eq!(settings.properties.vortex.strength, 120.0);
//! ```

use crate::error::SettingsError;
use crate::fields::directional_flow::DirectionalFlowProps;
use crate::fields::geometric::GeometricProps;
use crate::fields::lissajous::LissajousProps;
use crate::fields::mouse::MouseProps;
use crate::fields::perlin_flow::PerlinFlowProps;
use crate::fields::random_loop::RandomLoopProps;
use crate::fields::sea_waves::SeaWavesProps;
use crate::fields::smooth_waves::SmoothWavesProps;
use crate::fields::vortex::VortexProps;
use crate::flocking::FlockingProps;
use crate::precision;
use crate::pulse::CenterPulseProps;
use glam::DVec2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;
use vecflow_derive::FieldKind;

/// The closed set of motion fields.
///
/// String keys are the lowerCamelCase variant names (`"smoothWaves"`,
/// `"mouseInteraction"`, ...). Unknown keys deserialize to [`FieldType::None`]
/// so a partially migrated configuration keeps the loop running.
#[derive(FieldKind, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// No motion; vectors hold their pose.
    #[default]
    None,
    SmoothWaves,
    SeaWaves,
    DirectionalFlow,
    Vortex,
    Lissajous,
    PerlinFlow,
    RandomLoop,
    MouseInteraction,
    CenterPulse,
    Flocking,
    Geometric,
}

impl FieldType {
    /// Parse a key, treating unknown keys as [`FieldType::None`].
    pub fn from_name_lossy(key: &str) -> FieldType {
        FieldType::from_name(key).unwrap_or_else(|| {
            log::warn!("Unknown field type '{}', falling back to none", key);
            FieldType::None
        })
    }

    /// Whether this field reads the full vector snapshot.
    pub fn requires_neighbors(&self) -> bool {
        matches!(self, FieldType::Flocking)
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = Option::<String>::deserialize(deserializer)?;
        Ok(key.map_or(FieldType::None, |k| FieldType::from_name_lossy(&k)))
    }
}

/// Per-field property records. Only the active field's entry is read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldProperties {
    pub smooth_waves: SmoothWavesProps,
    pub sea_waves: SeaWavesProps,
    pub directional_flow: DirectionalFlowProps,
    pub vortex: VortexProps,
    pub lissajous: LissajousProps,
    pub perlin_flow: PerlinFlowProps,
    pub random_loop: RandomLoopProps,
    pub mouse_interaction: MouseProps,
    pub center_pulse: CenterPulseProps,
    pub flocking: FlockingProps,
    pub geometric: GeometricProps,
}

/// Whether angle/length/color changes ease toward the field output or snap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionSettings {
    pub angle: bool,
    pub length: bool,
    pub color: bool,
    /// Fraction of the remaining distance covered per frame when easing.
    pub smoothing: f64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            angle: false,
            length: false,
            color: false,
            smoothing: 0.15,
        }
    }
}

/// Configuration of one animation host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationSettings {
    /// Active field.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub properties: FieldProperties,
    /// Multiplier applied to frame time before any field sees it.
    pub time_scale: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Pointer position in canvas pixels; `None` disables interaction.
    pub mouse: Option<DVec2>,
    pub transitions: TransitionSettings,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            field_type: FieldType::None,
            properties: FieldProperties::default(),
            time_scale: 1.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
            mouse: None,
            transitions: TransitionSettings::default(),
        }
    }
}

impl AnimationSettings {
    /// Settings for `field_type` on a canvas of the given size, all
    /// properties at their defaults.
    pub fn new(field_type: FieldType, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            field_type,
            canvas_width,
            canvas_height,
            ..Default::default()
        }
    }

    /// Builder-style field switch.
    pub fn with_field(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Canvas size as a vector.
    #[inline]
    pub fn canvas(&self) -> DVec2 {
        DVec2::new(self.canvas_width, self.canvas_height)
    }

    /// Convert a normalized `[0, 1]` point to canvas pixels.
    pub fn denormalize(&self, point: DVec2) -> DVec2 {
        DVec2::new(
            precision::coord(point.x * self.canvas_width),
            precision::coord(point.y * self.canvas_height),
        )
    }

    /// Convert canvas pixels to a normalized point.
    pub fn normalize(&self, point: DVec2) -> DVec2 {
        let w = if self.canvas_width > 0.0 { self.canvas_width } else { 1.0 };
        let h = if self.canvas_height > 0.0 { self.canvas_height } else { 1.0 };
        DVec2::new(
            precision::round(point.x / w, precision::FACTOR_DIGITS),
            precision::round(point.y / h, precision::FACTOR_DIGITS),
        )
    }

    /// Half of the canvas diagonal, the default reach of radial effects.
    pub fn half_diagonal(&self) -> f64 {
        precision::coord(self.canvas().length() * 0.5)
    }

    /// Check the values a host is expected to validate before handing
    /// settings to the engine.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(self.canvas_width) || !ok(self.canvas_height) {
            return Err(SettingsError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON settings document.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: AnimationSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_keys() {
        assert_eq!(FieldType::SmoothWaves.name(), "smoothWaves");
        assert_eq!(FieldType::MouseInteraction.name(), "mouseInteraction");
        assert_eq!(FieldType::from_name("perlinFlow"), Some(FieldType::PerlinFlow));
        assert_eq!(FieldType::from_name("PerlinFlow"), None);
        assert_eq!(FieldType::count(), 12);
    }

    #[test]
    fn test_only_flocking_reads_neighbors() {
        let readers: Vec<FieldType> = FieldType::ALL.into_iter().filter(|f| f.requires_neighbors()).collect();
        assert_eq!(readers, vec![FieldType::Flocking]);
    }

    #[test]
    fn test_unknown_type_is_none() {
        let s = AnimationSettings::from_json_str(r#"{ "type": "plasmaStorm" }"#).unwrap();
        assert_eq!(s.field_type, FieldType::None);

        let s = AnimationSettings::from_json_str(r#"{ "type": null }"#).unwrap();
        assert_eq!(s.field_type, FieldType::None);
    }

    #[test]
    fn test_partial_properties_fill_defaults() {
        let json = r#"{
            "type": "smoothWaves",
            "canvasWidth": 1024,
            "properties": { "smoothWaves": { "amplitude": 12.5 } }
        }"#;
        let s = AnimationSettings::from_json_str(json).unwrap();
        assert_eq!(s.canvas_width, 1024.0);
        assert_eq!(s.canvas_height, 600.0);
        assert_eq!(s.properties.smooth_waves.amplitude, 12.5);
        assert_eq!(
            s.properties.smooth_waves.frequency,
            SmoothWavesProps::default().frequency
        );
        assert_eq!(s.time_scale, 1.0);
    }

    #[test]
    fn test_invalid_canvas_rejected() {
        let err = AnimationSettings::from_json_str(r#"{ "canvasWidth": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidCanvas { .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = AnimationSettings::from_json_str("{ type: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_field() {
        let mut s = AnimationSettings::new(FieldType::Flocking, 640.0, 480.0);
        s.mouse = Some(DVec2::new(10.0, 20.0));
        let json = s.to_json().unwrap();
        assert!(json.contains("\"flocking\""));
        let back = AnimationSettings::from_json_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_denormalize() {
        let s = AnimationSettings::new(FieldType::None, 800.0, 600.0);
        assert_eq!(s.denormalize(DVec2::new(0.5, 0.25)), DVec2::new(400.0, 150.0));
        assert_eq!(s.normalize(DVec2::new(400.0, 150.0)), DVec2::new(0.5, 0.25));
        assert_eq!(s.half_diagonal(), 500.0);
    }
}
