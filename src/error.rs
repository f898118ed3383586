//! Error types for vecflow.
//!
//! Only malformed external input is reported as an error. Degenerate math
//! inside the animation hot path (zero distances, non-finite intermediates)
//! is recovered locally and never surfaces here.

use std::fmt;

/// Errors raised by color parsing and interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The string is not a 24-bit hex color (`#rrggbb` or `#rgb`).
    InvalidHex(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidHex(s) => write!(
                f,
                "Invalid hex color '{}': expected '#rrggbb' or '#rgb'",
                s
            ),
        }
    }
}

impl std::error::Error for ColorError {}

/// Errors that can occur while loading animation settings.
#[derive(Debug)]
pub enum SettingsError {
    /// Failed to read the settings file from disk.
    Io(std::io::Error),
    /// The settings document is not valid JSON for [`AnimationSettings`](crate::AnimationSettings).
    Parse(serde_json::Error),
    /// Canvas dimensions must be positive and finite.
    InvalidCanvas { width: f64, height: f64 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Failed to read settings file: {}", e),
            SettingsError::Parse(e) => write!(f, "Failed to parse settings: {}", e),
            SettingsError::InvalidCanvas { width, height } => write!(
                f,
                "Canvas dimensions must be positive, got {}x{}",
                width, height
            ),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::InvalidCanvas { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}
