//! Pipeline configuration
//!
//! Every section has defaults, so a JSON document only needs the keys it
//! changes. Configuration is validated on load; invalid values are rejected
//! here rather than during event processing.

use crate::error::{GestureError, GestureResult};
use crate::filter::DEFAULT_DEAD_ZONE;
use crate::gesture::CursorBounds;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default window for consecutive taps, in milliseconds
pub const DEFAULT_CONSECUTIVE_TAP_TIMEOUT_MS: u64 = 500;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureConfig {
    pub dispatch: DispatchConfig,
    pub bounding_box: BoundingBoxConfig,
    pub spring: SpringConfig,
    pub drag: CursorBounds,
    pub pinch: CursorBounds,
    pub tap: TapConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchConfig::default(),
            bounding_box: BoundingBoxConfig::default(),
            spring: SpringConfig::default(),
            drag: CursorBounds::at_least(1),
            pinch: CursorBounds::at_least(2),
            tap: TapConfig::default(),
        }
    }
}

impl GestureConfig {
    /// Parse and validate a configuration document.
    pub fn from_json_str(json: &str) -> GestureResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> GestureResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::info!("Loaded gesture configuration from {:?}", path);
        Ok(config)
    }

    /// Check every section, returning the first error found.
    pub fn validate(&self) -> GestureResult<()> {
        self.dispatch.validate()?;
        if self.bounding_box.dead_zone <= 0 {
            return Err(GestureError::InvalidDeadZone(self.bounding_box.dead_zone));
        }
        self.spring.validate()?;
        self.drag.validate()?;
        self.pinch.validate()?;
        self.tap.validate()?;
        Ok(())
    }
}

impl Default for CursorBounds {
    fn default() -> Self {
        CursorBounds::at_least(1)
    }
}

/// Cursor-to-target dispatch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DispatchConfig {
    /// Assign cursors that hit no target to a whole-surface target
    pub fallback_to_screen: bool,
    pub screen_width: i32,
    pub screen_height: i32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            fallback_to_screen: false,
            screen_width: 1920,
            screen_height: 1080,
        }
    }
}

impl DispatchConfig {
    fn validate(&self) -> GestureResult<()> {
        if self.screen_width <= 0 || self.screen_height <= 0 {
            return Err(GestureError::Configuration(format!(
                "screen size must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        Ok(())
    }
}

/// Dead-zone filter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoundingBoxConfig {
    pub dead_zone: i32,
}

impl Default for BoundingBoxConfig {
    fn default() -> Self {
        Self {
            dead_zone: DEFAULT_DEAD_ZONE,
        }
    }
}

/// Spring smoothing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Jumps longer than this (surface units) reset the spring
    pub teleport_threshold: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 470.0,
            damping: 70.0,
            mass: 3.0,
            teleport_threshold: 500.0,
        }
    }
}

impl SpringConfig {
    /// Every parameter must be finite and positive.
    pub fn validate(&self) -> GestureResult<()> {
        let fields = [
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("mass", self.mass),
            ("teleportThreshold", self.teleport_threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(GestureError::InvalidSpring(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Tap recognizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TapConfig {
    pub bounds: CursorBounds,
    pub consecutive_tap_timeout_ms: u64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            bounds: CursorBounds::default(),
            consecutive_tap_timeout_ms: DEFAULT_CONSECUTIVE_TAP_TIMEOUT_MS,
        }
    }
}

impl TapConfig {
    fn validate(&self) -> GestureResult<()> {
        self.bounds.validate()?;
        if self.consecutive_tap_timeout_ms == 0 {
            return Err(GestureError::InvalidTimeout);
        }
        Ok(())
    }
}
