//! Game configuration
//!
//! Device-class tuning is resolved once when a session is built; the
//! simulation only ever reads the resulting `Config`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Environment variable pointing at a JSON config override (native only)
pub const CONFIG_ENV_VAR: &str = "FLAPPY_GROVE_CONFIG";

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Host device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "Desktop",
            DeviceClass::Mobile => "Mobile",
        }
    }
}

/// How the per-tick delta is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimestepMode {
    /// Every tick counts as exactly one reference frame
    #[default]
    Fixed,
    /// Wall-clock time between ticks divided by the reference frame duration
    Normalized,
}

/// Resolved game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device_class: DeviceClass,

    // === Timestep ===
    pub timestep: TimestepMode,
    /// Frame rate the per-tick constants assume
    pub reference_fps: f32,
    /// Upper bound on a single delta (None keeps long pauses uncapped)
    pub max_delta: Option<f32>,

    // === Bird ===
    pub gravity: f32,
    pub flap_impulse: f32,
    pub bird_width: f32,
    pub bird_height: f32,
    pub bird_x_fraction: f32,

    // === Pipes ===
    pub pipe_width: f32,
    pub pipe_speed: f32,
    pub pipe_gap_fraction: f32,
    pub pipe_gap_max: f32,
    pub spawn_interval_ticks: u32,
    pub spawn_margin: f32,

    // === Ground ===
    pub ground_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_class: DeviceClass::Desktop,

            timestep: TimestepMode::Fixed,
            reference_fps: REFERENCE_FPS,
            max_delta: None,

            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            bird_width: BIRD_WIDTH,
            bird_height: BIRD_HEIGHT,
            bird_x_fraction: BIRD_X_FRACTION,

            pipe_width: PIPE_WIDTH,
            pipe_speed: PIPE_SPEED,
            pipe_gap_fraction: PIPE_GAP_FRACTION,
            pipe_gap_max: PIPE_GAP_MAX,
            spawn_interval_ticks: SPAWN_INTERVAL_TICKS,
            spawn_margin: SPAWN_MARGIN,

            ground_height: GROUND_HEIGHT,
        }
    }
}

impl Config {
    /// Preset for a device class
    ///
    /// Mobile browsers deliver frames at whatever rate the display runs, so
    /// motion is scaled by wall-clock time instead of assuming 60 Hz.
    pub fn for_device(device_class: DeviceClass) -> Self {
        match device_class {
            DeviceClass::Desktop => Self::default(),
            DeviceClass::Mobile => Self {
                device_class,
                timestep: TimestepMode::Normalized,
                ..Self::default()
            },
        }
    }

    /// Parse a JSON override; missing fields fall back to desktop defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::default().with_overrides(json)
    }

    /// Apply a JSON object of overrides on top of this config
    ///
    /// Only the fields present in `json` change, so a device preset keeps
    /// its timestep mode unless the override names one.
    pub fn with_overrides(&self, json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(ConfigError::Invalid("config override must be a JSON object"));
        };

        let mut merged = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }

        let config: Config = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON override file on top of the preset for `device_class`
    pub fn load_from_path(
        device_class: DeviceClass,
        path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::for_device(device_class).with_overrides(&json)
    }

    /// Reject tunings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.reference_fps > 0.0) {
            return Err(ConfigError::Invalid("reference_fps must be positive"));
        }
        if let Some(cap) = self.max_delta {
            if !(cap > 0.0) {
                return Err(ConfigError::Invalid("max_delta must be positive"));
            }
        }
        if self.gravity < 0.0 {
            return Err(ConfigError::Invalid("gravity must not be negative"));
        }
        if self.flap_impulse >= 0.0 {
            return Err(ConfigError::Invalid("flap_impulse must point upward (negative)"));
        }
        if !(self.bird_width > 0.0 && self.bird_height > 0.0) {
            return Err(ConfigError::Invalid("bird size must be positive"));
        }
        if !(0.0..1.0).contains(&self.bird_x_fraction) {
            return Err(ConfigError::Invalid("bird_x_fraction must be in [0, 1)"));
        }
        if !(self.pipe_width > 0.0 && self.pipe_speed > 0.0) {
            return Err(ConfigError::Invalid("pipe width and speed must be positive"));
        }
        if !(self.pipe_gap_fraction > 0.0 && self.pipe_gap_fraction < 1.0) {
            return Err(ConfigError::Invalid("pipe_gap_fraction must be in (0, 1)"));
        }
        if !(self.pipe_gap_max > self.bird_height) {
            return Err(ConfigError::Invalid("pipe_gap_max must exceed bird height"));
        }
        if self.spawn_interval_ticks == 0 {
            return Err(ConfigError::Invalid("spawn_interval_ticks must be positive"));
        }
        if self.spawn_margin < 0.0 || self.ground_height < 0.0 {
            return Err(ConfigError::Invalid("margins must not be negative"));
        }
        // gap_height only grows with the playfield height
        let room = MIN_PLAYFIELD_HEIGHT - self.ground_height - 2.0 * self.spawn_margin;
        if !(room > self.bird_height) {
            return Err(ConfigError::Invalid(
                "ground and margins leave no room for the bird",
            ));
        }
        if !(self.gap_height(MIN_PLAYFIELD_HEIGHT) > self.bird_height) {
            return Err(ConfigError::Invalid(
                "gap on the smallest playfield must exceed bird height",
            ));
        }
        Ok(())
    }

    /// Duration of one reference frame in milliseconds
    pub fn reference_interval_ms(&self) -> f64 {
        1000.0 / self.reference_fps as f64
    }

    /// Gap height for a playfield of the given height
    ///
    /// Always strictly less than the space between the top margin and the
    /// ground, so every pipe is passable.
    pub fn gap_height(&self, playfield_height: f32) -> f32 {
        let gap = (playfield_height * self.pipe_gap_fraction).min(self.pipe_gap_max);
        let room = playfield_height - self.ground_height - 2.0 * self.spawn_margin;
        gap.min(room * 0.9).max(1.0)
    }

    /// Load config for a device class, applying a stored override (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(device_class: DeviceClass) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::for_device(device_class).with_overrides(&json) {
                    Ok(config) => {
                        log::info!(
                            "Loaded {} config override from LocalStorage",
                            device_class.as_str()
                        );
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using {} config", device_class.as_str());
        Self::for_device(device_class)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flappy_grove_config";

    /// Load config for a device class, applying `FLAPPY_GROVE_CONFIG` if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(device_class: DeviceClass) -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            match Self::load_from_path(device_class, &path) {
                Ok(config) => {
                    log::info!("Loaded {} config from {}", device_class.as_str(), path);
                    return config;
                }
                Err(e) => log::warn!("Ignoring config {}: {}", path, e),
            }
        }

        log::info!("Using {} config", device_class.as_str());
        Self::for_device(device_class)
    }
}
