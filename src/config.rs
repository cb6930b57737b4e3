//! Startup configuration.
//!
//! Every value has a built-in default, so the program runs without any file.
//! A TOML file passed as the first command line argument overrides whichever
//! keys it names:
//!
//! ```toml
//! [window]
//! font_size = 20.0
//!
//! [rumble]
//! enabled = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::controller::rumble::{VibrationSettings, DEFAULT_REPEAT_INTERVAL_TICKS};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct QuicktestConfig {
    pub window: WindowConfig,
    pub timing: TimingConfig,
    pub rumble: RumbleConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Font size in points, before display scaling
    pub font_size: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "gamepad-quicktest".to_string(),
            width: 640.0,
            height: 480.0,
            font_size: 16.0,
        }
    }
}

/// Update tick rate. Repeat and lockout timings are counted in these ticks.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub ticks_per_second: u32,
    /// Most ticks run in one frame after a stall
    pub max_catch_up_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
            max_catch_up_ticks: 4,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RumbleConfig {
    pub enabled: bool,
    pub repeat_interval_ticks: u64,
    pub initial_duration_ms: u32,
    pub initial_low_frequency: u8,
    pub initial_high_frequency: u8,
}

impl Default for RumbleConfig {
    fn default() -> Self {
        let settings = VibrationSettings::default();
        Self {
            enabled: true,
            repeat_interval_ticks: DEFAULT_REPEAT_INTERVAL_TICKS,
            initial_duration_ms: settings.duration_ms(),
            initial_low_frequency: settings.low_frequency(),
            initial_high_frequency: settings.high_frequency(),
        }
    }
}

impl RumbleConfig {
    pub fn initial_settings(&self) -> Result<VibrationSettings, ConfigError> {
        VibrationSettings::new(
            self.initial_duration_ms,
            self.initial_low_frequency,
            self.initial_high_frequency,
        )
        .ok_or_else(|| {
            ConfigError::Invalid(format!(
                "rumble settings out of range: duration {}ms (0..=8000, steps of 100), \
                 low {}% and high {}% (0..=100, steps of 5)",
                self.initial_duration_ms, self.initial_low_frequency, self.initial_high_frequency
            ))
        })
    }
}

impl QuicktestConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: QuicktestConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.window;
        if !(window.width > 0.0 && window.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {}x{}",
                window.width, window.height
            )));
        }
        if !(window.font_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "font size must be positive, got {}",
                window.font_size
            )));
        }
        if self.timing.ticks_per_second == 0 {
            return Err(ConfigError::Invalid(
                "ticks_per_second must be greater than zero".to_string(),
            ));
        }
        if self.rumble.repeat_interval_ticks == 0 {
            return Err(ConfigError::Invalid(
                "repeat_interval_ticks must be greater than zero".to_string(),
            ));
        }
        self.rumble.initial_settings()?;
        Ok(())
    }
}
