use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::presentation::{Easing, Rgba};

pub const DEFAULT_BAR_INTERVAL: f32 = 0.3;
pub const MIN_BAR_INTERVAL: f32 = 0.1;
pub const MAX_BAR_INTERVAL: f32 = 1.0;
pub const DEFAULT_TEXT_SECS: f32 = 2.0;

/// Numeric setup for one health instance plus its presentation bindings.
///
/// Every value is clamped into range by the consumer; loading never rejects
/// a config for holding out-of-range numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    pub max_health: f32,
    #[serde(default)]
    pub starting_health: Option<f32>,
    /// Seconds of invulnerability after a hit. `0` disables the cooldown.
    #[serde(default)]
    pub cooldown: f32,
    #[serde(default)]
    pub bar: BarConfig,
    #[serde(default)]
    pub floating_text: FloatingTextConfig,
}

impl HealthConfig {
    pub fn new(max_health: f32) -> Self {
        Self {
            max_health,
            ..Default::default()
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            starting_health: None,
            cooldown: 0.0,
            bar: BarConfig::default(),
            floating_text: FloatingTextConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_bar_interval")]
    pub interval: f32,
    #[serde(default)]
    pub easing: Easing,
}

impl BarConfig {
    pub fn clamped_interval(&self) -> f32 {
        if self.interval.is_nan() {
            return DEFAULT_BAR_INTERVAL;
        }
        self.interval.clamp(MIN_BAR_INTERVAL, MAX_BAR_INTERVAL)
    }
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_BAR_INTERVAL,
            easing: Easing::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingTextConfig {
    #[serde(default = "default_text_secs")]
    pub display_secs: f32,
    #[serde(default = "Rgba::heal")]
    pub heal_color: Rgba,
    #[serde(default = "Rgba::damage")]
    pub damage_color: Rgba,
}

impl Default for FloatingTextConfig {
    fn default() -> Self {
        Self {
            display_secs: DEFAULT_TEXT_SECS,
            heal_color: Rgba::heal(),
            damage_color: Rgba::damage(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_bar_interval() -> f32 {
    DEFAULT_BAR_INTERVAL
}

fn default_text_secs() -> f32 {
    DEFAULT_TEXT_SECS
}
