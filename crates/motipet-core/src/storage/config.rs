//! TOML-based application configuration.
//!
//! Holds tuning only:
//! - Gesture timing windows
//! - Ambient scheduler delays and branch weights
//! - Scene ground rectangle and pet scale
//! - Sprite-sheet location and frame timing
//! - Daily-state endpoint settings
//!
//! Configuration is stored at `~/.config/motipet/config.toml`. Pet state is
//! never written here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::geometry::Rect;

/// Touch classification windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_long_press_threshold_ms")]
    pub long_press_threshold_ms: u64,
    #[serde(default = "default_multi_tap_window_ms")]
    pub multi_tap_window_ms: u64,
    /// Touches at or above this fraction of the pet height (from its center) hit the head.
    #[serde(default = "default_head_boundary_ratio")]
    pub head_boundary_ratio: f64,
}

/// Idle loop timing and branch weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientConfig {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_wait_weight")]
    pub wait_weight: f64,
    #[serde(default = "default_idle_animation_weight")]
    pub idle_animation_weight: f64,
    #[serde(default = "default_patrol_weight")]
    pub patrol_weight: f64,
    /// Patrol speed as a fraction of the scene width per second.
    #[serde(default = "default_patrol_speed_ratio")]
    pub patrol_speed_ratio: f64,
    /// Fixed seed for a reproducible idle loop.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Scene layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Ground area in 0..1 fractions of the scene, y from the bottom.
    #[serde(default = "default_ground")]
    pub ground: Rect,
    #[serde(default = "default_pet_scale")]
    pub pet_scale: f64,
    #[serde(default = "default_background")]
    pub background: String,
}

/// Sprite-sheet settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Path to the Aseprite JSON export.
    #[serde(default)]
    pub sheet_path: Option<String>,
    #[serde(default = "default_min_frame_ms")]
    pub min_frame_ms: u64,
    /// Per-tag time-per-frame overrides in seconds, keyed by lower-cased tag.
    #[serde(default = "default_frame_overrides")]
    pub frame_overrides: BTreeMap<String, f64>,
}

/// Daily-state endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: Option<String>,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_gender")]
    pub gender: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/motipet/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub ambient: AmbientConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub sprite: SpriteConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

// Default functions
fn default_long_press_threshold_ms() -> u64 {
    350
}
fn default_multi_tap_window_ms() -> u64 {
    300
}
fn default_head_boundary_ratio() -> f64 {
    0.1
}
fn default_min_delay_ms() -> u64 {
    30_000
}
fn default_max_delay_ms() -> u64 {
    60_000
}
fn default_wait_weight() -> f64 {
    0.25
}
fn default_idle_animation_weight() -> f64 {
    0.5
}
fn default_patrol_weight() -> f64 {
    0.25
}
fn default_patrol_speed_ratio() -> f64 {
    0.12
}
fn default_ground() -> Rect {
    Rect::new(0.0, 0.05, 1.0, 0.26)
}
fn default_pet_scale() -> f64 {
    0.6
}
fn default_background() -> String {
    "RoomBackground".into()
}
fn default_min_frame_ms() -> u64 {
    50
}
fn default_frame_overrides() -> BTreeMap<String, f64> {
    [
        ("sleep", 0.28),
        ("lookleft", 0.18),
        ("lookright", 0.18),
        ("petjaw", 0.45),
        ("chasetail", 0.20),
        ("turn", 0.16),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}
fn default_base_url() -> Option<String> {
    Some("http://127.0.0.1:8000".into())
}
fn default_user_id() -> String {
    "demo_user".into()
}
fn default_gender() -> Option<String> {
    Some("male".into())
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_threshold_ms: default_long_press_threshold_ms(),
            multi_tap_window_ms: default_multi_tap_window_ms(),
            head_boundary_ratio: default_head_boundary_ratio(),
        }
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            wait_weight: default_wait_weight(),
            idle_animation_weight: default_idle_animation_weight(),
            patrol_weight: default_patrol_weight(),
            patrol_speed_ratio: default_patrol_speed_ratio(),
            seed: None,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground: default_ground(),
            pet_scale: default_pet_scale(),
            background: default_background(),
        }
    }
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            sheet_path: None,
            min_frame_ms: default_min_frame_ms(),
            frame_overrides: default_frame_overrides(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: default_user_id(),
            gender: default_gender(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => parse_number(value)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Unset optionals take whatever the literal looks like.
                    serde_json::Value::Null => {
                        if value == "none" || value.is_empty() {
                            serde_json::Value::Null
                        } else if let Some(n) = parse_number(value) {
                            n
                        } else {
                            serde_json::Value::String(value.into())
                        }
                    }
                    serde_json::Value::String(_) => {
                        if value == "none" {
                            serde_json::Value::Null
                        } else {
                            serde_json::Value::String(value.into())
                        }
                    }
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                cfg.validate().map_err(|e| load_failed(e.to_string()))?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the resulting config does not validate.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let a = &self.ambient;
        if a.min_delay_ms > a.max_delay_ms {
            return Err(ValidationError::InvalidRange {
                field: "ambient.min_delay_ms".into(),
                min: a.min_delay_ms,
                max: a.max_delay_ms,
            });
        }
        let weights = [a.wait_weight, a.idle_animation_weight, a.patrol_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0
        {
            return Err(ValidationError::InvalidValue {
                field: "ambient".into(),
                message: "branch weights must be non-negative with a positive sum".into(),
            });
        }
        let ratio = self.gesture.head_boundary_ratio;
        if !(-0.5..=0.5).contains(&ratio) {
            return Err(ValidationError::InvalidValue {
                field: "gesture.head_boundary_ratio".into(),
                message: format!("{ratio} is outside -0.5..=0.5"),
            });
        }
        let speed = a.patrol_speed_ratio;
        if !speed.is_finite() || speed < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "ambient.patrol_speed_ratio".into(),
                message: format!("{speed} is not a finite non-negative number"),
            });
        }
        let scale = self.scene.pet_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "scene.pet_scale".into(),
                message: format!("{scale} is not a finite positive number"),
            });
        }
        let g = &self.scene.ground;
        if [g.x, g.y, g.width, g.height].iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidValue {
                field: "scene.ground".into(),
                message: "all fields must be finite".into(),
            });
        }
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else if let Ok(n) = value.parse::<f64>() {
        serde_json::Number::from_f64(n).map(serde_json::Value::Number)
    } else {
        None
    }
}
