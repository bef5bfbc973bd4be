mod config;

pub use config::{AmbientConfig, ApiConfig, Config, GestureConfig, SceneConfig, SpriteConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/motipet[-dev]/` based on MOTIPET_ENV.
///
/// Set MOTIPET_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MOTIPET_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("motipet-dev")
    } else {
        base_dir.join("motipet")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
