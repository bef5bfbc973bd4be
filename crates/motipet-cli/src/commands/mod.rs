pub mod ambient;
pub mod companion;
pub mod config;
pub mod level;
pub mod reading;
pub mod readiness;
pub mod sheet;
pub mod sync;
pub mod touch;

use motipet_core::{AnimationLibrary, Config};
use std::path::Path;

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load the configured sprite sheet, or the static fallback when none is set.
pub fn load_library(config: &Config) -> AnimationLibrary {
    match &config.sprite.sheet_path {
        Some(path) => AnimationLibrary::load_or_static(Path::new(path), &config.sprite),
        None => AnimationLibrary::degraded(&config.sprite),
    }
}
