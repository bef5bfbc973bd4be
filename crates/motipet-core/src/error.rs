//! Core error types for motipet-core.
//!
//! Each subsystem has its own `thiserror` enum; [`CoreError`] wraps them for
//! callers that do not care which layer failed.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for motipet-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Sprite-sheet errors
    #[error("Sprite error: {0}")]
    Sprite(#[from] SpriteError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Daily-state API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sprite-sheet loading and lookup errors.
#[derive(Error, Debug)]
pub enum SpriteError {
    /// The metadata file could not be read
    #[error("Failed to read sprite sheet at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata is not valid Aseprite JSON
    #[error("Malformed sprite sheet: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The sheet declares a zero-sized texture
    #[error("Sprite sheet has an empty texture size ({w}x{h})")]
    EmptySheet { w: u32, h: u32 },

    /// No frame tag with this name
    #[error("Unknown frame tag: {0}")]
    UnknownTag(String),

    /// The tag exists but none of its frames do
    #[error("Frame tag '{tag}' resolves to no frames")]
    EmptyClip { tag: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The config directory could not be resolved or created
    #[error("Could not prepare config directory: {0}")]
    DataDir(String),
}

/// Daily-state endpoint errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No base URL configured
    #[error("API base URL is not configured")]
    BaseUrlNotConfigured,

    /// Base URL could not be parsed or joined
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned HTTP {status_code}")]
    ServerError { status_code: u16 },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// A range whose lower bound exceeds its upper bound
    #[error("Invalid range for '{field}': {min} > {max}")]
    InvalidRange { field: String, min: u64, max: u64 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_message_includes_status() {
        let err = CoreError::from(ApiError::ServerError { status_code: 503 });
        assert_eq!(err.to_string(), "API error: Server returned HTTP 503");
    }

    #[test]
    fn validation_range_message() {
        let err = ValidationError::InvalidRange {
            field: "ambient.min_delay_ms".into(),
            min: 10,
            max: 5,
        };
        assert!(err.to_string().contains("10 > 5"));
    }
}
