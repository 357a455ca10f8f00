//! Skydrop Settings
//!
//! Application configuration for the distribution pipeline.
//!
//! ## Features
//!
//! - Token parameters (symbol, decimals)
//! - Fetch tuning (page size, retries, timeouts, checkpoint cadence)
//! - Build policy (duplicate handling, validation strictness)
//! - JSON serialization with per-field defaults
//!
//! ## Usage
//!
//! ```no_run
//! use skydrop_settings::Settings;
//!
//! // Load or create default settings
//! let mut settings = Settings::load_or_default()?;
//!
//! // Modify settings
//! settings.token.decimals = 6;
//!
//! // Save settings
//! settings.save()?;
//! # Ok::<(), skydrop_settings::SettingsError>(())
//! ```

mod config;

pub use config::{BuildSettings, FetchSettings, Settings, TokenSettings};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    ReadError(std::io::Error),

    #[error("Failed to write settings: {0}")]
    WriteError(std::io::Error),

    #[error("Failed to parse settings: {0}")]
    ParseError(serde_json::Error),

    #[error("Failed to create config directory: {0}")]
    CreateDirError(std::io::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Get the default config directory (`~/.skydrop`)
pub fn default_config_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".skydrop")
}

/// Get the default settings file path
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}
