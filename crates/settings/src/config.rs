//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use skydrop_merkle::DedupPolicy;

use crate::{default_settings_path, Result, SettingsError};

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Token parameters
    #[serde(default)]
    pub token: TokenSettings,

    /// Fetch tuning for network sources
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Commitment build policy
    #[serde(default)]
    pub build: BuildSettings,

    /// Custom settings file path (not serialized)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: TokenSettings::default(),
            fetch: FetchSettings::default(),
            build: BuildSettings::default(),
            config_path: None,
        }
    }
}

impl Settings {
    /// Load settings from the default path, or create defaults
    pub fn load_or_default() -> Result<Self> {
        Self::load_from(&default_settings_path())
    }

    /// Load settings from a specific path, or create defaults
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(SettingsError::ReadError)?;
            let mut settings: Settings =
                serde_json::from_str(&content).map_err(SettingsError::ParseError)?;
            settings.config_path = Some(path.clone());
            info!("Loaded settings from {:?}", path);
            Ok(settings)
        } else {
            let mut settings = Self::default();
            settings.config_path = Some(path.clone());
            Ok(settings)
        }
    }

    /// Save settings to the configured path
    pub fn save(&self) -> Result<()> {
        let path = self.config_path.clone().unwrap_or_else(default_settings_path);
        self.save_to(&path)
    }

    /// Save settings to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(SettingsError::CreateDirError)?;
            }
        }

        let content = serde_json::to_string_pretty(self).map_err(SettingsError::ParseError)?;
        std::fs::write(path, content).map_err(SettingsError::WriteError)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Token parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Token symbol (display only)
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Decimals used to scale human amounts to base units
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_symbol() -> String {
    "SKY".to_string()
}

fn default_decimals() -> u32 {
    18
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimals: default_decimals(),
        }
    }
}

/// Fetch tuning for paginated network sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Attempts per page before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Checkpoint frequency in pages
    #[serde(default = "default_checkpoint_pages")]
    pub checkpoint_every_pages: u32,
}

fn default_page_size() -> usize {
    1000
}

fn default_max_attempts() -> u32 {
    5
}

fn default_timeout() -> u64 {
    30
}

fn default_checkpoint_pages() -> u32 {
    10
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_attempts: default_max_attempts(),
            request_timeout_secs: default_timeout(),
            checkpoint_every_pages: default_checkpoint_pages(),
        }
    }
}

/// Commitment build policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Duplicate-address handling
    #[serde(default)]
    pub dedup_policy: DedupPolicy,

    /// Fail the whole ingest on a malformed source row instead of skipping
    #[serde(default)]
    pub strict_validation: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            dedup_policy: DedupPolicy::default(),
            strict_validation: false,
        }
    }
}
