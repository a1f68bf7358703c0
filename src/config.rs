//! Configuration file support for planview.
//!
//! This module provides serialization and deserialization of application settings:
//! log verbosity, the progress simulation timing, and the upload picker hints.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ACCEPTED_EXTENSIONS, MAX_FILE_SIZE_MB, PROGRESS_INTERVAL_MS, PROGRESS_MAX, PROGRESS_STEP,
    REDIRECT_DELAY_MS,
};
use crate::model::PickerHints;
use crate::progress::ProgressTiming;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Simulated analysis timing
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Picker hints and their enforcement
    #[serde(default)]
    pub upload: UploadConfig,
}

fn default_app_name() -> String {
    "planview".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Progress simulation section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Milliseconds between ticks
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Percent added per tick, 1..=100
    #[serde(default = "default_step")]
    pub step: u8,

    /// Milliseconds to wait at 100% before handing off
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

fn default_interval_ms() -> u64 {
    PROGRESS_INTERVAL_MS
}

fn default_step() -> u8 {
    PROGRESS_STEP
}

fn default_redirect_delay_ms() -> u64 {
    REDIRECT_DELAY_MS
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            step: default_step(),
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

impl ProgressConfig {
    pub fn timing(&self) -> ProgressTiming {
        ProgressTiming::new(
            Duration::from_millis(self.interval_ms),
            self.step,
            Duration::from_millis(self.redirect_delay_ms),
        )
    }
}

/// Upload section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Extensions advertised to the picker (without dot)
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,

    /// Advertised size limit in megabytes
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Reject files outside the hints instead of treating them as advice
    #[serde(default)]
    pub enforce_limits: bool,
}

fn default_accepted_extensions() -> Vec<String> {
    ACCEPTED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_max_file_size_mb() -> u64 {
    MAX_FILE_SIZE_MB
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: default_accepted_extensions(),
            max_file_size_mb: default_max_file_size_mb(),
            enforce_limits: false,
        }
    }
}

impl UploadConfig {
    pub fn hints(&self) -> PickerHints {
        PickerHints {
            accepted_extensions: self
                .accepted_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            max_file_size_mb: self.max_file_size_mb,
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            progress: ProgressConfig::default(),
            upload: UploadConfig::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.progress.step == 0 || self.progress.step > PROGRESS_MAX {
            return Err(ConfigError::InvalidValue {
                field: "progress.step",
                message: format!("must be between 1 and {}", PROGRESS_MAX),
            });
        }
        if self.progress.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "progress.interval_ms",
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "planview-config.json"
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("planview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("planview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a specific file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load configuration from `path` if the file exists.
    ///
    /// A missing file is `Ok(None)`; a file that exists but can't be read or
    /// parsed is an error.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_if_exists(path: &std::path::Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Ok(None);
        }
        Self::load_from_path(path).map(Some)
    }

    /// Load configuration from the default path, if there is one.
    ///
    /// Runs before logging is set up, so callers report the error themselves.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Result<Option<Self>, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_if_exists(&path),
            None => Ok(None),
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// LocalStorage key for WASM config persistence.
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "planview-config";

    /// Try to load configuration from localStorage (WASM only).
    /// Returns None if not found or can't be parsed.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;

        match storage.get_item(Self::LOCALSTORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from localStorage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config from localStorage: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No config found in localStorage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read from localStorage: {:?}", e);
                None
            }
        }
    }

    /// Save configuration to localStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let window = web_sys::window()
            .ok_or_else(|| ConfigError::StorageError("No window object available".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| ConfigError::StorageError(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| ConfigError::StorageError("localStorage not available".to_string()))?;

        let json = self.to_json()?;

        storage
            .set_item(Self::LOCALSTORAGE_KEY, &json)
            .map_err(|e| {
                ConfigError::StorageError(format!("Failed to save to localStorage: {:?}", e))
            })?;

        log::info!("Saved configuration to localStorage");
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A value is out of range
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    StorageError(String),
}
