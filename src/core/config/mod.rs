//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Tabularium is configured from a single settings file plus environment
//! overrides. Missing files are not an error; defaults apply.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Settings file
//! 3. `$TABULARIUM_ROOT` (storage root only)
//!
//! # Settings File Locations
//!
//! Searched in order:
//! 1. `$TABULARIUM_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/tabularium/config.toml`
//! 3. `~/.tabularium/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use tabularium::core::config::Settings;
//!
//! let settings = Settings::load().unwrap();
//! println!("root: {}", settings.root().display());
//! println!("max editable: {} bytes", settings.max_editable_bytes());
//! ```

pub mod schema;

pub use schema::SettingsFile;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default largest file size the resolver will hand out for editing.
pub const DEFAULT_MAX_EDITABLE_BYTES: u64 = 10 * 1024 * 1024;

/// Default installation root when nothing else is configured.
pub const DEFAULT_ROOT: &str = "/opt/tabularium";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration with defaults applied.
///
/// Accessor methods apply precedence rules automatically.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Parsed settings file (defaults when no file was found).
    pub file: SettingsFile,
    /// Path to the settings file (if one was loaded).
    file_path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read,
    /// parsed, or validated. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_settings_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let file: SettingsFile =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        file.validate()?;

        Ok(Self {
            file,
            file_path: Some(path.to_path_buf()),
        })
    }

    /// Build settings directly from a parsed file (used by embedders and
    /// tests that do not touch the filesystem).
    ///
    /// # Errors
    ///
    /// Returns an error if the values do not validate.
    pub fn from_file(file: SettingsFile) -> Result<Self, ConfigError> {
        file.validate()?;
        Ok(Self {
            file,
            file_path: None,
        })
    }

    /// Locate the settings file, if any.
    fn find_settings_file() -> Option<PathBuf> {
        // 1. $TABULARIUM_CONFIG
        if let Ok(path) = std::env::var("TABULARIUM_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. $XDG_CONFIG_HOME/tabularium/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("tabularium/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ~/.tabularium/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".tabularium/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Path the settings were loaded from, if a file was found.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// The storage root, with `$TABULARIUM_ROOT` taking precedence over
    /// the settings file.
    pub fn root(&self) -> PathBuf {
        if let Ok(root) = std::env::var("TABULARIUM_ROOT") {
            if !root.is_empty() {
                return PathBuf::from(root);
            }
        }
        self.file
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT))
    }

    /// Largest file size the resolver will hand out for editing.
    pub fn max_editable_bytes(&self) -> u64 {
        self.file
            .max_editable_bytes
            .unwrap_or(DEFAULT_MAX_EDITABLE_BYTES)
    }

    /// Whether a versioned resolution whose snapshot file is missing may
    /// fall back to the default template.
    pub fn backup_default_fallback(&self) -> bool {
        self.file.backup_default_fallback.unwrap_or(true)
    }
}
