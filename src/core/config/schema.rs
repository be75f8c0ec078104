//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Settings File
//!
//! Located at (in order of precedence):
//! 1. `$TABULARIUM_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/tabularium/config.toml`
//! 3. `~/.tabularium/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Values are validated after parsing; a settings file that parses but
//! carries an unusable value fails loading rather than surfacing later
//! inside a resolution.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// On-disk settings file.
///
/// All fields are optional; [`Settings`] applies defaults.
///
/// # Example
///
/// ```toml
/// root = "/opt/tabularium"
/// max_editable_bytes = 10485760
/// backup_default_fallback = true
/// ```
///
/// [`Settings`]: super::Settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Installation root all storage locations hang off.
    pub root: Option<PathBuf>,

    /// Largest file size the resolver will hand out for editing.
    pub max_editable_bytes: Option<u64>,

    /// Whether a versioned resolution whose snapshot file is missing may
    /// fall back to the default template.
    pub backup_default_fallback: Option<bool>,
}

impl SettingsFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(max) = self.max_editable_bytes {
            if max == 0 {
                return Err(ConfigError::InvalidValue(
                    "max_editable_bytes must be greater than zero".to_string(),
                ));
            }
        }

        if let Some(root) = &self.root {
            if root.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "root cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_file_validates() {
        assert!(SettingsFile::default().validate().is_ok());
    }

    #[test]
    fn zero_max_size_rejected() {
        let file = SettingsFile {
            max_editable_bytes: Some(0),
            ..Default::default()
        };
        assert!(file.validate().is_err());
    }

    #[test]
    fn empty_root_rejected() {
        let file = SettingsFile {
            root: Some(PathBuf::new()),
            ..Default::default()
        };
        assert!(file.validate().is_err());
    }

    #[test]
    fn parses_full_file() {
        let file: SettingsFile = toml::from_str(
            r#"
            root = "/srv/tabularium"
            max_editable_bytes = 1048576
            backup_default_fallback = false
            "#,
        )
        .unwrap();
        assert_eq!(file.root, Some(PathBuf::from("/srv/tabularium")));
        assert_eq!(file.max_editable_bytes, Some(1048576));
        assert_eq!(file.backup_default_fallback, Some(false));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<SettingsFile, _> = toml::from_str("unknown_key = true");
        assert!(result.is_err());
    }
}
