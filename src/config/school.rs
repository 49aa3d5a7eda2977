//! School configuration loading from config.toml
//!
//! The file names the fallback school name used until one is saved in the
//! settings table, and optionally lists classes to seed on first run.
//!
//! ```toml
//! [school]
//! default_name = "TK Ultra Smart"
//!
//! [[classes]]
//! name = "TK A1"
//! teacher_name = "Siti Aminah"
//! teacher_nip = "19800101"
//! ```

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// School name used when neither the settings table nor config.toml names one
pub const FALLBACK_SCHOOL_NAME: &str = "TK ULTRA SMART";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// School identity defaults
    #[serde(default)]
    pub school: SchoolConfig,
    /// Classes to create when missing
    #[serde(default)]
    pub classes: Vec<ClassSeed>,
}

/// `[school]` table
#[derive(Debug, Deserialize)]
pub struct SchoolConfig {
    /// Display name used before one is saved through the settings command
    #[serde(default = "default_school_name")]
    pub default_name: String,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            default_name: default_school_name(),
        }
    }
}

fn default_school_name() -> String {
    FALLBACK_SCHOOL_NAME.to_string()
}

/// A class to seed, with optional report signatories
#[derive(Debug, Deserialize, Clone)]
pub struct ClassSeed {
    /// Name of the class
    pub name: String,
    /// Class teacher name
    #[serde(default)]
    pub teacher_name: String,
    /// Class teacher NIP
    #[serde(default)]
    pub teacher_nip: String,
    /// Headmaster name
    #[serde(default)]
    pub headmaster_name: String,
    /// Headmaster NIP
    #[serde(default)]
    pub headmaster_nip: String,
}

/// Loads school configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses the contents of a config.toml file.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration at `path`, falling back to defaults when the file
/// does not exist. A file that exists but does not parse is still an error.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(Config::default());
    }
    load_config(path)
}

/// Path of the config file from `CONFIG_PATH`, or `./config.toml`
#[must_use]
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_school_config() {
        let toml_str = r#"
            [school]
            default_name = "TK Pelita"

            [[classes]]
            name = "TK A1"
            teacher_name = "Siti"
            teacher_nip = "1980"

            [[classes]]
            name = "TK B1"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.school.default_name, "TK Pelita");
        assert_eq!(config.classes.len(), 2);
        assert_eq!(config.classes[0].teacher_name, "Siti");
        assert!(config.classes[1].headmaster_name.is_empty());
    }

    #[test]
    fn test_empty_config_uses_fallback_name() {
        let config = parse_config("").unwrap();
        assert_eq!(config.school.default_name, FALLBACK_SCHOOL_NAME);
        assert!(config.classes.is_empty());
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let result = parse_config("[school\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config_or_default("definitely/not/here/config.toml").unwrap();
        assert_eq!(config.school.default_name, FALLBACK_SCHOOL_NAME);
    }
}
