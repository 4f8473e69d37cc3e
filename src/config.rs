use serde::{Deserialize, Serialize};
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::version::parse_version;
use crate::error::{Result, SemrelError};

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "semrel.toml";

/// Represents the complete configuration for git-semrel.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub check: CheckConfig,
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_base_version() -> String {
    "0.0.0".to_string()
}

fn default_from() -> String {
    "HEAD".to_string()
}

/// Release tag naming and the version used before any release exists.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default = "default_base_version")]
    pub base_version: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            tag_prefix: default_tag_prefix(),
            base_version: default_base_version(),
        }
    }
}

impl ReleaseConfig {
    /// The base version as a SemVer value
    pub fn base_version(&self) -> Result<Version> {
        parse_version(&self.base_version)
    }
}

/// Options of the history compliance check.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CheckConfig {
    #[serde(default = "default_from")]
    pub from: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            from: default_from(),
        }
    }
}

impl Config {
    /// Parse a configuration document and validate its values
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| SemrelError::config(e.to_string()))?;
        config.release.base_version()?;
        Ok(config)
    }
}

/// Locate the configuration file.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `semrel.toml` in the current directory
/// 3. `semrel.toml` in the user config directory
pub fn find_config_file(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or if an explicit
///   path does not exist
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match find_config_file(config_path) {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                SemrelError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&content)
        }
        None => Ok(Config::default()),
    }
}
