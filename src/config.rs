//! Application configuration.
//!
//! The engine constants (weight tables, zone cutoffs, status bands) are
//! fixed by the competition rules and not configurable; the file only
//! covers operational settings: logging and the rolling-window lengths.

use crate::error::{FitrankError, Result};
use crate::load::LoadConfig;
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration, stored as TOML
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FitrankConfig {
    /// Logging defaults; `-v` flags on the CLI override the level
    #[serde(default)]
    pub log: LogConfig,

    /// Acute/chronic/trend window lengths
    #[serde(default)]
    pub load: LoadConfig,
}

impl FitrankConfig {
    /// Default config file location: `<config dir>/fitrank/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fitrank")
            .join("config.toml")
    }

    /// Load from the given path, or the default path when `None`.
    /// A missing file is not an error; defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        let config: FitrankConfig =
            toml::from_str(&raw).map_err(|e| FitrankError::configuration(&path, e))?;
        config.validate(&path)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Write the configuration to the given path, creating parent
    /// directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| FitrankError::configuration(path, e))?;
        fs::write(path, raw)?;
        Ok(())
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.load.acute_days == 0 || self.load.chronic_days == 0 {
            return Err(FitrankError::configuration(
                path,
                "window lengths must be at least 1 day",
            ));
        }
        if self.load.acute_days > self.load.chronic_days {
            return Err(FitrankError::configuration(
                path,
                "acute window cannot be longer than the chronic window",
            ));
        }
        Ok(())
    }
}
