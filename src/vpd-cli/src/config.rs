//! Configuration management for vpd CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// EEPROM or image used when a command is given no input
    pub eeprom: Option<PathBuf>,
    /// Start offset used when a command is given no offset
    pub start_offset: Option<u32>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("vpd");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Pick the input path, falling back to the configured EEPROM
    pub fn resolve_input(&self, input: Option<PathBuf>) -> Result<PathBuf> {
        input.or_else(|| self.eeprom.clone()).context(
            "No input given and no default EEPROM configured (see `vpd configure --eeprom`)",
        )
    }

    /// Pick the start offset, falling back to the configured one, then 0
    pub fn resolve_offset(&self, offset: Option<u32>) -> u32 {
        offset.or(self.start_offset).unwrap_or(0)
    }
}
