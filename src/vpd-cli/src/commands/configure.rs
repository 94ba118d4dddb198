//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up vpd CLI defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
///
/// # Arguments
/// * `eeprom` - Optional EEPROM path to set as default
/// * `offset` - Optional start offset to set as default
/// * `show` - If true, show current configuration
pub fn handle(eeprom: Option<PathBuf>, offset: Option<u32>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if eeprom.is_none() && offset.is_none() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, eeprom, offset);
    config.save()?;

    println!("Configuration updated");
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

fn apply(config: &mut Config, eeprom: Option<PathBuf>, offset: Option<u32>) {
    if let Some(path) = eeprom {
        config.eeprom = Some(path);
    }
    if let Some(offset) = offset {
        config.start_offset = Some(offset);
    }
}

/// Display current configuration
fn show_config(config: &Config) {
    match &config.eeprom {
        Some(path) => println!("EEPROM: {}", path.display()),
        None => println!("No EEPROM configured"),
    }
    match config.start_offset {
        Some(offset) => println!("Start offset: {:#x}", offset),
        None => println!("Start offset: 0 (default)"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: vpd configure --eeprom PATH [--offset N]");
    println!("   or: vpd configure --show");
}
