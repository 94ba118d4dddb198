//! Command handlers for vpd CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod header;
pub mod parse;
pub mod read;
pub mod toc;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Image bytes plus where they came from
pub struct Source {
    pub path: PathBuf,
    pub offset: u32,
    pub image: Vec<u8>,
}

/// Resolve input and offset against the config and read the image
pub fn load_source(input: Option<PathBuf>, offset: Option<u32>) -> Result<Source> {
    let config = Config::load()?;
    let path = config.resolve_input(input)?;
    let offset = config.resolve_offset(offset);
    let image = read_image(&path)?;

    Ok(Source {
        path,
        offset,
        image,
    })
}

pub fn read_image(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
