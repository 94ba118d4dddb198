//! Header command handler

use anyhow::{Context, Result};
use std::path::PathBuf;
use vpd::Parser;

use super::load_source;

pub fn handle(input: Option<PathBuf>, offset: Option<u32>, json: bool) -> Result<()> {
    let source = load_source(input, offset)?;
    let header = Parser::new(&source.image, "/", &source.path, source.offset)
        .check_header()
        .with_context(|| format!("Invalid VPD in {}", source.path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&header)?);
        return Ok(());
    }

    println!("VHDR: OK");
    println!(
        "VTOC: offset {:#06x}, length {}",
        header.vtoc_offset, header.vtoc_length
    );
    println!(
        "VTOC ECC: offset {:#06x}, length {}",
        header.vtoc_ecc_offset, header.vtoc_ecc_length
    );

    Ok(())
}
