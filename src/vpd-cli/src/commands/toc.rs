//! TOC command handler

use anyhow::{Context, Result};
use std::path::PathBuf;
use vpd::{ParseOptions, Parser};

use super::load_source;

pub fn handle(
    input: Option<PathBuf>,
    offset: Option<u32>,
    all_records: bool,
    json: bool,
) -> Result<()> {
    let source = load_source(input, offset)?;
    let options = ParseOptions {
        all_records,
        ..ParseOptions::default()
    };
    let entries = Parser::new(&source.image, "/", &source.path, source.offset)
        .with_options(options)
        .toc()
        .with_context(|| format!("Failed to read VTOC from {}", source.path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{:<6} {:>8} {:>8} {:>8} {:>8}",
        "RECORD", "OFFSET", "LENGTH", "ECC_OFF", "ECC_LEN"
    );
    for entry in &entries {
        println!(
            "{:<6} {:>#8x} {:>8} {:>#8x} {:>8}",
            entry.name, entry.offset, entry.length, entry.ecc_offset, entry.ecc_length
        );
    }

    Ok(())
}
