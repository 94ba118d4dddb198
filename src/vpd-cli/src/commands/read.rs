//! Read command handler
//!
//! Goes to the hardware source on every call, so the value reflects what is
//! in the EEPROM now rather than any earlier parse.

use anyhow::Result;
use std::path::PathBuf;
use vpd::Parser;

use crate::config::Config;

pub fn handle(
    record: &str,
    keyword: &str,
    input: Option<PathBuf>,
    offset: Option<u32>,
) -> Result<()> {
    let config = Config::load()?;
    let eeprom = config.resolve_input(input)?;
    let offset = config.resolve_offset(offset);

    let parser = Parser::new(&[], "/", eeprom, offset);
    let value = parser.read_keyword_from_hardware(record, keyword)?;
    println!("{}", value);

    Ok(())
}
