//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vpd")]
#[command(about = "IPZ VPD image inspector", long_about = None)]
pub struct Cli {
    /// Log parser decisions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an image and print every record's keywords
    #[command(visible_alias = "p")]
    Parse {
        /// VPD image or EEPROM (uses configured default if not provided)
        input: Option<PathBuf>,

        /// Byte offset where VPD starts (decimal or 0x hex)
        #[arg(short, long, value_parser = parse_offset)]
        offset: Option<u32>,

        /// FRU inventory path reported with failures
        #[arg(long, default_value = "/")]
        inventory_path: String,

        /// Process every record in the VTOC, not only VINI, OPFR and OSYS
        #[arg(short, long)]
        all_records: bool,

        /// Drop keywords without a known encoding
        #[arg(short, long)]
        supported_only: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the VHDR header and show the VTOC pointer
    Header {
        /// VPD image or EEPROM (uses configured default if not provided)
        input: Option<PathBuf>,

        /// Byte offset where VPD starts (decimal or 0x hex)
        #[arg(short, long, value_parser = parse_offset)]
        offset: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the records in the VTOC
    #[command(visible_alias = "t")]
    Toc {
        /// VPD image or EEPROM (uses configured default if not provided)
        input: Option<PathBuf>,

        /// Byte offset where VPD starts (decimal or 0x hex)
        #[arg(short, long, value_parser = parse_offset)]
        offset: Option<u32>,

        /// Include records the parser skips by default
        #[arg(short, long)]
        all_records: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read one keyword straight from the hardware source
    #[command(visible_alias = "r")]
    Read {
        /// Record name (e.g. VINI)
        record: String,

        /// Keyword name (e.g. SN)
        keyword: String,

        /// EEPROM path (uses configured default if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Byte offset where VPD starts (decimal or 0x hex)
        #[arg(short, long, value_parser = parse_offset)]
        offset: Option<u32>,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default EEPROM path
        #[arg(long)]
        eeprom: Option<PathBuf>,

        /// Set default start offset (decimal or 0x hex)
        #[arg(long, value_parser = parse_offset)]
        offset: Option<u32>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

/// Parse an offset given in decimal or with a 0x prefix
pub fn parse_offset(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid offset {:?}: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("0"), Ok(0));
        assert_eq!(parse_offset("4096"), Ok(4096));
        assert_eq!(parse_offset("0x1000"), Ok(0x1000));
        assert_eq!(parse_offset("0XfF"), Ok(0xff));
        assert!(parse_offset("0x").is_err());
        assert!(parse_offset("-1").is_err());
        assert!(parse_offset("ten").is_err());
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from(["vpd", "parse", "vpd.bin", "--offset", "0x20", "--json"]);
        match cli.command {
            Commands::Parse {
                input,
                offset,
                inventory_path,
                all_records,
                json,
                ..
            } => {
                assert_eq!(input, Some(PathBuf::from("vpd.bin")));
                assert_eq!(offset, Some(0x20));
                assert_eq!(inventory_path, "/");
                assert!(!all_records);
                assert!(json);
            }
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn test_read_args() {
        let cli = Cli::parse_from(["vpd", "-v", "read", "VINI", "SN", "-i", "/sys/eeprom"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Read {
                record,
                keyword,
                input,
                offset,
            } => {
                assert_eq!(record, "VINI");
                assert_eq!(keyword, "SN");
                assert_eq!(input, Some(PathBuf::from("/sys/eeprom")));
                assert_eq!(offset, None);
            }
            _ => panic!("expected read command"),
        }
    }
}
