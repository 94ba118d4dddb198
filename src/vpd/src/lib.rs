//! Parser for IPZ / OpenPower Vital Product Data (VPD)
//!
//! VPD images live in FRU EEPROMs and describe the part: serial numbers,
//! part numbers, build dates and so on, stored as keywords grouped into
//! named records.
//!
//! # Format Overview
//!
//! ## Header (`VHDR`)
//!
//! - Bytes 0-10: ECC for the VHDR record
//! - Bytes 11-54: VHDR record
//!   - Byte 11: large resource tag (0x84)
//!   - Bytes 17-20: "VHDR"
//!   - Bytes 35-36: VTOC offset (LE)
//!   - Bytes 37-38: VTOC length (LE)
//!   - Bytes 39-40: VTOC ECC offset (LE)
//!   - Bytes 41-42: VTOC ECC length (LE)
//!
//! ## Records
//!
//! Every record has the same framing:
//! - Byte 0: large resource tag (0x84)
//! - Bytes 1-2: record size (LE)
//! - Bytes 3-5: "RT" keyword, length 4
//! - Bytes 6-9: record name
//! - Keywords, terminated by "PF" (pad fill)
//! - Small resource end tag (0x78)
//!
//! ## Table of contents (`VTOC`)
//!
//! The VTOC record holds a single "PT" keyword whose payload is a packed list
//! of 14-byte entries: name (4), record type (2), offset (2), length (2),
//! ECC offset (2), ECC length (2).
//!
//! ## Keywords
//!
//! Two-byte name, one-byte length (two bytes, LE, for names starting
//! with `#`), then the data.
//!
//! # Example
//!
//! ```no_run
//! use vpd::Parser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = std::fs::read("/sys/bus/i2c/drivers/at24/8-0050/eeprom")?;
//! let parser = Parser::new(
//!     &image,
//!     "/system/chassis/motherboard",
//!     "/sys/bus/i2c/drivers/at24/8-0050/eeprom",
//!     0,
//! );
//!
//! let store = parser.run()?;
//! println!("Serial: {:?}", store.get("VINI", "SN"));
//!
//! // Bypass the cached image and ask the EEPROM directly
//! let live = parser.read_keyword_from_hardware("VINI", "SN")?;
//! println!("Live serial: {}", live);
//! # Ok(())
//! # }
//! ```

mod cursor;
pub mod decode;
pub mod ecc;
#[cfg(test)]
mod fixture;
pub mod hardware;
pub mod header;
pub mod keyword;
mod parser;
pub mod record;
mod store;
pub mod toc;

use std::path::PathBuf;

// Re-export main types
pub use cursor::Cursor;
pub use decode::{decode, Encoding};
pub use ecc::EccStatus;
pub use header::Header;
pub use keyword::{encoding_for, KeywordScan};
pub use parser::{ParseOptions, Parser};
pub use record::Issue;
pub use store::{KeywordMap, Store};
pub use toc::TocEntry;

/// Mandatory header record name
pub const VHDR: &str = "VHDR";

/// Table of contents record name
pub const VTOC: &str = "VTOC";

/// Keyword in VHDR and VTOC that holds record pointers
pub const PT_KEYWORD: &str = "PT";

/// Keyword that carries the record name at the start of every record
pub const RT_KEYWORD: &str = "RT";

/// Pad fill keyword, always the last keyword of a record
pub const LAST_KEYWORD: &str = "PF";

/// Keywords starting with this byte use a two-byte length
pub const POUND_KEYWORD_PREFIX: u8 = b'#';

/// Large resource tag opening every record
pub const RECORD_START_TAG: u8 = 0x84;

/// Small resource end tag closing every record
pub const RECORD_END_TAG: u8 = 0x78;

/// Length of a record name
pub const RECORD_NAME_LEN: usize = 4;

/// Length of a keyword name
pub const KEYWORD_NAME_LEN: usize = 2;

/// Offset of the record name from the start of a record (tag + size + RT header)
pub const RECORD_NAME_OFFSET: usize = 6;

/// Offset of the first keyword after RT, from the start of a record
pub const RECORD_KEYWORDS_OFFSET: usize = RECORD_NAME_OFFSET + RECORD_NAME_LEN;

/// Largest VPD image read from hardware
pub const MAX_VPD_SIZE: usize = 65504;

/// Errors from VPD parsing
///
/// Every variant here aborts the operation that raised it. Problems confined
/// to a single record are reported as [`Issue`]s instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid VPD header: {reason}")]
    HeaderInvalid { reason: String },

    #[error("Invalid VTOC record at offset {offset:#06x}: {reason}")]
    TocInvalid { offset: usize, reason: String },

    #[error("Data too short: need {needed} bytes at offset {offset:#x}, got {available}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Start offset {offset:#x} is outside the {len}-byte buffer")]
    StartOffsetOutOfRange { offset: usize, len: usize },

    #[error("Record {0} not found in VTOC")]
    RecordNotFound(String),

    #[error("Record {record} at offset {offset:#06x} is corrupt: {reason}")]
    RecordCorrupted {
        record: String,
        offset: usize,
        reason: String,
    },

    #[error("Keyword {keyword} not found in record {record}")]
    KeywordNotFound { record: String, keyword: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Check if data looks like the start of a VPD image
///
/// Only the VHDR name is inspected; use [`header::validate`] for the full check.
pub fn is_vpd(data: &[u8]) -> bool {
    data.len() >= header::MIN_IMAGE_LEN
        && &data[header::VHDR_NAME_OFFSET..header::VHDR_NAME_OFFSET + RECORD_NAME_LEN]
            == VHDR.as_bytes()
}
