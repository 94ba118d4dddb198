//! VHDR header validation
//!
//! The header is the only fixed anchor in an image: everything else is
//! found through the VTOC pointer it carries, so any failure here is fatal.

use serde::Serialize;

use crate::cursor::Cursor;
use crate::ecc;
use crate::{Error, Result, RECORD_NAME_LEN, VHDR};

/// Offset of the VHDR ECC trailer
pub const VHDR_ECC_OFFSET: usize = 0;

/// Length of the VHDR ECC trailer
pub const VHDR_ECC_LEN: usize = 11;

/// Offset of the VHDR record
pub const VHDR_RECORD_OFFSET: usize = 11;

/// Length of the VHDR record
pub const VHDR_RECORD_LEN: usize = 44;

/// Offset of the "VHDR" record name
pub const VHDR_NAME_OFFSET: usize = 17;

/// Offset of the VTOC entry inside the VHDR PT keyword
pub const VHDR_TOC_ENTRY_OFFSET: usize = 29;

/// Offset of the VTOC pointer fields (offset, length, ECC offset, ECC length)
pub const VTOC_PTR_OFFSET: usize = 35;

/// Smallest image that can hold a header
pub const MIN_IMAGE_LEN: usize = VHDR_RECORD_OFFSET + VHDR_RECORD_LEN;

/// VTOC location as recorded in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Offset of the VTOC record
    pub vtoc_offset: u16,
    /// Length of the VTOC record
    pub vtoc_length: u16,
    /// Offset of the VTOC ECC trailer
    pub vtoc_ecc_offset: u16,
    /// Length of the VTOC ECC trailer
    pub vtoc_ecc_length: u16,
}

/// Validate the VHDR record and read the VTOC pointer
pub fn validate(image: &[u8]) -> Result<Header> {
    if image.len() < MIN_IMAGE_LEN {
        return Err(invalid(format!(
            "image is {} bytes, need at least {}",
            image.len(),
            MIN_IMAGE_LEN
        )));
    }

    let name = &image[VHDR_NAME_OFFSET..VHDR_NAME_OFFSET + RECORD_NAME_LEN];
    if name != VHDR.as_bytes() {
        return Err(invalid(format!(
            "VHDR record not found, got {:?}",
            String::from_utf8_lossy(name)
        )));
    }

    let status = ecc::check_at(
        image,
        VHDR_RECORD_OFFSET,
        VHDR_RECORD_LEN,
        VHDR_ECC_OFFSET,
        VHDR_ECC_LEN,
    );
    if !status.is_ok() {
        return Err(invalid("VHDR ECC check failed".to_string()));
    }

    let mut cursor = Cursor::at(image, VTOC_PTR_OFFSET)?;
    Ok(Header {
        vtoc_offset: cursor.read_u16_le()?,
        vtoc_length: cursor.read_u16_le()?,
        vtoc_ecc_offset: cursor.read_u16_le()?,
        vtoc_ecc_length: cursor.read_u16_le()?,
    })
}

fn invalid(reason: String) -> Error {
    Error::HeaderInvalid { reason }
}
