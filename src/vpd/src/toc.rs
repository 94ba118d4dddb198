//! VTOC (table of contents) resolution

use serde::Serialize;

use crate::cursor::Cursor;
use crate::ecc;
use crate::header::Header;
use crate::{
    Error, ParseOptions, Result, KEYWORD_NAME_LEN, PT_KEYWORD, RECORD_NAME_LEN,
    RECORD_NAME_OFFSET, VTOC,
};

/// Size of one PT entry
pub const PT_ENTRY_LEN: usize = 14;

/// Records the parser decodes by default
pub const SUPPORTED_RECORDS: &[&str] = &["VINI", "OPFR", "OSYS"];

/// Check if a record is in the default allow-list
pub fn is_supported_record(name: &str) -> bool {
    SUPPORTED_RECORDS.contains(&name)
}

/// One record pointer from the VTOC PT keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Record name
    pub name: String,
    /// Record type, not interpreted
    pub record_type: u16,
    /// Record offset in the image
    pub offset: u16,
    /// Record length, including framing
    pub length: u16,
    /// ECC trailer offset in the image
    pub ecc_offset: u16,
    /// ECC trailer length
    pub ecc_length: u16,
}

impl TocEntry {
    /// Decode one packed PT entry
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let name = cursor.read_bytes(RECORD_NAME_LEN)?;

        Ok(Self {
            name: String::from_utf8_lossy(name).into_owned(),
            record_type: cursor.read_u16_le()?,
            offset: cursor.read_u16_le()?,
            length: cursor.read_u16_le()?,
            ecc_offset: cursor.read_u16_le()?,
            ecc_length: cursor.read_u16_le()?,
        })
    }
}

/// Resolve the VTOC into the ordered list of records to process
pub fn resolve(image: &[u8], header: &Header, options: &ParseOptions) -> Result<Vec<TocEntry>> {
    let pt = read_pt(image, header)?;
    let entries = parse_pt(pt);

    Ok(entries
        .into_iter()
        .filter(|entry| {
            let keep = options.all_records || is_supported_record(&entry.name);
            if !keep {
                tracing::debug!(record = %entry.name, offset = entry.offset, "skipping unsupported record");
            }
            keep
        })
        .collect())
}

/// Validate the VTOC record and return its PT keyword data
pub fn read_pt<'a>(image: &'a [u8], header: &Header) -> Result<&'a [u8]> {
    let offset = header.vtoc_offset as usize;
    let invalid = |reason: String| Error::TocInvalid { offset, reason };

    let status = ecc::check_at(
        image,
        offset,
        header.vtoc_length as usize,
        header.vtoc_ecc_offset as usize,
        header.vtoc_ecc_length as usize,
    );
    if !status.is_ok() {
        return Err(invalid("ECC check failed".to_string()));
    }

    let mut cursor = Cursor::at(image, offset + RECORD_NAME_OFFSET)?;
    let name = cursor.read_bytes(RECORD_NAME_LEN)?;
    if name != VTOC.as_bytes() {
        return Err(invalid(format!(
            "VTOC record not found, got {:?}",
            String::from_utf8_lossy(name)
        )));
    }

    // PT immediately follows the RT keyword
    let keyword = cursor.read_bytes(KEYWORD_NAME_LEN)?;
    if keyword != PT_KEYWORD.as_bytes() {
        return Err(invalid(format!(
            "expected PT keyword, got {:?}",
            String::from_utf8_lossy(keyword)
        )));
    }

    let length = cursor.read_u8()? as usize;
    cursor.read_bytes(length)
}

/// Split PT keyword data into entries, in order
///
/// A trailing partial entry is ignored.
pub fn parse_pt(pt: &[u8]) -> Vec<TocEntry> {
    let chunks = pt.chunks_exact(PT_ENTRY_LEN);
    if !chunks.remainder().is_empty() {
        tracing::warn!(
            length = pt.len(),
            trailing = chunks.remainder().len(),
            "PT keyword is not a whole number of entries"
        );
    }

    chunks.filter_map(|chunk| TocEntry::from_bytes(chunk).ok()).collect()
}
