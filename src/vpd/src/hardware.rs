//! Live reads from the EEPROM
//!
//! The cached image handed to [`crate::Parser`] can go stale when a
//! keyword is changed behind the parser's back. These helpers read the
//! hardware source again and pull out a single keyword.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::{header, keyword, record, toc};
use crate::{Error, ParseOptions, Result, MAX_VPD_SIZE};

/// Read the VPD image from a hardware source
///
/// Reads at most [`MAX_VPD_SIZE`] bytes starting at `start_offset`. The file
/// is closed before returning, on success or failure.
pub fn read_image(path: &Path, start_offset: u64) -> Result<Vec<u8>> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_error)?;
    file.seek(SeekFrom::Start(start_offset)).map_err(io_error)?;

    let mut image = Vec::with_capacity(MAX_VPD_SIZE);
    file.take(MAX_VPD_SIZE as u64)
        .read_to_end(&mut image)
        .map_err(io_error)?;

    Ok(image)
}

/// Find one keyword in an image
///
/// Validates the header and VTOC like a full parse, then scans only the
/// named record and returns the first matching keyword. The record does
/// not need to be in the supported-record list.
pub fn find_keyword(image: &[u8], record_name: &str, keyword_name: &str) -> Result<String> {
    let header = header::validate(image)?;
    let all_records = ParseOptions {
        all_records: true,
        ..ParseOptions::default()
    };
    let entries = toc::resolve(image, &header, &all_records)?;

    let entry = entries
        .iter()
        .find(|entry| entry.name == record_name)
        .ok_or_else(|| Error::RecordNotFound(record_name.to_string()))?;

    record::check_bounds(image, entry)?;
    let bytes = record::locate(image, entry).map_err(|issue| Error::RecordCorrupted {
        record: record_name.to_string(),
        offset: entry.offset as usize,
        reason: issue.to_string(),
    })?;

    keyword::find(bytes, keyword_name).ok_or_else(|| Error::KeywordNotFound {
        record: record_name.to_string(),
        keyword: keyword_name.to_string(),
    })
}
