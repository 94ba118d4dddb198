//! Record processing
//!
//! Walks the VTOC entries in order. A record that fails its name or ECC
//! check is skipped and reported as an [`Issue`]; the rest of the image is
//! still parsed. An entry pointing past the end of the image is fatal.

use serde::Serialize;

use crate::cursor::Cursor;
use crate::ecc;
use crate::keyword;
use crate::store::Store;
use crate::toc::TocEntry;
use crate::{Error, ParseOptions, RECORD_NAME_LEN, RECORD_NAME_OFFSET};

/// A problem confined to one record
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    #[error("VTOC entry for {record} has offset {offset:#06x}, length {length}, ECC offset {ecc_offset:#06x}, ECC length {ecc_length}")]
    InvalidEntry {
        record: String,
        offset: u16,
        length: u16,
        ecc_offset: u16,
        ecc_length: u16,
    },

    #[error("VTOC lists {expected} at offset {offset:#06x} but the record there is {found:?}")]
    NameMismatch {
        expected: String,
        found: String,
        offset: u16,
    },

    #[error("ECC check failed for record {record} at offset {offset:#06x}")]
    EccFailed { record: String, offset: u16 },

    #[error("Keyword {keyword} in record {record} at offset {offset:#06x} runs past the end of the record (declared length {length})")]
    Truncated {
        record: String,
        keyword: String,
        offset: usize,
        length: usize,
    },
}

/// Process every VTOC entry into the store
///
/// Fails only when an entry's record or ECC range lies outside the image;
/// records processed before that entry stay in the store.
pub fn process(
    image: &[u8],
    entries: &[TocEntry],
    options: &ParseOptions,
    store: &mut Store,
) -> crate::Result<()> {
    for entry in entries {
        check_bounds(image, entry)?;

        let record = match locate(image, entry) {
            Ok(record) => record,
            Err(issue) => {
                tracing::warn!(record = %entry.name, offset = entry.offset, "{}", issue);
                store.push_issue(issue);
                continue;
            }
        };

        let keywords = store.insert_record(&entry.name);
        let scan = keyword::read(&entry.name, record, options);
        keywords.extend(scan.keywords);

        if let Some(truncation) = scan.truncated {
            let issue = Issue::Truncated {
                record: entry.name.clone(),
                keyword: truncation.keyword,
                offset: entry.offset as usize + truncation.offset,
                length: truncation.length,
            };
            tracing::warn!(record = %entry.name, "{}", issue);
            store.push_issue(issue);
        }
    }

    Ok(())
}

/// Check that an entry's record and ECC ranges lie inside the image
pub fn check_bounds(image: &[u8], entry: &TocEntry) -> crate::Result<()> {
    let ranges = [
        (entry.offset, entry.length),
        (entry.ecc_offset, entry.ecc_length),
    ];

    for (offset, length) in ranges {
        let (offset, needed) = (offset as usize, length as usize);
        if offset + needed > image.len() {
            return Err(Error::OutOfBounds {
                offset,
                needed,
                available: image.len().saturating_sub(offset),
            });
        }
    }

    Ok(())
}

/// Check a VTOC entry and return the bytes of its record
///
/// The entry must be non-empty, the record must carry the name the VTOC
/// gives it, and it must pass ECC.
pub fn locate<'a>(image: &'a [u8], entry: &TocEntry) -> Result<&'a [u8], Issue> {
    if entry.offset == 0 || entry.length == 0 || entry.ecc_offset == 0 || entry.ecc_length == 0 {
        return Err(Issue::InvalidEntry {
            record: entry.name.clone(),
            offset: entry.offset,
            length: entry.length,
            ecc_offset: entry.ecc_offset,
            ecc_length: entry.ecc_length,
        });
    }

    let found = record_name_at(image, entry.offset as usize);
    if found.as_deref() != Some(entry.name.as_str()) {
        return Err(Issue::NameMismatch {
            expected: entry.name.clone(),
            found: found.unwrap_or_default(),
            offset: entry.offset,
        });
    }

    let offset = entry.offset as usize;
    let length = entry.length as usize;
    let status = ecc::check_at(
        image,
        offset,
        length,
        entry.ecc_offset as usize,
        entry.ecc_length as usize,
    );
    if !status.is_ok() {
        return Err(Issue::EccFailed {
            record: entry.name.clone(),
            offset: entry.offset,
        });
    }

    // In bounds: the ECC check covered exactly this range
    Ok(&image[offset..offset + length])
}

/// Name a record declares in its RT keyword
pub fn record_name_at(image: &[u8], offset: usize) -> Option<String> {
    let mut cursor = Cursor::at(image, offset.checked_add(RECORD_NAME_OFFSET)?).ok()?;
    let name = cursor.read_bytes(RECORD_NAME_LEN).ok()?;
    Some(String::from_utf8_lossy(name).into_owned())
}
