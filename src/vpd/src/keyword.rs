//! Keyword traversal within a record
//!
//! Keywords follow the RT keyword back to back until the PF keyword. Each
//! one is a two-byte name, a length, and that many bytes of data. Names
//! starting with `#` use a two-byte little-endian length.

use phf::phf_map;

use crate::cursor::Cursor;
use crate::decode::{decode, Encoding};
use crate::store::KeywordMap;
use crate::{
    ParseOptions, KEYWORD_NAME_LEN, LAST_KEYWORD, POUND_KEYWORD_PREFIX, RECORD_END_TAG,
    RECORD_KEYWORDS_OFFSET,
};

/// Keywords with a known encoding
static KEYWORD_ENCODINGS: phf::Map<&'static str, Encoding> = phf_map! {
    "DR" => Encoding::Ascii,
    "PN" => Encoding::Ascii,
    "SN" => Encoding::Ascii,
    "CC" => Encoding::Ascii,
    "HW" => Encoding::Raw,
    "B1" => Encoding::B1,
    "VN" => Encoding::Ascii,
    "MB" => Encoding::Mb,
    "MM" => Encoding::Ascii,
    "UD" => Encoding::Ud,
    "VP" => Encoding::Ascii,
    "VS" => Encoding::Ascii,
};

/// Encoding for a keyword listed in the table
pub fn encoding_for(keyword: &str) -> Option<Encoding> {
    KEYWORD_ENCODINGS.get(keyword).copied()
}

/// Encoding for any keyword, falling back to ASCII for unlisted names
pub fn resolve_encoding(keyword: &str) -> Encoding {
    encoding_for(keyword).unwrap_or(Encoding::Ascii)
}

/// A keyword's length runs past the end of its record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    /// Name of the keyword that overran
    pub keyword: String,
    /// Record-relative offset of the keyword name
    pub offset: usize,
    /// Declared data length
    pub length: usize,
}

/// Result of reading a record's keywords
#[derive(Debug, Clone, Default)]
pub struct KeywordScan {
    /// Decoded keywords, in record order
    pub keywords: KeywordMap,
    /// Set when reading stopped early on a malformed length
    pub truncated: Option<Truncation>,
}

/// Read and decode every keyword in a record
///
/// `record` is the full record, starting at its resource tag. A malformed
/// length stops the scan; whatever was read before it is kept.
pub fn read(record_name: &str, record: &[u8], options: &ParseOptions) -> KeywordScan {
    let mut scan = KeywordScan::default();

    for item in RawKeywords::new(record) {
        let keyword = match item {
            Ok(keyword) => keyword,
            Err(truncation) => {
                scan.truncated = Some(truncation);
                break;
            }
        };

        let encoding = match encoding_for(&keyword.name) {
            Some(encoding) => encoding,
            None if options.supported_keywords_only => {
                tracing::debug!(
                    record = record_name,
                    keyword = %keyword.name,
                    "skipping unsupported keyword"
                );
                continue;
            }
            None => Encoding::Ascii,
        };

        let value = decode(keyword.data, encoding);
        if let Some(previous) = scan.keywords.insert(keyword.name.clone(), value) {
            tracing::debug!(
                record = record_name,
                keyword = %keyword.name,
                previous = %previous,
                "duplicate keyword, keeping the later value"
            );
        }
    }

    scan
}

/// Find the first occurrence of a keyword and decode it
///
/// Stops at the first match; a truncated record yields `None` if the
/// keyword was not seen before the overrun.
pub fn find(record: &[u8], keyword: &str) -> Option<String> {
    RawKeywords::new(record)
        .map_while(|item| item.ok())
        .find(|raw| raw.name == keyword)
        .map(|raw| decode(raw.data, resolve_encoding(keyword)))
}

/// Undecoded keyword borrowed from a record
#[derive(Debug, Clone)]
pub(crate) struct RawKeyword<'a> {
    pub name: String,
    pub data: &'a [u8],
}

/// Iterator over the keywords of one record
///
/// Yields a single `Err` on a malformed length and then stops.
pub(crate) struct RawKeywords<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> RawKeywords<'a> {
    pub fn new(record: &'a [u8]) -> Self {
        let mut cursor = Cursor::new(record);
        // Short records simply have no keywords
        let done = cursor.seek(RECORD_KEYWORDS_OFFSET).is_err();
        Self { cursor, done }
    }

    fn next_keyword(&mut self) -> Option<Result<RawKeyword<'a>, Truncation>> {
        if self.cursor.is_empty() || self.cursor.peek_u8() == Some(RECORD_END_TAG) {
            return None;
        }

        let offset = self.cursor.position();

        // Leftover bytes too short for a name and a one-byte length
        if self.cursor.remaining() < KEYWORD_NAME_LEN + 1 {
            let rest = self.cursor.read_bytes(self.cursor.remaining()).ok()?;
            return Some(Err(Truncation {
                keyword: String::from_utf8_lossy(rest).into_owned(),
                offset,
                length: 0,
            }));
        }
        let name_bytes = self.cursor.read_bytes(KEYWORD_NAME_LEN).ok()?;
        if name_bytes == LAST_KEYWORD.as_bytes() {
            return None;
        }
        let name = String::from_utf8_lossy(name_bytes).into_owned();

        let length = if name_bytes[0] == POUND_KEYWORD_PREFIX {
            self.cursor.read_u16_le().map(usize::from).ok()
        } else {
            self.cursor.read_u8().map(usize::from).ok()
        };

        let data = length.and_then(|length| self.cursor.read_bytes(length).ok());

        Some(match data {
            Some(data) => Ok(RawKeyword { name, data }),
            None => Err(Truncation {
                keyword: name,
                offset,
                length: length.unwrap_or(0),
            }),
        })
    }
}

impl<'a> Iterator for RawKeywords<'a> {
    type Item = Result<RawKeyword<'a>, Truncation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.next_keyword();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{record, record_with_section};

    #[test]
    fn test_encoding_table() {
        assert_eq!(encoding_for("SN"), Some(Encoding::Ascii));
        assert_eq!(encoding_for("HW"), Some(Encoding::Raw));
        assert_eq!(encoding_for("B1"), Some(Encoding::B1));
        assert_eq!(encoding_for("MB"), Some(Encoding::Mb));
        assert_eq!(encoding_for("UD"), Some(Encoding::Ud));
        assert_eq!(encoding_for("Z9"), None);
        assert_eq!(resolve_encoding("Z9"), Encoding::Ascii);
    }

    #[test]
    fn test_read_keywords_in_order() {
        let bytes = record(
            "VINI",
            &[
                ("SN", b"1234567"),
                ("HW", &[0x00, 0x01]),
                ("B1", &[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]),
                ("CC", b"2CE2"),
            ],
        );
        let scan = read("VINI", &bytes, &ParseOptions::default());

        assert!(scan.truncated.is_none());
        let names: Vec<&str> = scan.keywords.keys().collect();
        assert_eq!(names, vec!["SN", "HW", "B1", "CC"]);
        assert_eq!(scan.keywords.get("SN"), Some("1234567"));
        assert_eq!(scan.keywords.get("HW"), Some("0001"));
        assert_eq!(scan.keywords.get("B1"), Some("de:ad:be:ef:00:01"));
    }

    #[test]
    fn test_unknown_keyword_falls_back_to_ascii() {
        let bytes = record("VINI", &[("Z7", b"hello")]);
        let scan = read("VINI", &bytes, &ParseOptions::default());
        assert_eq!(scan.keywords.get("Z7"), Some("hello"));
    }

    #[test]
    fn test_supported_keywords_only() {
        let bytes = record("VINI", &[("Z7", b"hello"), ("PN", b"01AB234")]);
        let options = ParseOptions {
            supported_keywords_only: true,
            ..ParseOptions::default()
        };
        let scan = read("VINI", &bytes, &options);

        assert_eq!(scan.keywords.len(), 1);
        assert_eq!(scan.keywords.get("PN"), Some("01AB234"));
    }

    #[test]
    fn test_pound_keyword_has_two_byte_length() {
        let data = vec![0x5a; 300];
        let bytes = record("OPFR", &[("#D", &data), ("SN", b"XY")]);
        let scan = read("OPFR", &bytes, &ParseOptions::default());

        assert_eq!(scan.keywords.get("#D").map(str::len), Some(300));
        assert_eq!(scan.keywords.get("SN"), Some("XY"));
    }

    #[test]
    fn test_overrun_keeps_earlier_keywords() {
        // SN is fine, PN claims 200 bytes the record does not have
        let section = [b"SN\x031AB".as_slice(), b"PN\xc8short"].concat();
        let bytes = record_with_section("VINI", &section);
        let scan = read("VINI", &bytes, &ParseOptions::default());

        assert_eq!(scan.keywords.len(), 1);
        assert_eq!(scan.keywords.get("SN"), Some("1AB"));

        let truncation = scan.truncated.unwrap();
        assert_eq!(truncation.keyword, "PN");
        assert_eq!(truncation.length, 200);
        assert_eq!(truncation.offset, 16);
    }

    #[test]
    fn test_duplicate_keyword_last_write_wins() {
        let bytes = record("VINI", &[("SN", b"FIRST"), ("PN", b"P"), ("SN", b"SECOND")]);
        let scan = read("VINI", &bytes, &ParseOptions::default());

        let names: Vec<&str> = scan.keywords.keys().collect();
        assert_eq!(names, vec!["SN", "PN"]);
        assert_eq!(scan.keywords.get("SN"), Some("SECOND"));
    }

    #[test]
    fn test_stops_at_pad_fill() {
        // Anything after PF is padding and must not be read as keywords
        let section = b"SN\x01APF\x03\x00\x00\x00CC\x01B";
        let bytes = record_with_section("VINI", section);
        let scan = read("VINI", &bytes, &ParseOptions::default());

        assert_eq!(scan.keywords.len(), 1);
        assert!(scan.truncated.is_none());
    }

    #[test]
    fn test_partial_keyword_header_is_truncation() {
        // No PF or end tag; two stray bytes follow SN
        let bytes = b"\x84\x0e\x00RT\x04VINISN\x01APN";
        let scan = read("VINI", bytes, &ParseOptions::default());

        assert_eq!(scan.keywords.get("SN"), Some("A"));
        let truncation = scan.truncated.unwrap();
        assert_eq!(truncation.keyword, "PN");
        assert_eq!(truncation.offset, 14);
        assert_eq!(truncation.length, 0);
    }

    #[test]
    fn test_unterminated_record_ending_on_keyword_boundary() {
        let bytes = b"\x84\x0c\x00RT\x04VINISN\x01A";
        let scan = read("VINI", bytes, &ParseOptions::default());

        assert_eq!(scan.keywords.len(), 1);
        assert!(scan.truncated.is_none());
    }

    #[test]
    fn test_short_record_has_no_keywords() {
        let scan = read("VINI", &[0x84, 0x00], &ParseOptions::default());
        assert!(scan.keywords.is_empty());
        assert!(scan.truncated.is_none());
    }

    #[test]
    fn test_find_first_match() {
        let bytes = record(
            "VINI",
            &[
                ("SN", b"FIRST"),
                ("SN", b"SECOND"),
                ("MB", &[0x00, 0x20, 0x24, 0x01, 0x02, 0x03, 0x04, 0x05]),
            ],
        );
        assert_eq!(find(&bytes, "SN").as_deref(), Some("FIRST"));
        assert_eq!(find(&bytes, "MB").as_deref(), Some("2024-01-02-03:04:05"));
        assert_eq!(find(&bytes, "CC"), None);
    }
}
