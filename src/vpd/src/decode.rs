//! Keyword value decoding
//!
//! Keywords carry no type tag, so the encoding comes from the keyword
//! name (see [`crate::keyword`]). Decoding never fails: the fixed-width
//! encodings zero-pad short data and ignore anything past their width.

use uuid::Uuid;

/// Length of a B1 (MAC address) value
pub const MAC_ADDRESS_LEN: usize = 6;

/// Length of an MB (build date) value, including the leading skipped byte
pub const MB_LEN: usize = 8;

/// Length of a UD (UUID) value
pub const UUID_LEN: usize = 16;

/// Encoding of a keyword's data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Bytes taken as text
    Ascii,
    /// Bytes rendered as uppercase hex
    Raw,
    /// MAC address, `aa:bb:cc:dd:ee:ff`
    B1,
    /// Build date, `YYYY-MM-DD-HH:MM:SS`
    Mb,
    /// UUID, `123e4567-e89b-12d3-a456-426655440000`
    Ud,
}

/// Decode raw keyword data into text
pub fn decode(raw: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Ascii => decode_ascii(raw),
        Encoding::Raw => hex::encode_upper(raw),
        Encoding::B1 => decode_mac(raw),
        Encoding::Mb => decode_build_date(raw),
        Encoding::Ud => decode_uuid(raw),
    }
}

/// Each byte becomes the char with the same code point, so non-printable
/// and non-UTF-8 bytes survive untouched.
fn decode_ascii(raw: &[u8]) -> String {
    raw.iter().copied().map(char::from).collect()
}

fn decode_mac(raw: &[u8]) -> String {
    fixed::<MAC_ADDRESS_LEN>(raw)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn decode_build_date(raw: &[u8]) -> String {
    // First byte is not part of the date
    let digits = hex::encode(&fixed::<MB_LEN>(raw)[1..]);
    format!(
        "{}-{}-{}-{}:{}:{}",
        &digits[0..4],
        &digits[4..6],
        &digits[6..8],
        &digits[8..10],
        &digits[10..12],
        &digits[12..14]
    )
}

fn decode_uuid(raw: &[u8]) -> String {
    Uuid::from_bytes(fixed::<UUID_LEN>(raw))
        .hyphenated()
        .to_string()
}

fn fixed<const N: usize>(raw: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let len = raw.len().min(N);
    out[..len].copy_from_slice(&raw[..len]);
    out
}
