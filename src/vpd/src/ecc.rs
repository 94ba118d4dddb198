//! ECC checking for VPD records
//!
//! Each record (VHDR, VTOC and every data record) is protected by an ECC
//! trailer stored elsewhere in the image. The trailer holds one check byte
//! per 32-bit data word, the final word zero-padded, so a 44-byte VHDR
//! record carries 11 bytes of ECC.
//!
//! A check byte is Hamming SEC-DED over the word: the 32 data bits sit at
//! the non-power-of-two positions 3..=38 of the codeword, bits 0-5 of the
//! check byte are the Hamming parity bits and bit 6 is overall parity.
//! Bit 7 is always clear.
//!
//! The parser only uses the code for detection. Correctable single-bit
//! errors are still reported as corruption since nothing is written back.

/// Data bytes covered by one check byte
pub const WORD_LEN: usize = 4;

/// Highest codeword position for a 32-bit word
const CODEWORD_BITS: u32 = 38;

/// Outcome of an ECC check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EccStatus {
    Ok,
    Corrupted,
}

impl EccStatus {
    #[inline]
    pub fn is_ok(self) -> bool {
        self == EccStatus::Ok
    }
}

/// ECC length needed to protect `data_len` bytes
#[inline]
pub fn ecc_len(data_len: usize) -> usize {
    data_len.div_ceil(WORD_LEN)
}

/// Compute the ECC trailer for a block
pub fn generate(data: &[u8]) -> Vec<u8> {
    data.chunks(WORD_LEN).map(chunk_check_byte).collect()
}

/// Check a block against its ECC trailer
pub fn check(data: &[u8], ecc: &[u8]) -> EccStatus {
    if ecc.len() != ecc_len(data.len()) {
        return EccStatus::Corrupted;
    }

    let intact = data
        .chunks(WORD_LEN)
        .zip(ecc)
        .all(|(chunk, &stored)| chunk_check_byte(chunk) == stored);

    if intact {
        EccStatus::Ok
    } else {
        EccStatus::Corrupted
    }
}

/// Check a block whose data and ECC ranges come from the image itself
///
/// Ranges that fall outside the image report [`EccStatus::Corrupted`]
/// rather than panicking.
pub fn check_at(
    image: &[u8],
    data_offset: usize,
    data_len: usize,
    ecc_offset: usize,
    ecc_len: usize,
) -> EccStatus {
    let data = data_offset
        .checked_add(data_len)
        .and_then(|end| image.get(data_offset..end));
    let ecc = ecc_offset
        .checked_add(ecc_len)
        .and_then(|end| image.get(ecc_offset..end));

    match (data, ecc) {
        (Some(data), Some(ecc)) => check(data, ecc),
        _ => EccStatus::Corrupted,
    }
}

fn chunk_check_byte(chunk: &[u8]) -> u8 {
    let mut word = [0u8; WORD_LEN];
    word[..chunk.len()].copy_from_slice(chunk);
    check_byte(u32::from_le_bytes(word))
}

/// Hamming SEC-DED check byte for one 32-bit word
fn check_byte(word: u32) -> u8 {
    let mut parity = 0u32;
    let mut bit = 0;

    for position in 1..=CODEWORD_BITS {
        if position.is_power_of_two() {
            continue;
        }
        if (word >> bit) & 1 == 1 {
            parity ^= position;
        }
        bit += 1;
    }

    let overall = (word.count_ones() + parity.count_ones()) & 1;
    (parity as u8) | ((overall as u8) << 6)
}
