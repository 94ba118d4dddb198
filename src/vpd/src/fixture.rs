//! Synthetic VPD images for tests

use crate::header::{MIN_IMAGE_LEN, VHDR_RECORD_LEN};
use crate::toc::PT_ENTRY_LEN;
use crate::{ecc, RECORD_END_TAG, RECORD_START_TAG, VTOC};

/// Where a record ended up in a built image
#[derive(Debug, Clone)]
pub struct RecordLayout {
    pub name: String,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone)]
pub struct Image {
    pub bytes: Vec<u8>,
    pub vtoc_offset: usize,
    pub records: Vec<RecordLayout>,
}

impl Image {
    pub fn layout(&self, name: &str) -> &RecordLayout {
        self.records
            .iter()
            .find(|r| r.name == name)
            .expect("record not in image")
    }
}

/// Build a record from keywords, with RT, PF and the end tag added
pub fn record(name: &str, keywords: &[(&str, &[u8])]) -> Vec<u8> {
    let mut section = Vec::new();
    for (keyword, data) in keywords {
        section.extend_from_slice(keyword.as_bytes());
        if keyword.starts_with('#') {
            section.extend_from_slice(&(data.len() as u16).to_le_bytes());
        } else {
            section.push(data.len() as u8);
        }
        section.extend_from_slice(data);
    }
    record_with_section(name, &section)
}

/// Build a record around an arbitrary keyword section
pub fn record_with_section(name: &str, section: &[u8]) -> Vec<u8> {
    let mut body = b"RT\x04".to_vec();
    body.extend_from_slice(name.as_bytes());
    body.extend_from_slice(section);
    body.extend_from_slice(b"PF\x02\x00\x00");
    body.push(RECORD_END_TAG);

    let mut out = vec![RECORD_START_TAG];
    out.extend_from_slice(&(body.len() as u16).to_le_bytes());
    out.extend(body);
    out
}

/// Lays out VHDR, VTOC and data records, each followed by its ECC
#[derive(Debug, Default)]
pub struct ImageBuilder {
    /// VTOC name and record bytes
    records: Vec<(String, Vec<u8>)>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(self, name: &str, keywords: &[(&str, &[u8])]) -> Self {
        let bytes = record(name, keywords);
        self.record_bytes(name, bytes)
    }

    /// Add prebuilt record bytes under a VTOC name
    pub fn record_bytes(mut self, toc_name: &str, bytes: Vec<u8>) -> Self {
        self.records.push((toc_name.to_string(), bytes));
        self
    }

    pub fn build(&self) -> Image {
        let pt_len = PT_ENTRY_LEN * self.records.len();
        let vtoc_len = vtoc(&vec![0u8; pt_len]).len();

        let vtoc_offset = MIN_IMAGE_LEN;
        let vtoc_ecc_offset = vtoc_offset + vtoc_len;
        let mut next = vtoc_ecc_offset + ecc::ecc_len(vtoc_len);

        let mut pt = Vec::with_capacity(pt_len);
        let mut layouts = Vec::new();
        for (name, bytes) in &self.records {
            let offset = next;
            let ecc_offset = offset + bytes.len();
            next = ecc_offset + ecc::ecc_len(bytes.len());

            pt.extend_from_slice(name.as_bytes());
            pt.extend_from_slice(&[0x00, 0x00]);
            for field in [offset, bytes.len(), ecc_offset, ecc::ecc_len(bytes.len())] {
                pt.extend_from_slice(&(field as u16).to_le_bytes());
            }

            layouts.push(RecordLayout {
                name: name.clone(),
                offset,
                length: bytes.len(),
            });
        }

        let vtoc_record = vtoc(&pt);
        assert_eq!(vtoc_record.len(), vtoc_len);

        let vhdr = vhdr(&[
            vtoc_offset,
            vtoc_len,
            vtoc_ecc_offset,
            ecc::ecc_len(vtoc_len),
        ]);

        let mut bytes = ecc::generate(&vhdr);
        bytes.extend_from_slice(&vhdr);
        bytes.extend_from_slice(&vtoc_record);
        bytes.extend(ecc::generate(&vtoc_record));
        for (_, record) in &self.records {
            bytes.extend_from_slice(record);
            bytes.extend(ecc::generate(record));
        }

        Image {
            bytes,
            vtoc_offset,
            records: layouts,
        }
    }
}

fn vtoc(pt: &[u8]) -> Vec<u8> {
    let mut section = b"PT".to_vec();
    section.push(pt.len() as u8);
    section.extend_from_slice(pt);
    record_with_section(VTOC, &section)
}

/// The 44-byte VHDR record pointing at the VTOC
fn vhdr(vtoc_pointer: &[usize; 4]) -> Vec<u8> {
    let mut out = vec![RECORD_START_TAG];
    out.extend_from_slice(&40u16.to_le_bytes());
    out.extend_from_slice(b"RT\x04VHDR");
    out.extend_from_slice(b"VD\x0201");
    out.extend_from_slice(b"PT\x0eVTOC\x00\x00");
    for field in vtoc_pointer {
        out.extend_from_slice(&(*field as u16).to_le_bytes());
    }
    out.extend_from_slice(b"PF\x08");
    out.extend_from_slice(&[0u8; 8]);
    out.push(RECORD_END_TAG);

    assert_eq!(out.len(), VHDR_RECORD_LEN);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{VHDR_NAME_OFFSET, VHDR_TOC_ENTRY_OFFSET, VTOC_PTR_OFFSET};

    #[test]
    fn test_vhdr_layout() {
        let image = ImageBuilder::new().build();
        assert_eq!(&image.bytes[VHDR_NAME_OFFSET..VHDR_NAME_OFFSET + 4], b"VHDR");
        assert_eq!(
            &image.bytes[VHDR_TOC_ENTRY_OFFSET..VHDR_TOC_ENTRY_OFFSET + 4],
            b"VTOC"
        );
        assert_eq!(
            u16::from_le_bytes([image.bytes[VTOC_PTR_OFFSET], image.bytes[VTOC_PTR_OFFSET + 1]]),
            MIN_IMAGE_LEN as u16
        );
    }
}
