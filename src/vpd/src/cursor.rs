//! Bounds-checked reading over a VPD image
//!
//! Every offset in a VPD image comes from the image itself, so every read
//! validates the range first and reports [`Error::OutOfBounds`] instead of
//! slicing past the end.

use byteorder::{ByteOrder, LittleEndian as LE};

use crate::{Error, Result};

/// Read cursor over a borrowed byte slice
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a cursor positioned at `pos`
    pub fn at(data: &'a [u8], pos: usize) -> Result<Self> {
        let mut cursor = Self::new(data);
        cursor.seek(pos)?;
        Ok(cursor)
    }

    /// Current position from the start of the data
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current position
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Move to an absolute position (the end of the data is allowed)
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::OutOfBounds {
                offset: pos,
                needed: 0,
                available: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Look at the next byte without consuming it
    #[inline]
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consume `n` bytes, borrowing them from the underlying data
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::OutOfBounds {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            })?;

        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(LE::read_u16(self.read_bytes(2)?))
    }
}
