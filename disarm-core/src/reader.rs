// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Byte-stream cursor the disassembler pulls instruction units from.
//!
//! All reads are little-endian, matching both instruction sets. A short read
//! returns `None` and is the stream terminator; it is not an error.

use byteorder::{ByteOrder, LittleEndian};

use disarm_common::Address;

/// Sequential cursor over the bytes of an image.
pub trait ImageReader {
    /// Read the next 16-bit unit, advancing by two bytes.
    fn try_read_u16_le(&mut self) -> Option<u16>;

    /// Read the next 32-bit unit, advancing by four bytes.
    fn try_read_u32_le(&mut self) -> Option<u32>;

    /// Address of the next byte to be read.
    fn address(&self) -> Address;
}

/// [`ImageReader`] over an in-memory byte slice with a base address.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: Address,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8], base: Address) -> Self {
        SliceReader { data, pos: 0, base }
    }

    /// Bytes left in the image.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl ImageReader for SliceReader<'_> {
    fn try_read_u16_le(&mut self) -> Option<u16> {
        let bytes = self.data.get(self.pos..self.pos + 2)?;
        self.pos += 2;
        Some(LittleEndian::read_u16(bytes))
    }

    fn try_read_u32_le(&mut self) -> Option<u32> {
        let bytes = self.data.get(self.pos..self.pos + 4)?;
        self.pos += 4;
        Some(LittleEndian::read_u32(bytes))
    }

    fn address(&self) -> Address {
        self.base + self.pos as Address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_advance_address() {
        let data = [0x00, 0xBF, 0xC0, 0x03, 0x5F, 0xD6];
        let mut rdr = SliceReader::new(&data, 0x1000);
        assert_eq!(rdr.address(), 0x1000);
        assert_eq!(rdr.try_read_u16_le(), Some(0xBF00));
        assert_eq!(rdr.address(), 0x1002);
        assert_eq!(rdr.try_read_u32_le(), Some(0xD65F_03C0));
        assert_eq!(rdr.address(), 0x1006);
        assert_eq!(rdr.remaining(), 0);
    }

    #[test]
    fn test_short_read_terminates() {
        let data = [0x12, 0x34, 0x56];
        let mut rdr = SliceReader::new(&data, 0);
        assert_eq!(rdr.try_read_u32_le(), None);
        // A failed read must not move the cursor.
        assert_eq!(rdr.address(), 0);
        assert_eq!(rdr.try_read_u16_le(), Some(0x3412));
        assert_eq!(rdr.try_read_u16_le(), None);
        assert_eq!(rdr.address(), 2);
    }
}
