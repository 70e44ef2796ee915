// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Public disassembler facade.

use disarm_common::{ArchVariant, DisasmError};

use crate::a64::A64Disassembler;
use crate::instruction::Instruction;
use crate::reader::ImageReader;
use crate::t32::T32Disassembler;

/// Streaming disassembler for either instruction set.
///
/// Construction fails if the reader's starting address violates the
/// variant's alignment (2 bytes for T32, 4 for A64). Decoding never fails
/// afterwards: undecodable encodings come back as `Invalid` records and
/// only a short read ends the stream.
pub enum Disassembler<R> {
    T32(T32Disassembler<R>),
    A64(A64Disassembler<R>),
}

impl<R: ImageReader> Disassembler<R> {
    pub fn new(arch: ArchVariant, rdr: R) -> Result<Self, DisasmError> {
        let required = arch.alignment();
        let address = rdr.address();
        if address % required as u64 != 0 {
            return Err(DisasmError::MisalignedBase { address, required });
        }
        Ok(match arch {
            ArchVariant::T32 => Disassembler::T32(T32Disassembler::new(rdr)),
            ArchVariant::A64 => Disassembler::A64(A64Disassembler::new(rdr)),
        })
    }

    /// Decode the next instruction; `None` once the image is exhausted.
    pub fn disassemble_one(&mut self) -> Option<Instruction> {
        match self {
            Disassembler::T32(dasm) => dasm.disassemble_one(),
            Disassembler::A64(dasm) => dasm.disassemble_one(),
        }
    }
}

impl<R: ImageReader> Iterator for Disassembler<R> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Instruction> {
        self.disassemble_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;
    use crate::reader::SliceReader;

    #[test]
    fn test_misaligned_base_rejected() {
        let data = [0u8; 8];
        let err = Disassembler::new(ArchVariant::A64, SliceReader::new(&data, 0x1002))
            .err()
            .unwrap();
        assert_eq!(
            err,
            DisasmError::MisalignedBase {
                address: 0x1002,
                required: 4
            }
        );
        assert!(Disassembler::new(ArchVariant::T32, SliceReader::new(&data, 0x1002)).is_ok());
        assert!(Disassembler::new(ArchVariant::T32, SliceReader::new(&data, 0x1001)).is_err());
    }

    #[test]
    fn test_iterates_in_address_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xD280_0000u32.to_le_bytes());
        bytes.extend_from_slice(&0xD65F_03C0u32.to_le_bytes());
        let dasm = Disassembler::new(ArchVariant::A64, SliceReader::new(&bytes, 0x100)).unwrap();
        let insns: Vec<_> = dasm.collect();
        assert_eq!(insns.len(), 2);
        assert_eq!(insns[0].opcode, Opcode::Movz);
        assert_eq!(insns[1].opcode, Opcode::Ret);
        assert!(insns[0].address < insns[1].address);
    }
}
