// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The decoded instruction record.

use disarm_common::{Address, Condition, VectorKind};

use crate::opcode::Opcode;
use crate::operand::Operand;

/// One decoded instruction.
///
/// `address` is the first byte of the encoding and `length` the bytes it
/// occupies (2 or 4 for T32, always 4 for A64), so `address + length` is the
/// next instruction. An undecodable encoding is represented by
/// [`Opcode::Invalid`] with empty operands and address/length still filled
/// in; it is never omitted from the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
    pub address: Address,
    pub length: u8,
    pub condition: Condition,
    pub update_flags: bool,
    pub writeback: bool,
    /// Shift applied to the last operand (`Opcode::Invalid` when absent).
    pub shift_type: Opcode,
    pub shift_value: Option<Operand>,
    pub vector_data: VectorKind,
}

impl Instruction {
    /// The record emitted for undecodable encodings.
    pub fn invalid(address: Address, length: u8) -> Self {
        Instruction {
            opcode: Opcode::Invalid,
            operands: Vec::new(),
            address,
            length,
            condition: Condition::Al,
            update_flags: false,
            writeback: false,
            shift_type: Opcode::Invalid,
            shift_value: None,
            vector_data: VectorKind::Invalid,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.opcode != Opcode::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record() {
        let insn = Instruction::invalid(0x4000, 4);
        assert!(!insn.is_valid());
        assert_eq!(insn.address, 0x4000);
        assert_eq!(insn.length, 4);
        assert!(insn.operands.is_empty());
        assert_eq!(insn.condition, Condition::Al);
    }
}
