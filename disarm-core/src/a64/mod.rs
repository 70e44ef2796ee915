// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! A64 (AArch64) disassembler: fixed 32-bit encodings.

pub mod mutators;
pub mod table;

use crate::decoder::DecodeState;
use crate::instruction::Instruction;
use crate::reader::ImageReader;

/// Streaming A64 disassembler over an image reader.
pub struct A64Disassembler<R> {
    rdr: R,
}

impl<R: ImageReader> A64Disassembler<R> {
    pub fn new(rdr: R) -> Self {
        A64Disassembler { rdr }
    }

    /// Decode the next instruction; `None` once the image is exhausted.
    pub fn disassemble_one(&mut self) -> Option<Instruction> {
        let address = self.rdr.address();
        let word = self.rdr.try_read_u32_le()?;
        let mut st = DecodeState::new(address, 4);
        Some(table::root().decode(word, &mut st))
    }

    pub fn reader(&self) -> &R {
        &self.rdr
    }
}

impl<R: ImageReader> Iterator for A64Disassembler<R> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Instruction> {
        self.disassemble_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodeState;
    use crate::opcode::Opcode;
    use crate::operand::{Immediate, MemOperand, Operand};
    use crate::reader::SliceReader;
    use disarm_common::{Condition, PrimitiveType, Register};

    /// Decode a single word at address 0.
    fn decode(word: u32) -> Instruction {
        let mut st = DecodeState::new(0, 4);
        table::root().decode(word, &mut st)
    }

    #[test]
    fn test_decode_movz() {
        // mov x0, #0
        let insn = decode(0xD280_0000);
        assert_eq!(insn.opcode, Opcode::Movz);
        assert_eq!(insn.length, 4);
        assert_eq!(insn.operands.len(), 2);
        assert_eq!(insn.operands[0], Operand::Register(Register::x(0)));
        assert_eq!(
            insn.operands[1],
            Operand::Immediate(Immediate::Unsigned(0, PrimitiveType::Word64))
        );
        assert_eq!(insn.shift_type, Opcode::Invalid);
        assert!(insn.shift_value.is_none());
    }

    #[test]
    fn test_decode_movz_shifted() {
        // movz x0, #42, lsl #16
        let insn = decode(0xD2A0_0540);
        assert_eq!(insn.opcode, Opcode::Movz);
        assert_eq!(
            insn.operands[1],
            Operand::Immediate(Immediate::Unsigned(42, PrimitiveType::Word64))
        );
        assert_eq!(insn.shift_type, Opcode::Lsl);
        assert_eq!(
            insn.shift_value,
            Some(Operand::Immediate(Immediate::Unsigned(16, PrimitiveType::Byte)))
        );
    }

    #[test]
    fn test_decode_ret() {
        let insn = decode(0xD65F_03C0);
        assert_eq!(insn.opcode, Opcode::Ret);
        assert_eq!(insn.operands, vec![Operand::Register(Register::x(30))]);
    }

    #[test]
    fn test_decode_add_imm() {
        // add w0, w1, #1
        let insn = decode(0x1100_0420);
        assert_eq!(insn.opcode, Opcode::Add);
        assert_eq!(
            insn.operands,
            vec![
                Operand::Register(Register::w(0)),
                Operand::Register(Register::w(1)),
                Operand::Immediate(Immediate::Unsigned(1, PrimitiveType::Word32)),
            ]
        );
        assert!(!insn.update_flags);
    }

    #[test]
    fn test_decode_subs_sets_flags() {
        // subs x0, x0, #1
        let insn = decode(0xF100_0400);
        assert_eq!(insn.opcode, Opcode::Subs);
        assert!(insn.update_flags);
    }

    #[test]
    fn test_decode_invalid_word() {
        let insn = decode(0x0000_0000);
        assert_eq!(insn.opcode, Opcode::Invalid);
        assert_eq!(insn.length, 4);
        assert!(insn.operands.is_empty());
    }

    #[test]
    fn test_decode_branches() {
        let insn = decode(0x1400_0001); // b #4
        assert_eq!(insn.opcode, Opcode::B);
        assert_eq!(insn.operands, vec![Operand::Address(4)]);

        let insn = decode(0x9400_0002); // bl #8
        assert_eq!(insn.opcode, Opcode::Bl);
        assert_eq!(insn.operands, vec![Operand::Address(8)]);

        let insn = decode(0x5400_0020); // b.eq #4
        assert_eq!(insn.opcode, Opcode::B);
        assert_eq!(insn.condition, Condition::Eq);
        assert_eq!(insn.operands, vec![Operand::Address(4)]);

        let insn = decode(0xB400_0040); // cbz x0, #8
        assert_eq!(insn.opcode, Opcode::Cbz);
        assert_eq!(
            insn.operands,
            vec![Operand::Register(Register::x(0)), Operand::Address(8)]
        );

        let insn = decode(0x3640_0041); // tbz w1, #8, #8
        assert_eq!(insn.opcode, Opcode::Tbz);
        assert_eq!(
            insn.operands,
            vec![
                Operand::Register(Register::w(1)),
                Operand::Immediate(Immediate::Unsigned(8, PrimitiveType::Byte)),
                Operand::Address(8),
            ]
        );
    }

    #[test]
    fn test_decode_adrp() {
        // adrp x1, one page up, from address 0x1000
        let mut st = DecodeState::new(0x1234, 4);
        let insn = table::root().decode(0xB000_0001, &mut st);
        assert_eq!(insn.opcode, Opcode::Adrp);
        assert_eq!(insn.operands[0], Operand::Register(Register::x(1)));
        assert_eq!(insn.operands[1], Operand::Address(0x2000));
    }

    #[test]
    fn test_decode_system() {
        assert_eq!(decode(0xD503_201F).opcode, Opcode::Nop);
        assert_eq!(decode(0xD503_203F).opcode, Opcode::Yield);
        assert_eq!(decode(0xD503_205F).opcode, Opcode::Wfe);

        let insn = decode(0xD503_3BBF); // dmb ish
        assert_eq!(insn.opcode, Opcode::Dmb);
        assert_eq!(
            insn.operands,
            vec![Operand::Barrier(disarm_common::BarrierOption::Ish)]
        );

        let insn = decode(0xD400_0001); // svc #0
        assert_eq!(insn.opcode, Opcode::Svc);
        let insn = decode(0xD420_0540); // brk #42
        assert_eq!(insn.opcode, Opcode::Brk);
        assert_eq!(
            insn.operands,
            vec![Operand::Immediate(Immediate::Unsigned(42, PrimitiveType::Word16))]
        );
    }

    #[test]
    fn test_decode_logical_imm() {
        // orr w0, w1, #1
        let insn = decode(0x3200_0020);
        assert_eq!(insn.opcode, Opcode::Orr);
        assert_eq!(
            insn.operands[2],
            Operand::Immediate(Immediate::Unsigned(1, PrimitiveType::Word32))
        );
        // and x0, x0, #0xFF
        let insn = decode(0x9240_1C00);
        assert_eq!(insn.opcode, Opcode::And);
        assert_eq!(
            insn.operands[2],
            Operand::Immediate(Immediate::Unsigned(0xFF, PrimitiveType::Word64))
        );
    }

    #[test]
    fn test_decode_ldst() {
        // str x0, [x1]
        let insn = decode(0xF900_0020);
        assert_eq!(insn.opcode, Opcode::Str);
        assert_eq!(
            insn.operands,
            vec![
                Operand::Register(Register::x(0)),
                Operand::Memory(MemOperand::offset(Register::x(1), None, PrimitiveType::Word64)),
            ]
        );

        // ldr x0, [x1, #16]
        let insn = decode(0xF940_0820);
        assert_eq!(insn.opcode, Opcode::Ldr);
        match &insn.operands[1] {
            Operand::Memory(m) => {
                assert_eq!(m.offset, Some(Immediate::Unsigned(16, PrimitiveType::Word64)));
            }
            other => panic!("expected memory operand, got {other:?}"),
        }

        // ldrb w2, [x3, x4]
        let insn = decode(0x3864_6862);
        assert_eq!(insn.opcode, Opcode::Ldrb);
        match &insn.operands[1] {
            Operand::Memory(m) => {
                assert_eq!(m.base, Register::x(3));
                assert_eq!(m.index, Some(Register::x(4)));
                assert_eq!(m.index_extend, Opcode::Lsl);
            }
            other => panic!("expected memory operand, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_ldst_pair() {
        // stp x29, x30, [sp, #-16]!
        let insn = decode(0xA9BF_7BFD);
        assert_eq!(insn.opcode, Opcode::Stp);
        assert!(insn.writeback);
        assert_eq!(insn.operands[0], Operand::Register(Register::x(29)));
        assert_eq!(insn.operands[1], Operand::Register(Register::x(30)));
        match &insn.operands[2] {
            Operand::Memory(m) => {
                assert_eq!(m.base, Register::x(31));
                assert!(m.pre_index);
                assert_eq!(m.offset, Some(Immediate::Signed(-16, PrimitiveType::Int64)));
            }
            other => panic!("expected memory operand, got {other:?}"),
        }

        // ldp x29, x30, [sp], #16
        let insn = decode(0xA8C1_7BFD);
        assert_eq!(insn.opcode, Opcode::Ldp);
        assert!(insn.writeback);
        match &insn.operands[2] {
            Operand::Memory(m) => {
                assert!(m.post_index);
                assert_eq!(m.offset, Some(Immediate::Signed(16, PrimitiveType::Int64)));
            }
            other => panic!("expected memory operand, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_dp_reg() {
        // udiv w0, w1, w2
        let insn = decode(0x1AC2_0820);
        assert_eq!(insn.opcode, Opcode::Udiv);
        // madd x0, x1, x2, x3
        let insn = decode(0x9B02_0C20);
        assert_eq!(insn.opcode, Opcode::Madd);
        assert_eq!(insn.operands.len(), 4);
        // csel x0, x1, x2, ne
        let insn = decode(0x9A82_1020);
        assert_eq!(insn.opcode, Opcode::Csel);
        assert_eq!(insn.operands[3], Operand::Condition(Condition::Ne));
        // orr x0, xzr, x2 (mov alias, stays orr at record level)
        let insn = decode(0xAA02_03E0);
        assert_eq!(insn.opcode, Opcode::Orr);
    }

    #[test]
    fn test_decode_fp() {
        // fadd s0, s1, s2
        let insn = decode(0x1E22_2820);
        assert_eq!(insn.opcode, Opcode::Fadd);
        assert_eq!(insn.operands[0], Operand::Register(Register::s(0)));
        // fcmp s1, s2
        let insn = decode(0x1E22_2020);
        assert_eq!(insn.opcode, Opcode::Fcmp);
        // fmov d0, #1.0
        let insn = decode(0x1E6E_1000);
        assert_eq!(insn.opcode, Opcode::Fmov);
        assert_eq!(insn.operands[0], Operand::Register(Register::d(0)));
        assert_eq!(insn.operands[1], Operand::Immediate(Immediate::Real64(1.0)));
        // fmadd d0, d1, d2, d3
        let insn = decode(0x1F42_0C20);
        assert_eq!(insn.opcode, Opcode::Fmadd);
        assert_eq!(insn.operands.len(), 4);
    }

    #[test]
    fn test_decode_movi() {
        // movi v0.4s, #0xAB
        let insn = decode(0x4F05_0560);
        assert_eq!(insn.opcode, Opcode::Movi);
        assert_eq!(insn.vector_data, disarm_common::VectorKind::I32);
        assert_eq!(insn.operands[0], Operand::Register(Register::q(0)));
        assert_eq!(
            insn.operands[1],
            Operand::Immediate(Immediate::Unsigned(0x0000_00AB_0000_00AB, PrimitiveType::Word64))
        );
    }

    #[test]
    fn test_stream_truncation() {
        // Two bytes cannot hold an A64 instruction.
        let data = [0x00, 0xD2];
        let mut dasm = A64Disassembler::new(SliceReader::new(&data, 0));
        assert!(dasm.disassemble_one().is_none());
    }

    #[test]
    fn test_stream_addresses_and_recovery() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0000_0000u32.to_le_bytes()); // invalid
        bytes.extend_from_slice(&0xD280_0000u32.to_le_bytes()); // mov x0, #0
        bytes.extend_from_slice(&0xD65F_03C0u32.to_le_bytes()); // ret
        let mut dasm = A64Disassembler::new(SliceReader::new(&bytes, 0x4000));

        let insn = dasm.disassemble_one().unwrap();
        assert_eq!(insn.opcode, Opcode::Invalid);
        assert_eq!(insn.address, 0x4000);
        // The stream recovers at the next aligned instruction.
        let insn = dasm.disassemble_one().unwrap();
        assert_eq!(insn.opcode, Opcode::Movz);
        assert_eq!(insn.address, 0x4004);
        let insn = dasm.disassemble_one().unwrap();
        assert_eq!(insn.opcode, Opcode::Ret);
        assert_eq!(insn.address, 0x4008);
        assert!(dasm.disassemble_one().is_none());
    }

    /// Decoder totality: no input may panic, and the bookkeeping fields are
    /// always exact.
    #[test]
    fn test_totality_fuzz() {
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        for _ in 0..200_000 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let word = state as u32;

            let bytes = word.to_le_bytes();
            let mut dasm = A64Disassembler::new(SliceReader::new(&bytes, 0x10_0000));
            let insn = dasm.disassemble_one().expect("one full word available");
            assert_eq!(insn.length, 4);
            assert_eq!(insn.address, 0x10_0000);
            assert_eq!(
                insn.address + insn.length as u64,
                dasm.reader().address(),
                "address accounting broke for {word:#010X}"
            );
        }
    }
}
