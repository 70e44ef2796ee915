// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! T32-specific operand mutators.
//!
//! PC-relative forms use `address + 4` as the branch base (the pipeline
//! convention); literal addressing additionally aligns the base down to a
//! word boundary. For 32-bit encodings the word passed to a mutator is
//! `hw1:hw2` with the leading halfword in the upper 16 bits.

use disarm_common::{Condition, PrimitiveType, Register, RegisterFamily};

use crate::bitfield::{self, Bitfield};
use crate::decoder::{fields, reg, reg_fields, Mutator};
use crate::immediates;
use crate::opcode::Opcode;
use crate::operand::{Immediate, MemOperand, Operand};

// ---------------------------------------------------------------------------
// Register shorthands
// ---------------------------------------------------------------------------

/// Low register (3-bit field).
pub fn r(pos: u32) -> Mutator {
    reg(RegisterFamily::W, pos, 3)
}

/// Full register (4-bit field, 32-bit encodings and hi-register forms).
pub fn r4(pos: u32) -> Mutator {
    reg(RegisterFamily::W, pos, 4)
}

/// Hi-register destination split as DN:rdn (bit 7 + bits 0..2).
pub fn rdn() -> Mutator {
    reg_fields(RegisterFamily::W, &[(7, 1), (0, 3)])
}

/// The stack pointer as an explicit operand (r13).
pub fn sp_reg() -> Mutator {
    Box::new(|_, st| {
        st.push(Operand::Register(Register::w(13)));
        true
    })
}

// ---------------------------------------------------------------------------
// Branch displacements
// ---------------------------------------------------------------------------

/// Narrow branch target: `address + 4 + sext(field) << 1`.
pub fn branch_disp16(pos: u32, len: u32) -> Mutator {
    let f = Bitfield::new(pos, len);
    Box::new(move |word, st| {
        let disp = f.read_signed(word) << 1;
        st.push(Operand::Address((st.address + 4).wrapping_add_signed(disp)));
        true
    })
}

/// cbz/cbnz forward target from i:imm5.
pub fn cbz_disp() -> Mutator {
    let fs = fields(&[(9, 1), (3, 5)]);
    Box::new(move |word, st| {
        let disp = bitfield::read_fields(&fs, word) << 1;
        st.push(Operand::Address(st.address + 4 + disp));
        true
    })
}

/// Conditional branch T3: S:J2:J1:imm6:imm11, scaled by 2.
pub fn bcond_disp_t3() -> Mutator {
    let fs = fields(&[(26, 1), (11, 1), (13, 1), (16, 6), (0, 11)]);
    Box::new(move |word, st| {
        let disp = bitfield::read_signed_fields_shifted(&fs, word, 1);
        st.push(Operand::Address((st.address + 4).wrapping_add_signed(disp)));
        true
    })
}

/// b/bl T4 displacement: S:I1:I2:imm10:imm11 where I1/I2 fold J1/J2 with S.
fn t4_disp(word: u32) -> i64 {
    let s = (word >> 26) & 1;
    let i1 = !(((word >> 13) & 1) ^ s) & 1;
    let i2 = !(((word >> 11) & 1) ^ s) & 1;
    let imm10 = (word >> 16) & 0x3FF;
    let imm11 = word & 0x7FF;
    let packed = (s << 24) | (i1 << 23) | (i2 << 22) | (imm10 << 12) | (imm11 << 1);
    bitfield::sign_extend(packed as u64, 25)
}

pub fn bw_disp_t4() -> Mutator {
    Box::new(move |word, st| {
        st.push(Operand::Address((st.address + 4).wrapping_add_signed(t4_disp(word))));
        true
    })
}

/// blx T2: like T4 but the target is word-aligned and bit 0 must be clear.
pub fn blx_disp() -> Mutator {
    Box::new(move |word, st| {
        if word & 1 != 0 {
            return false;
        }
        let base = (st.address + 4) & !3;
        st.push(Operand::Address(base.wrapping_add_signed(t4_disp(word))));
        true
    })
}

// ---------------------------------------------------------------------------
// Literal addressing
// ---------------------------------------------------------------------------

/// Word-aligned PC-relative address: `align4(address + 4) + field << scale`.
pub fn pc_lit(pos: u32, len: u32, scale: u32) -> Mutator {
    let f = Bitfield::new(pos, len);
    Box::new(move |word, st| {
        let base = (st.address + 4) & !3;
        st.push(Operand::Address(base + ((f.read(word) as u64) << scale)));
        true
    })
}

/// Wide `adr`: i:imm3:imm8 added to or subtracted from the aligned base.
pub fn adr_w(add: bool) -> Mutator {
    let fs = fields(&[(26, 1), (12, 3), (0, 8)]);
    Box::new(move |word, st| {
        let base = (st.address + 4) & !3;
        let offset = bitfield::read_fields(&fs, word);
        let target = if add { base + offset } else { base.wrapping_sub(offset) };
        st.push(Operand::Address(target));
        true
    })
}

/// Wide literal form: imm12 added to or subtracted from the aligned base
/// per the U bit.
pub fn pc_lit_w() -> Mutator {
    let f = Bitfield::new(0, 12);
    Box::new(move |word, st| {
        let base = (st.address + 4) & !3;
        let offset = f.read(word) as u64;
        let target = if (word >> 23) & 1 != 0 {
            base + offset
        } else {
            base.wrapping_sub(offset)
        };
        st.push(Operand::Address(target));
        true
    })
}

// ---------------------------------------------------------------------------
// Immediates
// ---------------------------------------------------------------------------

/// T32 modified immediate from i:imm3:imm8.
pub fn modified_imm() -> Mutator {
    let fs = fields(&[(26, 1), (12, 3), (0, 8)]);
    Box::new(move |word, st| {
        let imm12 = bitfield::read_fields(&fs, word) as u32;
        st.push(Operand::Immediate(Immediate::Unsigned(
            immediates::modified_immediate(imm12) as u64,
            PrimitiveType::Word32,
        )));
        true
    })
}

/// Narrow shift amount; a zero encoding means 32 for lsr/asr.
pub fn shift_amount16(full_range: bool) -> Mutator {
    let f = Bitfield::new(6, 5);
    Box::new(move |word, st| {
        let mut amount = f.read(word) as u64;
        if amount == 0 && full_range {
            amount = 32;
        }
        st.push(Operand::Immediate(Immediate::Unsigned(amount, PrimitiveType::Byte)));
        true
    })
}

/// Bitfield width encoded as width-1 (sbfx/ubfx).
pub fn width_m1(pos: u32, len: u32) -> Mutator {
    let f = Bitfield::new(pos, len);
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Unsigned(
            f.read(word) as u64 + 1,
            PrimitiveType::Byte,
        )));
        true
    })
}

/// bfi/bfc lsb and width operands; the msb field must not precede the lsb.
pub fn bf_lsb_width() -> Mutator {
    let lsb_fields = fields(&[(12, 3), (6, 2)]);
    Box::new(move |word, st| {
        let lsb = bitfield::read_fields(&lsb_fields, word);
        let msb = (word & 0x1F) as u64;
        if msb < lsb {
            return false;
        }
        st.push(Operand::Immediate(Immediate::Unsigned(lsb, PrimitiveType::Byte)));
        st.push(Operand::Immediate(Immediate::Unsigned(msb - lsb + 1, PrimitiveType::Byte)));
        true
    })
}

/// The sbfx/ubfx lsb operand from imm3:imm2.
pub fn lsb_imm() -> Mutator {
    let fs = fields(&[(12, 3), (6, 2)]);
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Unsigned(
            bitfield::read_fields(&fs, word),
            PrimitiveType::Byte,
        )));
        true
    })
}

// ---------------------------------------------------------------------------
// IT block
// ---------------------------------------------------------------------------

/// The `it` condition operand, with the UNPREDICTABLE encodings rejected.
pub fn it_op() -> Mutator {
    Box::new(move |word, st| {
        let firstcond = (word >> 4) & 0xF;
        let mask = word & 0xF;
        if mask == 0 || firstcond == 0xF {
            return false;
        }
        if firstcond == 0xE && mask.count_ones() > 1 {
            return false;
        }
        st.push(Operand::Condition(Condition::from_bits(firstcond)));
        true
    })
}

/// Initial IT driver state: the mask's then/else bits (above the
/// terminator) re-expressed as else-flags relative to the base condition.
pub fn it_initial_state(firstcond: u32, mask: u32) -> u8 {
    let mask = mask & 0xF;
    if mask == 0 {
        return 0;
    }
    let terminator = mask.trailing_zeros();
    let above = 0xF & !((1 << (terminator + 1)) - 1);
    if firstcond & 1 != 0 {
        (mask ^ above) as u8
    } else {
        mask as u8
    }
}

// ---------------------------------------------------------------------------
// Register lists
// ---------------------------------------------------------------------------

/// One register operand per set bit of the low `count` bits.
pub fn reglist(count: u32) -> Mutator {
    Box::new(move |word, st| {
        for i in 0..count {
            if (word >> i) & 1 != 0 {
                st.push(Operand::Register(Register::w(i as u8)));
            }
        }
        true
    })
}

/// One extra register appended when the flag bit is set (push lr, pop pc).
pub fn reglist_extra(pos: u32, index: u8) -> Mutator {
    Box::new(move |word, st| {
        if (word >> pos) & 1 != 0 {
            st.push(Operand::Register(Register::w(index)));
        }
        true
    })
}

/// ldm writes back unless the base register is also loaded.
pub fn ldm_wback(base_pos: u32, base_len: u32) -> Mutator {
    let f = Bitfield::new(base_pos, base_len);
    Box::new(move |word, st| {
        let base = f.read(word);
        st.writeback = (word >> base) & 1 == 0;
        true
    })
}

// ---------------------------------------------------------------------------
// Memory addressing
// ---------------------------------------------------------------------------

/// Narrow base + scaled imm5: `[rn, #imm5 << log2(size)]`.
pub fn mem_imm5(ty: PrimitiveType) -> Mutator {
    let f = Bitfield::new(6, 5);
    Box::new(move |word, st| {
        let base = Register::w(((word >> 3) & 7) as u8);
        let offset = (f.read(word) as u64) << ty.log2_size();
        let imm = (offset != 0).then_some(Immediate::Unsigned(offset, PrimitiveType::Word32));
        st.push(Operand::Memory(MemOperand::offset(base, imm, ty)));
        true
    })
}

/// SP-relative word access: `[sp, #imm8 << 2]`.
pub fn mem_sp8() -> Mutator {
    let f = Bitfield::new(0, 8);
    Box::new(move |word, st| {
        let offset = (f.read(word) as u64) << 2;
        let imm = (offset != 0).then_some(Immediate::Unsigned(offset, PrimitiveType::Word32));
        st.push(Operand::Memory(MemOperand::offset(
            Register::w(13),
            imm,
            PrimitiveType::Word32,
        )));
        true
    })
}

/// Narrow register-offset access: `[rn, rm]`.
pub fn mem_reg16(ty: PrimitiveType) -> Mutator {
    Box::new(move |word, st| {
        let base = Register::w(((word >> 3) & 7) as u8);
        let index = Register::w(((word >> 6) & 7) as u8);
        st.push(Operand::Memory(MemOperand::indexed(
            base,
            index,
            Opcode::Invalid,
            0,
            ty,
        )));
        true
    })
}

/// Wide unsigned-offset access: `[rn, #imm12]`.
pub fn mem_w_imm12(ty: PrimitiveType) -> Mutator {
    let f = Bitfield::new(0, 12);
    Box::new(move |word, st| {
        let base = Register::w(((word >> 16) & 0xF) as u8);
        let offset = f.read(word) as u64;
        let imm = (offset != 0).then_some(Immediate::Unsigned(offset, PrimitiveType::Word32));
        st.push(Operand::Memory(MemOperand::offset(base, imm, ty)));
        true
    })
}

/// Wide imm8 access with P/U/W control (offset, pre- and post-indexed,
/// negative offsets).
pub fn mem_w_imm8(ty: PrimitiveType) -> Mutator {
    Box::new(move |word, st| {
        let base = Register::w(((word >> 16) & 0xF) as u8);
        let p = (word >> 10) & 1;
        let u = (word >> 9) & 1;
        let wb = (word >> 8) & 1;
        let imm8 = (word & 0xFF) as i64;
        let disp = if u != 0 { imm8 } else { -imm8 };
        let imm = Immediate::Signed(disp, PrimitiveType::Int32);
        match (p, wb) {
            (1, 0) => st.push(Operand::Memory(MemOperand::offset(base, Some(imm), ty))),
            (1, 1) => {
                st.writeback = true;
                st.push(Operand::Memory(MemOperand::adjusting(base, imm, false, ty)));
            }
            (0, 1) => {
                st.writeback = true;
                st.push(Operand::Memory(MemOperand::adjusting(base, imm, true, ty)));
            }
            _ => return false,
        }
        true
    })
}

/// Wide register-offset access: `[rn, rm, lsl #imm2]`.
pub fn mem_w_reg(ty: PrimitiveType) -> Mutator {
    Box::new(move |word, st| {
        let base = Register::w(((word >> 16) & 0xF) as u8);
        let index = Register::w((word & 0xF) as u8);
        let shift = ((word >> 4) & 3) as u8;
        let extend = if shift != 0 { Opcode::Lsl } else { Opcode::Invalid };
        st.push(Operand::Memory(MemOperand::indexed(base, index, extend, shift, ty)));
        true
    })
}

/// Exclusive-access offset form: `[rn, #imm8 << 2]`, always positive.
pub fn mem_w_excl() -> Mutator {
    let f = Bitfield::new(0, 8);
    Box::new(move |word, st| {
        let base = Register::w(((word >> 16) & 0xF) as u8);
        let offset = (f.read(word) as u64) << 2;
        let imm = (offset != 0).then_some(Immediate::Unsigned(offset, PrimitiveType::Word32));
        st.push(Operand::Memory(MemOperand::offset(base, imm, PrimitiveType::Word32)));
        true
    })
}

/// ldrd/strd addressing: imm8 scaled by 4 with P/U/W in the first halfword.
pub fn mem_w_dual() -> Mutator {
    Box::new(move |word, st| {
        let base = Register::w(((word >> 16) & 0xF) as u8);
        let p = (word >> 24) & 1;
        let u = (word >> 23) & 1;
        let wb = (word >> 21) & 1;
        let imm8 = ((word & 0xFF) << 2) as i64;
        let disp = if u != 0 { imm8 } else { -imm8 };
        let imm = Immediate::Signed(disp, PrimitiveType::Int32);
        let ty = PrimitiveType::Word64;
        match (p, wb) {
            (1, 0) => st.push(Operand::Memory(MemOperand::offset(base, Some(imm), ty))),
            (1, 1) => {
                st.writeback = true;
                st.push(Operand::Memory(MemOperand::adjusting(base, imm, false, ty)));
            }
            (0, 1) => {
                st.writeback = true;
                st.push(Operand::Memory(MemOperand::adjusting(base, imm, true, ty)));
            }
            _ => return false,
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodeState;

    #[test]
    fn test_it_initial_state() {
        // it ne (mask 1000): one slot, then terminate.
        assert_eq!(it_initial_state(0b0001, 0b1000), 0x08);
        // itt ne: two then-slots.
        assert_eq!(it_initial_state(0b0001, 0b1100), 0x04);
        // itete eq: alternating slots, base condition even.
        assert_eq!(it_initial_state(0b0000, 0b1011), 0x0B);
    }

    #[test]
    fn test_branch_disp16_backwards() {
        let m = branch_disp16(0, 11);
        let mut st = DecodeState::new(0x100, 2);
        // imm11 = -2 (0x7FE) -> target = 0x100 + 4 - 4 = 0x100
        assert!(m(0x7FE, &mut st));
        assert_eq!(st.operands[0], Operand::Address(0x100));
    }

    #[test]
    fn test_t4_disp_folding() {
        // bl with S=0, J1=J2=1 (the canonical near-forward form), imm11=1.
        let word: u32 = (1 << 13) | (1 << 11) | 1;
        assert_eq!(t4_disp(word), 2);
        // All sign bits set: S=1, J1=J2=1 -> I1=I2=1, disp = -2 with imm11=0x7FF.
        let word: u32 = (1 << 26) | (1 << 13) | (1 << 11) | 0x7FF | (0x3FF << 16);
        assert_eq!(t4_disp(word), -2);
    }

    #[test]
    fn test_reglist() {
        let m = reglist(8);
        let mut st = DecodeState::new(0, 2);
        assert!(m(0b1010_0001, &mut st));
        assert_eq!(st.operands.len(), 3);
        assert_eq!(st.operands[0], Operand::Register(Register::w(0)));
        assert_eq!(st.operands[1], Operand::Register(Register::w(5)));
        assert_eq!(st.operands[2], Operand::Register(Register::w(7)));
    }

    #[test]
    fn test_mem_w_imm8_forms() {
        let m = mem_w_imm8(PrimitiveType::Word32);
        let mut st = DecodeState::new(0, 4);
        // P=1 U=0 W=0: negative offset, no writeback.
        assert!(m((1 << 10) | (2 << 16) | 8, &mut st));
        match &st.operands[0] {
            Operand::Memory(mem) => {
                assert_eq!(mem.offset, Some(Immediate::Signed(-8, PrimitiveType::Int32)));
                assert!(!mem.pre_index && !mem.post_index);
            }
            other => panic!("expected memory operand, got {other:?}"),
        }
        // P=0 W=0 is undefined.
        assert!(!m(2 << 16, &mut st));
    }
}
