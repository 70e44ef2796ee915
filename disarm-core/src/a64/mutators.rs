// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! A64-specific operand mutators.
//!
//! Shorthand register extractors plus everything whose semantics depend on
//! A64 encoding rules: PC-relative forms, the memory addressing family with
//! its size-scaled offsets, wide-move shifts, packed-immediate operands.

use disarm_common::{PrimitiveType, Register, RegisterFamily, VectorKind};

use crate::bitfield::{self, Bitfield};
use crate::decoder::{fields, reg, Mutator};
use crate::immediates;
use crate::opcode::Opcode;
use crate::operand::{Immediate, MemOperand, Operand};

// ---------------------------------------------------------------------------
// Register shorthands (all A64 register numbers are 5 bits)
// ---------------------------------------------------------------------------

pub fn w(pos: u32) -> Mutator {
    reg(RegisterFamily::W, pos, 5)
}

pub fn x(pos: u32) -> Mutator {
    reg(RegisterFamily::X, pos, 5)
}

pub fn breg(pos: u32) -> Mutator {
    reg(RegisterFamily::B, pos, 5)
}

pub fn hreg(pos: u32) -> Mutator {
    reg(RegisterFamily::H, pos, 5)
}

pub fn sreg(pos: u32) -> Mutator {
    reg(RegisterFamily::S, pos, 5)
}

pub fn dreg(pos: u32) -> Mutator {
    reg(RegisterFamily::D, pos, 5)
}

pub fn qreg(pos: u32) -> Mutator {
    reg(RegisterFamily::Q, pos, 5)
}

/// GP register sized by the `sf` bit (bit 31).
pub fn reg_sf(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 5);
    Box::new(move |word, st| {
        let family = if word >> 31 != 0 {
            RegisterFamily::X
        } else {
            RegisterFamily::W
        };
        st.push(Operand::Register(Register::new(family, f.read(word) as u8)));
        true
    })
}

/// GP register sized by the load/store `size` field (bits 30..31); X only
/// for doubleword accesses.
pub fn reg_sized(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 5);
    Box::new(move |word, st| {
        let family = if (word >> 30) & 3 == 3 {
            RegisterFamily::X
        } else {
            RegisterFamily::W
        };
        st.push(Operand::Register(Register::new(family, f.read(word) as u8)));
        true
    })
}

/// FP register sized by the `ftype` field (bits 22..23); ftype 10 is
/// reserved.
pub fn freg(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 5);
    Box::new(move |word, st| {
        let family = match (word >> 22) & 3 {
            0 => RegisterFamily::S,
            1 => RegisterFamily::D,
            3 => RegisterFamily::H,
            _ => return false,
        };
        st.push(Operand::Register(Register::new(family, f.read(word) as u8)));
        true
    })
}

/// Extended-register Rm of add/sub (extended register): the 64-bit view
/// only for the x-extension options.
pub fn rm_extended(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 5);
    Box::new(move |word, st| {
        let family = if (word >> 13) & 3 == 3 {
            RegisterFamily::X
        } else {
            RegisterFamily::W
        };
        st.push(Operand::Register(Register::new(family, f.read(word) as u8)));
        true
    })
}

// ---------------------------------------------------------------------------
// PC-relative operands
// ---------------------------------------------------------------------------

/// `adr`: immhi:immlo displacement from the instruction address.
pub fn pc_rel() -> Mutator {
    let fs = fields(&[(5, 19), (29, 2)]);
    Box::new(move |word, st| {
        let disp = bitfield::read_signed_fields(&fs, word);
        st.push(Operand::Address(st.address.wrapping_add_signed(disp)));
        true
    })
}

/// `adrp`: displacement of 4K pages from the instruction's page.
pub fn pc_rel_page() -> Mutator {
    let fs = fields(&[(5, 19), (29, 2)]);
    Box::new(move |word, st| {
        let disp = bitfield::read_signed_fields(&fs, word) << 12;
        let page = st.address & !0xFFF;
        st.push(Operand::Address(page.wrapping_add_signed(disp)));
        true
    })
}

/// Branch displacement: signed field scaled by 4 from the instruction
/// address.
pub fn jdisp(pos: u32, len: u32) -> Mutator {
    let f = Bitfield::new(pos, len);
    Box::new(move |word, st| {
        let disp = f.read_signed(word) << 2;
        st.push(Operand::Address(st.address.wrapping_add_signed(disp)));
        true
    })
}

/// tbz/tbnz bit number from b5:b40.
pub fn test_bit() -> Mutator {
    let fs = fields(&[(31, 1), (19, 5)]);
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Unsigned(
            bitfield::read_fields(&fs, word),
            PrimitiveType::Byte,
        )));
        true
    })
}

// ---------------------------------------------------------------------------
// Packed immediates
// ---------------------------------------------------------------------------

/// Expanded logical immediate from N:immr:imms; fails on the reserved
/// encodings (and on N=1 in 32-bit forms).
pub fn logical_imm(ty: PrimitiveType) -> Mutator {
    Box::new(move |word, st| {
        let n = (word >> 22) & 1;
        let immr = (word >> 16) & 0x3F;
        let imms = (word >> 10) & 0x3F;
        match immediates::logical_immediate(n, immr, imms, ty) {
            Some(value) => {
                st.push(Operand::Immediate(Immediate::Unsigned(value, ty)));
                true
            }
            None => false,
        }
    })
}

/// Bitfield-instruction immr/imms pair as two integer operands; validates N
/// against the register width.
pub fn bitmask_rs(ty: PrimitiveType) -> Mutator {
    Box::new(move |word, st| {
        let n = (word >> 22) & 1;
        let is64 = ty.size_bytes() == 8;
        if is64 != (n == 1) {
            return false;
        }
        let immr = ((word >> 16) & 0x3F) as u64;
        let imms = ((word >> 10) & 0x3F) as u64;
        if !is64 && (immr >= 32 || imms >= 32) {
            return false;
        }
        st.push(Operand::Immediate(Immediate::Unsigned(immr, ty)));
        st.push(Operand::Immediate(Immediate::Unsigned(imms, ty)));
        true
    })
}

/// Wide-move `hw` field: `lsl #16*hw` shift context; 32-bit forms only
/// allow hw < 2.
pub fn mov_wide_shift(pos: u32, ty: PrimitiveType) -> Mutator {
    let f = Bitfield::new(pos, 2);
    Box::new(move |word, st| {
        let hw = f.read(word);
        if ty.size_bytes() == 4 && hw > 1 {
            return false;
        }
        if hw != 0 {
            st.shift_type = Opcode::Lsl;
            st.shift_value = Some(Operand::Immediate(Immediate::Unsigned(
                16 * hw as u64,
                PrimitiveType::Byte,
            )));
        }
        true
    })
}

/// add/sub immediate `sh` bit: `lsl #12` when set.
pub fn lsl12(pos: u32) -> Mutator {
    Box::new(move |word, st| {
        if (word >> pos) & 1 != 0 {
            st.shift_type = Opcode::Lsl;
            st.shift_value = Some(Operand::Immediate(Immediate::Unsigned(
                12,
                PrimitiveType::Byte,
            )));
        }
        true
    })
}

/// Fixed-point-conversion fractional bits: `64 - scale`; 32-bit forms
/// require scale >= 32.
pub fn fbits() -> Mutator {
    Box::new(move |word, st| {
        let scale = (word >> 10) & 0x3F;
        if word >> 31 == 0 && scale < 32 {
            return false;
        }
        st.push(Operand::Immediate(Immediate::Unsigned(
            64 - scale as u64,
            PrimitiveType::Byte,
        )));
        true
    })
}

// ---------------------------------------------------------------------------
// Floating-point literal operands
// ---------------------------------------------------------------------------

pub fn fp16_imm(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 8);
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Real16(
            immediates::fp_expand_imm16(f.read(word)),
        )));
        true
    })
}

pub fn fp32_imm(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 8);
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Real32(
            immediates::fp_expand_imm32(f.read(word)),
        )));
        true
    })
}

pub fn fp64_imm(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 8);
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Real64(
            immediates::fp_expand_imm64(f.read(word)),
        )));
        true
    })
}

/// fcmp-with-zero second operand, sized by ftype.
pub fn fp_zero() -> Mutator {
    Box::new(move |word, st| {
        let imm = match (word >> 22) & 3 {
            0 => Immediate::Real32(0.0),
            1 => Immediate::Real64(0.0),
            3 => Immediate::Real16(0),
            _ => return false,
        };
        st.push(Operand::Immediate(imm));
        true
    })
}

// ---------------------------------------------------------------------------
// Memory addressing
// ---------------------------------------------------------------------------

fn base_reg(word: u32) -> Register {
    Register::x(((word >> 5) & 0x1F) as u8)
}

/// `[Xn]` sized by the load/store `size` field (exclusive/ordered
/// accesses).
pub fn mem_base_sized() -> Mutator {
    Box::new(move |word, st| {
        let ty = size_field_ty(word);
        st.push(Operand::Memory(MemOperand::offset(base_reg(word), None, ty)));
        true
    })
}

fn size_field_ty(word: u32) -> PrimitiveType {
    match (word >> 30) & 3 {
        0 => PrimitiveType::Byte,
        1 => PrimitiveType::Word16,
        2 => PrimitiveType::Word32,
        _ => PrimitiveType::Word64,
    }
}

/// Unsigned scaled offset: imm12 shifted left by log2(sizeof ty).
pub fn mem_off(ty: PrimitiveType) -> Mutator {
    let f = Bitfield::new(10, 12);
    Box::new(move |word, st| {
        let offset = (f.read(word) as u64) << ty.log2_size();
        let imm = (offset != 0).then_some(Immediate::Unsigned(offset, PrimitiveType::Word64));
        st.push(Operand::Memory(MemOperand::offset(base_reg(word), imm, ty)));
        true
    })
}

/// Unscaled signed 9-bit offset.
pub fn mem_unscaled(ty: PrimitiveType) -> Mutator {
    let f = Bitfield::new(12, 9);
    Box::new(move |word, st| {
        let disp = f.read_signed(word);
        let imm = (disp != 0).then_some(Immediate::Signed(disp, PrimitiveType::Int64));
        st.push(Operand::Memory(MemOperand::offset(base_reg(word), imm, ty)));
        true
    })
}

fn mem_adjusting(ty: PrimitiveType, post: bool) -> Mutator {
    let f = Bitfield::new(12, 9);
    Box::new(move |word, st| {
        let disp = f.read_signed(word);
        st.writeback = true;
        st.push(Operand::Memory(MemOperand::adjusting(
            base_reg(word),
            Immediate::Signed(disp, PrimitiveType::Int64),
            post,
            ty,
        )));
        true
    })
}

/// Pre-indexed signed 9-bit offset with writeback.
pub fn mem_pre(ty: PrimitiveType) -> Mutator {
    mem_adjusting(ty, false)
}

/// Post-indexed signed 9-bit offset with writeback.
pub fn mem_post(ty: PrimitiveType) -> Mutator {
    mem_adjusting(ty, true)
}

fn pair_disp(word: u32, ty: PrimitiveType) -> i64 {
    Bitfield::new(15, 7).read_signed(word) << ty.log2_size()
}

/// Register-pair signed scaled offset (no writeback).
pub fn mem_pair_off(ty: PrimitiveType) -> Mutator {
    Box::new(move |word, st| {
        let disp = pair_disp(word, ty);
        let imm = (disp != 0).then_some(Immediate::Signed(disp, PrimitiveType::Int64));
        st.push(Operand::Memory(MemOperand::offset(base_reg(word), imm, ty)));
        true
    })
}

fn mem_pair_adjusting(ty: PrimitiveType, post: bool) -> Mutator {
    Box::new(move |word, st| {
        let disp = pair_disp(word, ty);
        st.writeback = true;
        st.push(Operand::Memory(MemOperand::adjusting(
            base_reg(word),
            Immediate::Signed(disp, PrimitiveType::Int64),
            post,
            ty,
        )));
        true
    })
}

pub fn mem_pair_pre(ty: PrimitiveType) -> Mutator {
    mem_pair_adjusting(ty, false)
}

pub fn mem_pair_post(ty: PrimitiveType) -> Mutator {
    mem_pair_adjusting(ty, true)
}

/// Literal-pool reference: the resolved address itself.
pub fn mem_lit() -> Mutator {
    let f = Bitfield::new(5, 19);
    Box::new(move |word, st| {
        let disp = f.read_signed(word) << 2;
        st.push(Operand::Address(st.address.wrapping_add_signed(disp)));
        true
    })
}

/// Register-offset addressing: `[Xn, Rm{, extend {#amount}}]`. Only the
/// uxtw/lsl/sxtw/sxtx options are allocated.
pub fn mem_reg(ty: PrimitiveType) -> Mutator {
    Box::new(move |word, st| {
        let option = (word >> 13) & 7;
        let (extend_op, index_64) = match option {
            2 => (Opcode::Uxtw, false),
            3 => (Opcode::Lsl, true),
            6 => (Opcode::Sxtw, false),
            7 => (Opcode::Sxtx, true),
            _ => return false,
        };
        let index_family = if index_64 {
            RegisterFamily::X
        } else {
            RegisterFamily::W
        };
        let shift = if (word >> 12) & 1 != 0 {
            ty.log2_size() as u8
        } else {
            0
        };
        let index = Register::new(index_family, ((word >> 16) & 0x1F) as u8);
        st.push(Operand::Memory(MemOperand::indexed(
            base_reg(word),
            index,
            extend_op,
            shift,
            ty,
        )));
        true
    })
}

// ---------------------------------------------------------------------------
// SIMD modified immediate
// ---------------------------------------------------------------------------

fn modimm_imm8(word: u32) -> u32 {
    bitfield::read_fields(&fields(&[(16, 3), (5, 5)]), word) as u32
}

/// Expanded 64-bit lane pattern from op:cmode:imm8; fails on the
/// untranscribed expansions.
pub fn simd_mod_imm() -> Mutator {
    Box::new(move |word, st| {
        let op = (word >> 29) & 1;
        let cmode = (word >> 12) & 0xF;
        match immediates::simd_expand_imm(op, cmode, modimm_imm8(word)) {
            Some(pattern) => {
                st.push(Operand::Immediate(Immediate::Unsigned(
                    pattern,
                    PrimitiveType::Word64,
                )));
                true
            }
            None => false,
        }
    })
}

/// Lane arrangement implied by the modified-immediate cmode.
pub fn modimm_arrangement() -> Mutator {
    Box::new(move |word, st| {
        st.vector_data = match (word >> 12) & 0xF {
            0..=7 | 12 | 13 => VectorKind::I32,
            8..=11 => VectorKind::I16,
            _ => VectorKind::I8,
        };
        true
    })
}

/// fmov (vector, immediate) single-precision constant from abc:defgh.
pub fn simd_fp32_imm() -> Mutator {
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Real32(
            immediates::fp_expand_imm32(modimm_imm8(word)),
        )));
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodeState;

    #[test]
    fn test_mem_off_scaling() {
        // str x0, [x1, #16]: imm12 = 2, scaled by 8.
        let m = mem_off(PrimitiveType::Word64);
        let mut st = DecodeState::new(0, 4);
        assert!(m((2 << 10) | (1 << 5), &mut st));
        match &st.operands[0] {
            Operand::Memory(mem) => {
                assert_eq!(mem.base, Register::x(1));
                assert_eq!(mem.offset, Some(Immediate::Unsigned(16, PrimitiveType::Word64)));
            }
            other => panic!("expected memory operand, got {other:?}"),
        }
    }

    #[test]
    fn test_mem_reg_option_table() {
        let mut st = DecodeState::new(0, 4);
        // option 3 = lsl with a 64-bit index.
        let m = mem_reg(PrimitiveType::Word32);
        assert!(m((3 << 13) | (2 << 16), &mut st));
        match &st.operands[0] {
            Operand::Memory(mem) => {
                assert_eq!(mem.index, Some(Register::x(2)));
                assert_eq!(mem.index_extend, Opcode::Lsl);
            }
            other => panic!("expected memory operand, got {other:?}"),
        }
        // option 0 is unallocated.
        assert!(!m(0, &mut st));
    }

    #[test]
    fn test_pc_rel_page() {
        let m = pc_rel_page();
        let mut st = DecodeState::new(0x40_0FF0, 4);
        // imm21 = 1 -> one page forward from the aligned base.
        assert!(m(1 << 29, &mut st));
        assert_eq!(st.operands[0], Operand::Address(0x40_1000));
    }

    #[test]
    fn test_mov_wide_shift_rejects_w_high_hw() {
        let m = mov_wide_shift(21, PrimitiveType::Word32);
        let mut st = DecodeState::new(0, 4);
        assert!(m(1 << 21, &mut st));
        assert!(!m(2 << 21, &mut st));
    }
}
