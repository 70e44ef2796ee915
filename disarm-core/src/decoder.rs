// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decoder tree machinery.
//!
//! A decoder tree routes an instruction word through [`Mask`] /
//! [`BitfieldMask`] / [`Select`] / [`Sparse`] interior nodes down to a leaf.
//! An [`Instr`] leaf runs its mutators in order against the word and the
//! per-instruction [`DecodeState`]; the first failing mutator turns the
//! whole decode into the `Invalid` record. Trees are built once behind a
//! `OnceLock` and never mutated afterwards, so they are freely shared
//! between disassembler instances.
//!
//! [`Mask`]: Decoder::Mask
//! [`BitfieldMask`]: Decoder::BitfieldMask
//! [`Select`]: Decoder::Select
//! [`Sparse`]: Decoder::Sparse
//! [`Instr`]: Decoder::Instr

use disarm_common::{Address, BarrierOption, Condition, PrimitiveType, Register, RegisterFamily, VectorKind};

use crate::bitfield::{self, Bitfield};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::operand::{Immediate, Operand};

/// Operand extractor: reads fields of `word`, appends operands to the state
/// or updates context, and reports whether the encoding remains valid.
pub type Mutator = Box<dyn Fn(u32, &mut DecodeState) -> bool + Send + Sync>;

// ---------------------------------------------------------------------------
// Per-instruction decode state
// ---------------------------------------------------------------------------

/// Scratch state for one instruction, created fresh per decode.
#[derive(Debug)]
pub struct DecodeState {
    pub address: Address,
    pub length: u8,
    pub operands: Vec<Operand>,
    pub condition: Condition,
    pub update_flags: bool,
    pub writeback: bool,
    pub shift_type: Opcode,
    pub shift_value: Option<Operand>,
    pub vector_data: VectorKind,
    /// Selects the 128-bit view for subsequent sized SIMD registers.
    pub use_q: bool,
}

impl DecodeState {
    pub fn new(address: Address, length: u8) -> Self {
        DecodeState {
            address,
            length,
            operands: Vec::new(),
            condition: Condition::Al,
            update_flags: false,
            writeback: false,
            shift_type: Opcode::Invalid,
            shift_value: None,
            vector_data: VectorKind::Invalid,
            use_q: false,
        }
    }

    /// Clear everything except the address/length bookkeeping.
    fn reset(&mut self) {
        self.operands.clear();
        self.condition = Condition::Al;
        self.update_flags = false;
        self.writeback = false;
        self.shift_type = Opcode::Invalid;
        self.shift_value = None;
        self.vector_data = VectorKind::Invalid;
        self.use_q = false;
    }

    #[inline]
    pub fn push(&mut self, operand: Operand) {
        self.operands.push(operand);
    }

    /// The `Invalid` record for the current address/length.
    pub fn invalid(&self) -> Instruction {
        Instruction::invalid(self.address, self.length)
    }

    /// Assemble the record once all mutators have run.
    fn build(&mut self, opcode: Opcode) -> Instruction {
        Instruction {
            opcode,
            operands: std::mem::take(&mut self.operands),
            address: self.address,
            length: self.length,
            condition: self.condition,
            update_flags: self.update_flags,
            writeback: self.writeback,
            shift_type: self.shift_type,
            shift_value: self.shift_value.take(),
            vector_data: self.vector_data,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder tree
// ---------------------------------------------------------------------------

/// One node of a decoder tree.
pub enum Decoder {
    /// Leaf: an instruction with its operand mutators.
    Instr {
        opcode: Opcode,
        mutators: Vec<Mutator>,
    },
    /// Dispatch on a contiguous field; exactly `2^width` children.
    Mask {
        pos: u32,
        width: u32,
        children: Vec<Decoder>,
    },
    /// Dispatch on concatenated fields; exactly `2^total_width` children.
    BitfieldMask {
        fields: Vec<Bitfield>,
        children: Vec<Decoder>,
    },
    /// Two-way dispatch on a predicate over concatenated fields.
    Select {
        fields: Vec<Bitfield>,
        predicate: fn(u64) -> bool,
        if_true: Box<Decoder>,
        if_false: Box<Decoder>,
    },
    /// Dispatch on a field with explicit cases and a default.
    Sparse {
        pos: u32,
        width: u32,
        default: Box<Decoder>,
        cases: Vec<(u32, Decoder)>,
    },
    /// Recognized but not yet implemented encoding page.
    Nyi { message: &'static str },
    /// Undefined encoding.
    Invalid,
}

impl Decoder {
    /// Route `word` to a leaf and produce the instruction record.
    pub fn decode(&self, word: u32, st: &mut DecodeState) -> Instruction {
        match self {
            Decoder::Instr { opcode, mutators } => {
                st.reset();
                for m in mutators {
                    if !m(word, st) {
                        return st.invalid();
                    }
                }
                st.build(*opcode)
            }
            Decoder::Mask {
                pos,
                width,
                children,
            } => {
                let index = (word >> pos) & ((1 << width) - 1);
                children[index as usize].decode(word, st)
            }
            Decoder::BitfieldMask { fields, children } => {
                let index = bitfield::read_fields(fields, word);
                children[index as usize].decode(word, st)
            }
            Decoder::Select {
                fields,
                predicate,
                if_true,
                if_false,
            } => {
                if predicate(bitfield::read_fields(fields, word)) {
                    if_true.decode(word, st)
                } else {
                    if_false.decode(word, st)
                }
            }
            Decoder::Sparse {
                pos,
                width,
                default,
                cases,
            } => {
                let value = (word >> pos) & ((1 << width) - 1);
                match cases.iter().find(|(v, _)| *v == value) {
                    Some((_, child)) => child.decode(word, st),
                    None => default.decode(word, st),
                }
            }
            Decoder::Nyi { message } => {
                log::debug!(
                    "unimplemented encoding: {} ({:#010X} at {:#X})",
                    message,
                    word,
                    st.address
                );
                st.invalid()
            }
            Decoder::Invalid => st.invalid(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tree builders
// ---------------------------------------------------------------------------

pub fn instr(opcode: Opcode, mutators: Vec<Mutator>) -> Decoder {
    Decoder::Instr { opcode, mutators }
}

pub fn mask(pos: u32, width: u32, children: Vec<Decoder>) -> Decoder {
    debug_assert_eq!(
        children.len(),
        1 << width,
        "Mask({pos},{width}) needs {} children",
        1 << width
    );
    Decoder::Mask {
        pos,
        width,
        children,
    }
}

pub fn bf_mask(field_spec: &[(u32, u32)], children: Vec<Decoder>) -> Decoder {
    let fields = fields(field_spec);
    let total: u32 = fields.iter().map(|f| f.len).sum();
    debug_assert_eq!(children.len(), 1 << total);
    Decoder::BitfieldMask { fields, children }
}

pub fn select(
    field_spec: &[(u32, u32)],
    predicate: fn(u64) -> bool,
    if_true: Decoder,
    if_false: Decoder,
) -> Decoder {
    Decoder::Select {
        fields: fields(field_spec),
        predicate,
        if_true: Box::new(if_true),
        if_false: Box::new(if_false),
    }
}

pub fn sparse(pos: u32, width: u32, default: Decoder, cases: Vec<(u32, Decoder)>) -> Decoder {
    debug_assert!(cases.iter().all(|(v, _)| *v < (1 << width)));
    Decoder::Sparse {
        pos,
        width,
        default: Box::new(default),
        cases,
    }
}

pub fn nyi(message: &'static str) -> Decoder {
    Decoder::Nyi { message }
}

pub fn invalid() -> Decoder {
    Decoder::Invalid
}

/// Build a field list from `(pos, len)` pairs.
pub fn fields(field_spec: &[(u32, u32)]) -> Vec<Bitfield> {
    field_spec
        .iter()
        .map(|&(pos, len)| Bitfield::new(pos, len))
        .collect()
}

// ---------------------------------------------------------------------------
// Shared mutator combinators
// ---------------------------------------------------------------------------

/// Register from a single field.
pub fn reg(family: RegisterFamily, pos: u32, len: u32) -> Mutator {
    let f = Bitfield::new(pos, len);
    Box::new(move |word, st| {
        st.push(Operand::Register(Register::new(family, f.read(word) as u8)));
        true
    })
}

/// Register whose index is scattered across several fields.
pub fn reg_fields(family: RegisterFamily, field_spec: &[(u32, u32)]) -> Mutator {
    let fs = fields(field_spec);
    Box::new(move |word, st| {
        let index = bitfield::read_fields(&fs, word) as u8;
        st.push(Operand::Register(Register::new(family, index)));
        true
    })
}

/// SIMD register sized by the previously set `q` bit (64- or 128-bit view).
pub fn vreg(pos: u32, len: u32) -> Mutator {
    let f = Bitfield::new(pos, len);
    Box::new(move |word, st| {
        let family = if st.use_q {
            RegisterFamily::Q
        } else {
            RegisterFamily::D
        };
        st.push(Operand::Register(Register::new(family, f.read(word) as u8)));
        true
    })
}

/// Unsigned immediate, optionally scaled left by a constant.
pub fn uimm_sh(pos: u32, len: u32, ty: PrimitiveType, shift: u32) -> Mutator {
    let f = Bitfield::new(pos, len);
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Unsigned(
            (f.read(word) as u64) << shift,
            ty,
        )));
        true
    })
}

pub fn uimm(pos: u32, len: u32, ty: PrimitiveType) -> Mutator {
    uimm_sh(pos, len, ty, 0)
}

/// Unsigned immediate concatenated from several fields (movw/movt style).
pub fn uimm_fields(field_spec: &[(u32, u32)], ty: PrimitiveType) -> Mutator {
    let fs = fields(field_spec);
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Unsigned(
            bitfield::read_fields(&fs, word),
            ty,
        )));
        true
    })
}

/// Sign-extended immediate, optionally scaled left by a constant.
pub fn simm_sh(pos: u32, len: u32, ty: PrimitiveType, shift: u32) -> Mutator {
    let f = Bitfield::new(pos, len);
    Box::new(move |word, st| {
        st.push(Operand::Immediate(Immediate::Signed(
            f.read_signed(word) << shift,
            ty,
        )));
        true
    })
}

pub fn simm(pos: u32, len: u32, ty: PrimitiveType) -> Mutator {
    simm_sh(pos, len, ty, 0)
}

/// Condition-code operand.
pub fn cond_operand(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 4);
    Box::new(move |word, st| {
        st.push(Operand::Condition(Condition::from_bits(f.read(word))));
        true
    })
}

/// Set the record's condition field (conditional branches).
pub fn cond_field(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 4);
    Box::new(move |word, st| {
        st.condition = Condition::from_bits(f.read(word));
        true
    })
}

/// Barrier-option operand (dsb/dmb CRm).
pub fn barrier(pos: u32) -> Mutator {
    let f = Bitfield::new(pos, 4);
    Box::new(move |word, st| {
        st.push(Operand::Barrier(BarrierOption::from_bits(f.read(word))));
        true
    })
}

/// Shift context from a 2-bit type field and an amount field. A zero-amount
/// `lsl` is the no-shift encoding and leaves the context empty.
pub fn shift_imm(type_pos: u32, type_len: u32, amt_pos: u32, amt_len: u32) -> Mutator {
    let tf = Bitfield::new(type_pos, type_len);
    let af = Bitfield::new(amt_pos, amt_len);
    Box::new(move |word, st| {
        let amount = af.read(word);
        let op = match tf.read(word) & 3 {
            0 => Opcode::Lsl,
            1 => Opcode::Lsr,
            2 => Opcode::Asr,
            _ => Opcode::Ror,
        };
        set_shift(st, op, amount);
        true
    })
}

/// Shift context from scattered amount fields (T32 imm3:imm2 splits).
pub fn shift_imm_fields(type_pos: u32, amt_spec: &[(u32, u32)]) -> Mutator {
    let tf = Bitfield::new(type_pos, 2);
    let fs = fields(amt_spec);
    Box::new(move |word, st| {
        let amount = bitfield::read_fields(&fs, word) as u32;
        let op = match tf.read(word) {
            0 => Opcode::Lsl,
            1 => Opcode::Lsr,
            2 => Opcode::Asr,
            _ => Opcode::Ror,
        };
        // lsr/asr amount 0 encodes a shift of 32; ror #0 is rrx.
        match (op, amount) {
            (Opcode::Lsr | Opcode::Asr, 0) => set_shift(st, op, 32),
            (Opcode::Ror, 0) => set_shift(st, Opcode::Rrx, 1),
            _ => set_shift(st, op, amount),
        }
        true
    })
}

fn set_shift(st: &mut DecodeState, op: Opcode, amount: u32) {
    if op == Opcode::Lsl && amount == 0 {
        return;
    }
    st.shift_type = op;
    st.shift_value = Some(Operand::Immediate(Immediate::Unsigned(
        amount as u64,
        PrimitiveType::Byte,
    )));
}

/// Extended-register context (`uxtb` .. `sxtx`) with a shift amount.
pub fn extend(option_pos: u32, option_len: u32, amt_pos: u32, amt_len: u32) -> Mutator {
    let of = Bitfield::new(option_pos, option_len);
    let af = Bitfield::new(amt_pos, amt_len);
    Box::new(move |word, st| {
        st.shift_type = extend_opcode(of.read(word));
        let amount = af.read(word);
        st.shift_value = Some(Operand::Immediate(Immediate::Unsigned(
            amount as u64,
            PrimitiveType::Byte,
        )));
        true
    })
}

/// The A64 extension-option table.
pub fn extend_opcode(option: u32) -> Opcode {
    match option & 7 {
        0 => Opcode::Uxtb,
        1 => Opcode::Uxth,
        2 => Opcode::Uxtw,
        3 => Opcode::Uxtx,
        4 => Opcode::Sxtb,
        5 => Opcode::Sxth,
        6 => Opcode::Sxtw,
        _ => Opcode::Sxtx,
    }
}

/// Mark the record as flag-setting.
pub fn flags() -> Mutator {
    Box::new(|_, st| {
        st.update_flags = true;
        true
    })
}

/// Flag-setting controlled by an S bit.
pub fn flags_bit(pos: u32) -> Mutator {
    Box::new(move |word, st| {
        st.update_flags |= (word >> pos) & 1 != 0;
        true
    })
}

/// Base-register writeback controlled by a W bit.
pub fn wback_bit(pos: u32) -> Mutator {
    Box::new(move |word, st| {
        st.writeback |= (word >> pos) & 1 != 0;
        true
    })
}

/// A fixed immediate operand implied by the encoding (e.g. the zero of a
/// two-register `rsb`).
pub fn const_imm(value: u64, ty: PrimitiveType) -> Mutator {
    Box::new(move |_, st| {
        st.push(Operand::Immediate(Immediate::Unsigned(value, ty)));
        true
    })
}

/// Mark the record as writing back its base register.
pub fn wback() -> Mutator {
    Box::new(|_, st| {
        st.writeback = true;
        true
    })
}

/// Latch the `q` bit for subsequent sized SIMD registers.
pub fn qbit(pos: u32) -> Mutator {
    Box::new(move |word, st| {
        st.use_q = (word >> pos) & 1 != 0;
        true
    })
}

/// Integer lane arrangement from a 2-bit size field.
pub fn arrange(pos: u32, len: u32) -> Mutator {
    let f = Bitfield::new(pos, len);
    Box::new(move |word, st| {
        st.vector_data = VectorKind::integer(f.read(word));
        true
    })
}

/// Fixed lane arrangement.
pub fn arrange_fixed(kind: VectorKind) -> Mutator {
    Box::new(move |_, st| {
        st.vector_data = kind;
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(op: Opcode) -> Decoder {
        instr(op, vec![])
    }

    #[test]
    fn test_mask_dispatch() {
        let d = mask(4, 2, vec![
            leaf(Opcode::Nop),
            leaf(Opcode::Sev),
            leaf(Opcode::Wfe),
            leaf(Opcode::Wfi),
        ]);
        let mut st = DecodeState::new(0, 4);
        assert_eq!(d.decode(0b10_0000, &mut st).opcode, Opcode::Wfe);
        assert_eq!(d.decode(0b01_0000, &mut st).opcode, Opcode::Sev);
    }

    #[test]
    fn test_sparse_default() {
        let d = sparse(0, 4, invalid(), vec![(3, leaf(Opcode::Nop))]);
        let mut st = DecodeState::new(0, 4);
        assert_eq!(d.decode(3, &mut st).opcode, Opcode::Nop);
        assert_eq!(d.decode(4, &mut st).opcode, Opcode::Invalid);
    }

    #[test]
    fn test_select() {
        let d = select(&[(0, 4)], |v| v == 0xF, leaf(Opcode::Nop), leaf(Opcode::Sev));
        let mut st = DecodeState::new(0, 4);
        assert_eq!(d.decode(0xF, &mut st).opcode, Opcode::Nop);
        assert_eq!(d.decode(0xE, &mut st).opcode, Opcode::Sev);
    }

    #[test]
    fn test_failing_mutator_yields_invalid() {
        let d = instr(Opcode::Add, vec![Box::new(|_, _| false)]);
        let mut st = DecodeState::new(0x100, 4);
        let insn = d.decode(0, &mut st);
        assert_eq!(insn.opcode, Opcode::Invalid);
        assert_eq!(insn.address, 0x100);
        assert_eq!(insn.length, 4);
    }

    #[test]
    fn test_nyi_yields_invalid() {
        let d = nyi("unit test leaf");
        let mut st = DecodeState::new(0, 2);
        assert_eq!(d.decode(0xFFFF, &mut st).opcode, Opcode::Invalid);
    }

    #[test]
    fn test_operand_count_matches_mutators() {
        let d = instr(
            Opcode::Add,
            vec![
                reg(RegisterFamily::X, 0, 5),
                reg(RegisterFamily::X, 5, 5),
                flags(), // context only, appends nothing
            ],
        );
        let mut st = DecodeState::new(0, 4);
        let insn = d.decode(0x3FF, &mut st);
        assert_eq!(insn.operands.len(), 2);
        assert!(insn.update_flags);
    }

    #[test]
    fn test_signed_immediate() {
        let m = simm_sh(12, 9, PrimitiveType::Int64, 3);
        let mut st = DecodeState::new(0, 4);
        assert!(m(0x1FF << 12, &mut st));
        assert_eq!(
            st.operands[0],
            Operand::Immediate(Immediate::Signed(-8, PrimitiveType::Int64))
        );
    }

    #[test]
    fn test_shift_context() {
        let m = shift_imm(22, 2, 10, 6);
        let mut st = DecodeState::new(0, 4);
        // lsl #0 leaves the context empty.
        assert!(m(0, &mut st));
        assert_eq!(st.shift_type, Opcode::Invalid);
        // asr #3
        assert!(m((2 << 22) | (3 << 10), &mut st));
        assert_eq!(st.shift_type, Opcode::Asr);
        assert!(matches!(
            st.shift_value,
            Some(Operand::Immediate(Immediate::Unsigned(3, _)))
        ));
    }
}
