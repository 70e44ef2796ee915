// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! A64 dispatch tables.
//!
//! The tree hand-mirrors the ARM ARM encoding index: the root splits on the
//! op0 field (bits 25..28) into the instruction classes, each class builder
//! below mirrors one chapter of the index. Built once on first use.

use std::sync::OnceLock;

use disarm_common::PrimitiveType::{self, Byte, Int16, Int32, SByte, Word128, Word16, Word32, Word64};
use disarm_common::VectorKind;

use crate::decoder::{
    arrange, arrange_fixed, barrier, bf_mask, cond_field, cond_operand, extend, flags, instr,
    invalid, mask, nyi, qbit, select, shift_imm, sparse, uimm, vreg, Decoder, Mutator,
};
use crate::opcode::Opcode::{self, *};

use super::mutators::*;

/// Memory-operand mutator constructor, parameterizing the load/store
/// matrices by addressing form.
type Mem = fn(PrimitiveType) -> Mutator;

/// The A64 root decoder.
pub fn root() -> &'static Decoder {
    static ROOT: OnceLock<Decoder> = OnceLock::new();
    ROOT.get_or_init(build_root)
}

fn build_root() -> Decoder {
    mask(25, 4, vec![
        invalid(),        // 0000 reserved
        invalid(),        // 0001 unallocated
        nyi("SVE"),       // 0010
        invalid(),        // 0011 unallocated
        ldst_gp_a(),      // x1x0 loads and stores
        dp_reg_0(),       // x101 data processing (register)
        ldst_simd_a(),    // x1x0 loads and stores (SIMD)
        simd_vector(),    // x111 AdvSIMD
        dp_imm(),         // 100x data processing (immediate)
        dp_imm(),
        branches(),       // 101x branches, exceptions, system
        branches(),
        ldst_gp_b(),
        dp_reg_1(),
        ldst_simd_b(),
        simd_fp_scalar(), // x111 scalar FP
    ])
}

// ---------------------------------------------------------------------------
// Data processing (immediate)
// ---------------------------------------------------------------------------

fn dp_imm() -> Decoder {
    mask(23, 3, vec![
        pc_relative(),
        pc_relative(),
        addsub_imm_group(),
        nyi("add/sub immediate with tags"),
        logical_imm_group(),
        move_wide_group(),
        bitfield_group(),
        extract_group(),
    ])
}

fn pc_relative() -> Decoder {
    mask(31, 1, vec![
        instr(Adr, vec![x(0), pc_rel()]),
        instr(Adrp, vec![x(0), pc_rel_page()]),
    ])
}

fn addsub_imm_group() -> Decoder {
    mask(29, 2, vec![
        addsub_imm(Add, false),
        addsub_imm(Adds, true),
        addsub_imm(Sub, false),
        addsub_imm(Subs, true),
    ])
}

fn addsub_imm(op: Opcode, s: bool) -> Decoder {
    let leaf = |is64: bool| {
        let (r, ty): (fn(u32) -> Mutator, _) = if is64 { (x, Word64) } else { (w, Word32) };
        let mut muts = vec![r(0), r(5), uimm(10, 12, ty), lsl12(22)];
        if s {
            muts.push(flags());
        }
        instr(op, muts)
    };
    mask(31, 1, vec![leaf(false), leaf(true)])
}

fn logical_imm_group() -> Decoder {
    mask(29, 2, vec![
        logical_imm_pair(And, false),
        logical_imm_pair(Orr, false),
        logical_imm_pair(Eor, false),
        logical_imm_pair(Ands, true),
    ])
}

fn logical_imm_pair(op: Opcode, s: bool) -> Decoder {
    let leaf = |is64: bool| {
        let (r, ty): (fn(u32) -> Mutator, _) = if is64 { (x, Word64) } else { (w, Word32) };
        let mut muts = vec![r(0), r(5), logical_imm(ty)];
        if s {
            muts.push(flags());
        }
        instr(op, muts)
    };
    mask(31, 1, vec![leaf(false), leaf(true)])
}

fn move_wide_group() -> Decoder {
    mask(29, 2, vec![
        move_wide(Movn),
        invalid(),
        move_wide(Movz),
        move_wide(Movk),
    ])
}

fn move_wide(op: Opcode) -> Decoder {
    mask(31, 1, vec![
        instr(op, vec![w(0), uimm(5, 16, Word32), mov_wide_shift(21, Word32)]),
        instr(op, vec![x(0), uimm(5, 16, Word64), mov_wide_shift(21, Word64)]),
    ])
}

fn bitfield_group() -> Decoder {
    mask(29, 2, vec![
        bitfield_move(Sbfm),
        bitfield_move(Bfm),
        bitfield_move(Ubfm),
        invalid(),
    ])
}

fn bitfield_move(op: Opcode) -> Decoder {
    mask(31, 1, vec![
        instr(op, vec![w(0), w(5), bitmask_rs(Word32)]),
        instr(op, vec![x(0), x(5), bitmask_rs(Word64)]),
    ])
}

fn extract_group() -> Decoder {
    select(
        &[(29, 2)],
        |v| v == 0,
        mask(31, 1, vec![
            select(
                &[(22, 1), (21, 1), (15, 1)],
                |v| v == 0,
                instr(Extr, vec![w(0), w(5), w(16), uimm(10, 6, Word32)]),
                invalid(),
            ),
            select(
                &[(22, 1), (21, 1)],
                |v| v == 0b10,
                instr(Extr, vec![x(0), x(5), x(16), uimm(10, 6, Word64)]),
                invalid(),
            ),
        ]),
        invalid(),
    )
}

// ---------------------------------------------------------------------------
// Branches, exceptions, system
// ---------------------------------------------------------------------------

fn branches() -> Decoder {
    mask(29, 3, vec![
        instr(B, vec![jdisp(0, 26)]),
        mask(25, 1, vec![cmp_branch(false), test_branch(false)]),
        mask(25, 1, vec![cond_branch(), invalid()]),
        invalid(),
        instr(Bl, vec![jdisp(0, 26)]),
        mask(25, 1, vec![cmp_branch(true), test_branch(true)]),
        mask(25, 1, vec![
            mask(24, 1, vec![exceptions(), system()]),
            branch_register(),
        ]),
        invalid(),
    ])
}

fn cmp_branch(is64: bool) -> Decoder {
    let r: fn(u32) -> Mutator = if is64 { x } else { w };
    mask(24, 1, vec![
        instr(Cbz, vec![r(0), jdisp(5, 19)]),
        instr(Cbnz, vec![r(0), jdisp(5, 19)]),
    ])
}

fn test_branch(is64: bool) -> Decoder {
    let r: fn(u32) -> Mutator = if is64 { x } else { w };
    mask(24, 1, vec![
        instr(Tbz, vec![r(0), test_bit(), jdisp(5, 14)]),
        instr(Tbnz, vec![r(0), test_bit(), jdisp(5, 14)]),
    ])
}

fn cond_branch() -> Decoder {
    select(
        &[(24, 1), (4, 1)],
        |v| v == 0,
        instr(B, vec![cond_field(0), jdisp(5, 19)]),
        invalid(),
    )
}

fn exceptions() -> Decoder {
    let imm16 = || uimm(5, 16, Word16);
    mask(21, 3, vec![
        sparse(0, 5, invalid(), vec![
            (1, instr(Svc, vec![imm16()])),
            (2, instr(Hvc, vec![imm16()])),
            (3, instr(Smc, vec![imm16()])),
        ]),
        select(&[(0, 5)], |v| v == 0, instr(Brk, vec![imm16()]), invalid()),
        select(&[(0, 5)], |v| v == 0, instr(Hlt, vec![imm16()]), invalid()),
        invalid(),
        invalid(),
        nyi("dcps"),
        invalid(),
        invalid(),
    ])
}

fn system() -> Decoder {
    select(
        &[(22, 2)],
        |v| v == 0,
        mask(19, 3, vec![
            sparse(12, 4, invalid(), vec![
                (2, hints()),
                (3, barriers()),
                (4, nyi("msr (immediate)")),
            ]),
            nyi("sys"),
            nyi("msr (register)"),
            nyi("msr (register)"),
            invalid(),
            nyi("sysl"),
            nyi("mrs"),
            nyi("mrs"),
        ]),
        invalid(),
    )
}

fn hints() -> Decoder {
    select(
        &[(0, 5)],
        |v| v == 0x1F,
        sparse(5, 7, nyi("hint"), vec![
            (0, instr(Nop, vec![])),
            (1, instr(Yield, vec![])),
            (2, instr(Wfe, vec![])),
            (3, instr(Wfi, vec![])),
            (4, instr(Sev, vec![])),
            (5, instr(Sevl, vec![])),
        ]),
        invalid(),
    )
}

fn barriers() -> Decoder {
    mask(5, 3, vec![
        invalid(),
        invalid(),
        instr(Clrex, vec![uimm(8, 4, Byte)]),
        invalid(),
        instr(Dsb, vec![barrier(8)]),
        instr(Dmb, vec![barrier(8)]),
        instr(Isb, vec![barrier(8)]),
        invalid(),
    ])
}

fn branch_register() -> Decoder {
    let plain = |op: Opcode| {
        select(
            &[(10, 6), (0, 5)],
            |v| v == 0,
            instr(op, vec![x(5)]),
            invalid(),
        )
    };
    let bare = |op: Opcode| {
        select(
            &[(10, 6), (5, 5), (0, 5)],
            |v| v == 0x3E0,
            instr(op, vec![]),
            invalid(),
        )
    };
    select(
        &[(16, 5)],
        |v| v == 0x1F,
        sparse(21, 4, invalid(), vec![
            (0, plain(Br)),
            (1, plain(Blr)),
            (2, plain(Ret)),
            (4, bare(Eret)),
            (5, bare(Drps)),
        ]),
        invalid(),
    )
}

// ---------------------------------------------------------------------------
// Loads and stores
// ---------------------------------------------------------------------------

/// op0 = 0100: exclusives/ordered (bit29 = 0) and register pairs (bit29 = 1).
fn ldst_gp_a() -> Decoder {
    mask(29, 1, vec![excl_ordered(), gp_pairs()])
}

fn excl_ordered() -> Decoder {
    let sized_mem = || vec![reg_sized(0), mem_base_sized()];
    mask(23, 1, vec![
        mask(21, 1, vec![
            mask(22, 1, vec![
                mask(15, 1, vec![
                    instr(Stxr, vec![w(16), reg_sized(0), mem_base_sized()]),
                    instr(Stlxr, vec![w(16), reg_sized(0), mem_base_sized()]),
                ]),
                mask(15, 1, vec![
                    instr(Ldxr, sized_mem()),
                    instr(Ldaxr, sized_mem()),
                ]),
            ]),
            nyi("load/store exclusive pair"),
        ]),
        mask(21, 1, vec![
            mask(22, 1, vec![
                mask(15, 1, vec![nyi("stllr"), instr(Stlr, sized_mem())]),
                mask(15, 1, vec![nyi("ldlar"), instr(Ldar, sized_mem())]),
            ]),
            nyi("compare and swap"),
        ]),
    ])
}

fn gp_pairs() -> Decoder {
    mask(23, 2, vec![
        gp_pair_matrix(mem_pair_off, true),
        gp_pair_matrix(mem_pair_post, false),
        gp_pair_matrix(mem_pair_off, false),
        gp_pair_matrix(mem_pair_pre, false),
    ])
}

fn gp_pair_matrix(mem: Mem, nontemporal: bool) -> Decoder {
    let (st_op, ld_op) = if nontemporal { (Stnp, Ldnp) } else { (Stp, Ldp) };
    let ldpsw = if nontemporal {
        invalid()
    } else {
        instr(Ldpsw, vec![x(0), x(10), mem(Word32)])
    };
    mask(30, 2, vec![
        mask(22, 1, vec![
            instr(st_op, vec![w(0), w(10), mem(Word32)]),
            instr(ld_op, vec![w(0), w(10), mem(Word32)]),
        ]),
        mask(22, 1, vec![invalid(), ldpsw]),
        mask(22, 1, vec![
            instr(st_op, vec![x(0), x(10), mem(Word64)]),
            instr(ld_op, vec![x(0), x(10), mem(Word64)]),
        ]),
        mask(22, 1, vec![invalid(), invalid()]),
    ])
}

/// op0 = 1100: load literal (bit29 = 0) and single-register forms
/// (bit29 = 1).
fn ldst_gp_b() -> Decoder {
    mask(29, 1, vec![
        mask(24, 1, vec![gp_literal(), invalid()]),
        gp_register_forms(),
    ])
}

fn gp_literal() -> Decoder {
    mask(30, 2, vec![
        instr(Ldr, vec![w(0), mem_lit()]),
        instr(Ldr, vec![x(0), mem_lit()]),
        instr(Ldrsw, vec![x(0), mem_lit()]),
        instr(Prfm, vec![uimm(0, 5, Byte), mem_lit()]),
    ])
}

fn gp_register_forms() -> Decoder {
    mask(24, 1, vec![
        mask(21, 1, vec![
            mask(10, 2, vec![
                gp_ldst_matrix(mem_unscaled, true, nyi("prfum")),
                gp_ldst_matrix(mem_post, false, invalid()),
                nyi("load/store unprivileged"),
                gp_ldst_matrix(mem_pre, false, invalid()),
            ]),
            mask(10, 2, vec![
                nyi("atomic memory operation"),
                invalid(),
                gp_ldst_matrix(
                    mem_reg,
                    false,
                    instr(Prfm, vec![uimm(0, 5, Byte), mem_reg(Word64)]),
                ),
                nyi("pointer-authenticated load"),
            ]),
        ]),
        gp_ldst_matrix(
            mem_off,
            false,
            instr(Prfm, vec![uimm(0, 5, Byte), mem_off(Word64)]),
        ),
    ])
}

fn gp_ldst_matrix(mem: Mem, unscaled: bool, prfm_slot: Decoder) -> Decoder {
    let (st_op, ld_op, stb, ldb, ldsb, sth, ldh, ldsh, ldsw) = if unscaled {
        (Stur, Ldur, Sturb, Ldurb, Ldursb, Sturh, Ldurh, Ldursh, Ldursw)
    } else {
        (Str, Ldr, Strb, Ldrb, Ldrsb, Strh, Ldrh, Ldrsh, Ldrsw)
    };
    mask(30, 2, vec![
        mask(22, 2, vec![
            instr(stb, vec![w(0), mem(Byte)]),
            instr(ldb, vec![w(0), mem(Byte)]),
            instr(ldsb, vec![x(0), mem(SByte)]),
            instr(ldsb, vec![w(0), mem(SByte)]),
        ]),
        mask(22, 2, vec![
            instr(sth, vec![w(0), mem(Word16)]),
            instr(ldh, vec![w(0), mem(Word16)]),
            instr(ldsh, vec![x(0), mem(Int16)]),
            instr(ldsh, vec![w(0), mem(Int16)]),
        ]),
        mask(22, 2, vec![
            instr(st_op, vec![w(0), mem(Word32)]),
            instr(ld_op, vec![w(0), mem(Word32)]),
            instr(ldsw, vec![x(0), mem(Int32)]),
            invalid(),
        ]),
        mask(22, 2, vec![
            instr(st_op, vec![x(0), mem(Word64)]),
            instr(ld_op, vec![x(0), mem(Word64)]),
            prfm_slot,
            invalid(),
        ]),
    ])
}

/// op0 = 0110: SIMD structures (bit29 = 0) and SIMD register pairs.
fn ldst_simd_a() -> Decoder {
    mask(29, 1, vec![
        nyi("AdvSIMD load/store multiple/single structures"),
        simd_pairs(),
    ])
}

fn simd_pairs() -> Decoder {
    mask(23, 2, vec![
        simd_pair_matrix(mem_pair_off, true),
        simd_pair_matrix(mem_pair_post, false),
        simd_pair_matrix(mem_pair_off, false),
        simd_pair_matrix(mem_pair_pre, false),
    ])
}

fn simd_pair_matrix(mem: Mem, nontemporal: bool) -> Decoder {
    let (st_op, ld_op) = if nontemporal { (Stnp, Ldnp) } else { (Stp, Ldp) };
    mask(30, 2, vec![
        mask(22, 1, vec![
            instr(st_op, vec![sreg(0), sreg(10), mem(Word32)]),
            instr(ld_op, vec![sreg(0), sreg(10), mem(Word32)]),
        ]),
        mask(22, 1, vec![
            instr(st_op, vec![dreg(0), dreg(10), mem(Word64)]),
            instr(ld_op, vec![dreg(0), dreg(10), mem(Word64)]),
        ]),
        mask(22, 1, vec![
            instr(st_op, vec![qreg(0), qreg(10), mem(Word128)]),
            instr(ld_op, vec![qreg(0), qreg(10), mem(Word128)]),
        ]),
        mask(22, 1, vec![invalid(), invalid()]),
    ])
}

/// op0 = 1110: SIMD literal and single-register forms.
fn ldst_simd_b() -> Decoder {
    mask(29, 1, vec![
        mask(24, 1, vec![simd_literal(), invalid()]),
        mask(24, 1, vec![
            mask(21, 1, vec![
                mask(10, 2, vec![
                    simd_ldst_matrix(mem_unscaled, true),
                    simd_ldst_matrix(mem_post, false),
                    invalid(),
                    simd_ldst_matrix(mem_pre, false),
                ]),
                mask(10, 2, vec![
                    invalid(),
                    invalid(),
                    simd_ldst_matrix(mem_reg, false),
                    invalid(),
                ]),
            ]),
            simd_ldst_matrix(mem_off, false),
        ]),
    ])
}

fn simd_literal() -> Decoder {
    mask(30, 2, vec![
        instr(Ldr, vec![sreg(0), mem_lit()]),
        instr(Ldr, vec![dreg(0), mem_lit()]),
        instr(Ldr, vec![qreg(0), mem_lit()]),
        invalid(),
    ])
}

fn simd_ldst_matrix(mem: Mem, unscaled: bool) -> Decoder {
    let (st_op, ld_op) = if unscaled { (Stur, Ldur) } else { (Str, Ldr) };
    mask(30, 2, vec![
        mask(22, 2, vec![
            instr(st_op, vec![breg(0), mem(Byte)]),
            instr(ld_op, vec![breg(0), mem(Byte)]),
            instr(st_op, vec![qreg(0), mem(Word128)]),
            instr(ld_op, vec![qreg(0), mem(Word128)]),
        ]),
        mask(22, 2, vec![
            instr(st_op, vec![hreg(0), mem(Word16)]),
            instr(ld_op, vec![hreg(0), mem(Word16)]),
            invalid(),
            invalid(),
        ]),
        mask(22, 2, vec![
            instr(st_op, vec![sreg(0), mem(Word32)]),
            instr(ld_op, vec![sreg(0), mem(Word32)]),
            invalid(),
            invalid(),
        ]),
        mask(22, 2, vec![
            instr(st_op, vec![dreg(0), mem(Word64)]),
            instr(ld_op, vec![dreg(0), mem(Word64)]),
            invalid(),
            invalid(),
        ]),
    ])
}

// ---------------------------------------------------------------------------
// Data processing (register)
// ---------------------------------------------------------------------------

/// op0 = x101 with bit28 = 0: shifted/extended register forms.
fn dp_reg_0() -> Decoder {
    mask(24, 1, vec![
        logical_shifted_group(),
        mask(21, 1, vec![addsub_shifted_group(), addsub_extended_group()]),
    ])
}

fn logical_shifted_group() -> Decoder {
    mask(29, 2, vec![
        mask(21, 1, vec![shifted_logical(And, false), shifted_logical(Bic, false)]),
        mask(21, 1, vec![shifted_logical(Orr, false), shifted_logical(Orn, false)]),
        mask(21, 1, vec![shifted_logical(Eor, false), shifted_logical(Eon, false)]),
        mask(21, 1, vec![shifted_logical(Ands, true), shifted_logical(Bics, true)]),
    ])
}

fn shifted_logical(op: Opcode, s: bool) -> Decoder {
    let leaf = |r: fn(u32) -> Mutator| {
        let mut muts = vec![r(0), r(5), r(16), shift_imm(22, 2, 10, 6)];
        if s {
            muts.push(flags());
        }
        instr(op, muts)
    };
    mask(31, 1, vec![
        select(&[(15, 1)], |v| v == 0, leaf(w), invalid()),
        leaf(x),
    ])
}

fn addsub_shifted_group() -> Decoder {
    mask(29, 2, vec![
        addsub_shifted(Add, false),
        addsub_shifted(Adds, true),
        addsub_shifted(Sub, false),
        addsub_shifted(Subs, true),
    ])
}

fn addsub_shifted(op: Opcode, s: bool) -> Decoder {
    let leaf = |r: fn(u32) -> Mutator| {
        let mut muts = vec![r(0), r(5), r(16), shift_imm(22, 2, 10, 6)];
        if s {
            muts.push(flags());
        }
        instr(op, muts)
    };
    select(
        &[(22, 2)],
        |v| v != 3,
        mask(31, 1, vec![
            select(&[(15, 1)], |v| v == 0, leaf(w), invalid()),
            leaf(x),
        ]),
        invalid(),
    )
}

fn addsub_extended_group() -> Decoder {
    mask(29, 2, vec![
        addsub_extended(Add, false),
        addsub_extended(Adds, true),
        addsub_extended(Sub, false),
        addsub_extended(Subs, true),
    ])
}

fn addsub_extended(op: Opcode, s: bool) -> Decoder {
    let leaf = |r: fn(u32) -> Mutator| {
        let mut muts = vec![r(0), r(5), rm_extended(16), extend(13, 3, 10, 3)];
        if s {
            muts.push(flags());
        }
        instr(op, muts)
    };
    select(
        &[(10, 3)],
        |v| v <= 4,
        mask(31, 1, vec![leaf(w), leaf(x)]),
        invalid(),
    )
}

/// op0 = x101 with bit28 = 1: carries, conditionals, 1/2/3-source.
fn dp_reg_1() -> Decoder {
    mask(24, 1, vec![
        mask(21, 3, vec![
            adc_sbc_group(),
            invalid(),
            ccmp_group(),
            invalid(),
            csel_group(),
            invalid(),
            mask(30, 1, vec![dp_two_source(), dp_one_source()]),
            invalid(),
        ]),
        dp_three_source(),
    ])
}

fn adc_sbc_group() -> Decoder {
    let leaf = |op: Opcode, s: bool| {
        let build = |r: fn(u32) -> Mutator| {
            let mut muts = vec![r(0), r(5), r(16)];
            if s {
                muts.push(flags());
            }
            instr(op, muts)
        };
        mask(31, 1, vec![build(w), build(x)])
    };
    select(
        &[(10, 6)],
        |v| v == 0,
        mask(29, 2, vec![
            leaf(Adc, false),
            leaf(Adcs, true),
            leaf(Sbc, false),
            leaf(Sbcs, true),
        ]),
        nyi("flag manipulation"),
    )
}

fn ccmp_group() -> Decoder {
    mask(11, 1, vec![ccmp_half(false), ccmp_half(true)])
}

fn ccmp_half(imm_form: bool) -> Decoder {
    let leaf = |op: Opcode| {
        let build = |r: fn(u32) -> Mutator| {
            let second = if imm_form { uimm(16, 5, Byte) } else { r(16) };
            instr(op, vec![r(5), second, uimm(0, 4, Byte), cond_operand(12), flags()])
        };
        mask(31, 1, vec![build(w), build(x)])
    };
    select(
        &[(29, 1), (10, 1), (4, 1)],
        |v| v == 0b100,
        mask(30, 1, vec![leaf(Ccmn), leaf(Ccmp)]),
        invalid(),
    )
}

fn csel_group() -> Decoder {
    let leaf = |op: Opcode| {
        let build = |r: fn(u32) -> Mutator| instr(op, vec![r(0), r(5), r(16), cond_operand(12)]);
        mask(31, 1, vec![build(w), build(x)])
    };
    select(
        &[(29, 1)],
        |v| v == 0,
        mask(30, 1, vec![
            mask(10, 2, vec![leaf(Csel), leaf(Csinc), invalid(), invalid()]),
            mask(10, 2, vec![leaf(Csinv), leaf(Csneg), invalid(), invalid()]),
        ]),
        invalid(),
    )
}

fn dp_two_source() -> Decoder {
    let r3 = |op: Opcode| {
        let build = |r: fn(u32) -> Mutator| instr(op, vec![r(0), r(5), r(16)]);
        mask(31, 1, vec![build(w), build(x)])
    };
    let crc = |op: Opcode, wide: bool| {
        if wide {
            select(
                &[(31, 1)],
                |v| v == 1,
                instr(op, vec![w(0), w(5), x(16)]),
                invalid(),
            )
        } else {
            select(
                &[(31, 1)],
                |v| v == 0,
                instr(op, vec![w(0), w(5), w(16)]),
                invalid(),
            )
        }
    };
    select(
        &[(29, 1)],
        |v| v == 0,
        sparse(10, 6, invalid(), vec![
            (2, r3(Udiv)),
            (3, r3(Sdiv)),
            (8, r3(Lsl)),
            (9, r3(Lsr)),
            (10, r3(Asr)),
            (11, r3(Ror)),
            (16, crc(Crc32b, false)),
            (17, crc(Crc32h, false)),
            (18, crc(Crc32w, false)),
            (19, crc(Crc32x, true)),
            (20, crc(Crc32cb, false)),
            (21, crc(Crc32ch, false)),
            (22, crc(Crc32cw, false)),
            (23, crc(Crc32cx, true)),
        ]),
        invalid(),
    )
}

fn dp_one_source() -> Decoder {
    let r2 = |op: Opcode| {
        let build = |r: fn(u32) -> Mutator| instr(op, vec![r(0), r(5)]);
        mask(31, 1, vec![build(w), build(x)])
    };
    select(
        &[(29, 1), (16, 5)],
        |v| v == 0,
        sparse(10, 6, invalid(), vec![
            (0, r2(Rbit)),
            (1, r2(Rev16)),
            (2, mask(31, 1, vec![instr(Rev, vec![w(0), w(5)]), instr(Rev32, vec![x(0), x(5)])])),
            (3, select(&[(31, 1)], |v| v == 1, instr(Rev, vec![x(0), x(5)]), invalid())),
            (4, r2(Clz)),
            (5, r2(Cls)),
        ]),
        invalid(),
    )
}

fn dp_three_source() -> Decoder {
    let wide = |op: Opcode| {
        select(
            &[(31, 1)],
            |v| v == 1,
            instr(op, vec![x(0), w(5), w(16), x(10)]),
            invalid(),
        )
    };
    let high = |op: Opcode| {
        select(
            &[(31, 1)],
            |v| v == 1,
            instr(op, vec![x(0), x(5), x(16)]),
            invalid(),
        )
    };
    let acc = |op: Opcode| {
        let build = |r: fn(u32) -> Mutator| instr(op, vec![r(0), r(5), r(16), r(10)]);
        mask(31, 1, vec![build(w), build(x)])
    };
    select(
        &[(29, 2)],
        |v| v == 0,
        bf_mask(&[(21, 3), (15, 1)], vec![
            acc(Madd),
            acc(Msub),
            wide(Smaddl),
            wide(Smsubl),
            high(Smulh),
            invalid(),
            invalid(),
            invalid(),
            invalid(),
            invalid(),
            wide(Umaddl),
            wide(Umsubl),
            high(Umulh),
            invalid(),
            invalid(),
            invalid(),
        ]),
        invalid(),
    )
}

// ---------------------------------------------------------------------------
// Scalar floating point (op0 = x111, bit28 = 1)
// ---------------------------------------------------------------------------

fn simd_fp_scalar() -> Decoder {
    mask(30, 2, vec![
        mask(29, 1, vec![fp_main(), invalid()]),
        nyi("AdvSIMD scalar"),
        invalid(),
        invalid(),
    ])
}

fn fp_main() -> Decoder {
    mask(24, 1, vec![
        mask(21, 1, vec![fp_fixed_conv(), fp_rest()]),
        fp_dp3(),
    ])
}

fn fp_fixed_conv() -> Decoder {
    sparse(16, 5, invalid(), vec![
        (2, instr(Scvtf, vec![freg(0), reg_sf(5), fbits()])),
        (3, instr(Ucvtf, vec![freg(0), reg_sf(5), fbits()])),
        (24, instr(Fcvtzs, vec![reg_sf(0), freg(5), fbits()])),
        (25, instr(Fcvtzu, vec![reg_sf(0), freg(5), fbits()])),
    ])
}

fn fp_rest() -> Decoder {
    mask(10, 2, vec![
        mask(12, 3, vec![
            fp_int_conv(),
            fmov_imm(),
            fcmp_group(),
            fmov_imm(),
            fp_dp1(),
            fmov_imm(),
            invalid(),
            fmov_imm(),
        ]),
        fccmp_group(),
        fp_dp2(),
        instr(Fcsel, vec![freg(0), freg(5), freg(16), cond_operand(12)]),
    ])
}

fn fp_int_conv() -> Decoder {
    sparse(16, 5, nyi("fp/int conversion"), vec![
        (2, instr(Scvtf, vec![freg(0), reg_sf(5)])),
        (3, instr(Ucvtf, vec![freg(0), reg_sf(5)])),
        (6, instr(Fmov, vec![reg_sf(0), freg(5)])),
        (7, instr(Fmov, vec![freg(0), reg_sf(5)])),
        (14, nyi("fmov (top half)")),
        (15, nyi("fmov (top half)")),
        (24, instr(Fcvtzs, vec![reg_sf(0), freg(5)])),
        (25, instr(Fcvtzu, vec![reg_sf(0), freg(5)])),
    ])
}

fn fmov_imm() -> Decoder {
    select(
        &[(5, 5)],
        |v| v == 0,
        mask(22, 2, vec![
            instr(Fmov, vec![sreg(0), fp32_imm(13)]),
            instr(Fmov, vec![dreg(0), fp64_imm(13)]),
            invalid(),
            instr(Fmov, vec![hreg(0), fp16_imm(13)]),
        ]),
        invalid(),
    )
}

fn fcmp_group() -> Decoder {
    select(
        &[(15, 1)],
        |v| v == 0,
        sparse(0, 5, invalid(), vec![
            (0, instr(Fcmp, vec![freg(5), freg(16)])),
            (8, instr(Fcmp, vec![freg(5), fp_zero()])),
            (16, instr(Fcmpe, vec![freg(5), freg(16)])),
            (24, instr(Fcmpe, vec![freg(5), fp_zero()])),
        ]),
        invalid(),
    )
}

fn fccmp_group() -> Decoder {
    let leaf = |op: Opcode| {
        instr(op, vec![freg(5), freg(16), uimm(0, 4, Byte), cond_operand(12)])
    };
    mask(4, 1, vec![leaf(Fccmp), leaf(Fccmpe)])
}

fn fp_dp1() -> Decoder {
    let r2 = |op: Opcode| instr(op, vec![freg(0), freg(5)]);
    sparse(15, 6, nyi("fp data-processing (1 source)"), vec![
        (0, r2(Fmov)),
        (1, r2(Fabs)),
        (2, r2(Fneg)),
        (3, r2(Fsqrt)),
        (4, select(&[(22, 2)], |v| v != 0, instr(Fcvt, vec![sreg(0), freg(5)]), invalid())),
        (5, select(&[(22, 2)], |v| v != 1, instr(Fcvt, vec![dreg(0), freg(5)]), invalid())),
        (7, select(&[(22, 2)], |v| v != 3, instr(Fcvt, vec![hreg(0), freg(5)]), invalid())),
        (8, r2(Frintn)),
        (9, r2(Frintp)),
        (10, r2(Frintm)),
        (11, r2(Frintz)),
        (12, r2(Frinta)),
        (14, r2(Frintx)),
        (15, r2(Frinti)),
    ])
}

fn fp_dp2() -> Decoder {
    let r3 = |op: Opcode| instr(op, vec![freg(0), freg(5), freg(16)]);
    mask(12, 4, vec![
        r3(Fmul),
        r3(Fdiv),
        r3(Fadd),
        r3(Fsub),
        r3(Fmax),
        r3(Fmin),
        r3(Fmaxnm),
        r3(Fminnm),
        r3(Fnmul),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
    ])
}

fn fp_dp3() -> Decoder {
    let leaf = |op: Opcode| instr(op, vec![freg(0), freg(5), freg(16), freg(10)]);
    bf_mask(&[(21, 1), (15, 1)], vec![
        leaf(Fmadd),
        leaf(Fmsub),
        leaf(Fnmadd),
        leaf(Fnmsub),
    ])
}

// ---------------------------------------------------------------------------
// AdvSIMD vector (op0 = x111, bit28 = 0)
// ---------------------------------------------------------------------------

fn simd_vector() -> Decoder {
    mask(24, 1, vec![
        mask(21, 1, vec![
            nyi("AdvSIMD copy/permute/extract/table"),
            mask(10, 1, vec![
                nyi("AdvSIMD three different / two-register miscellaneous"),
                simd_three_same(),
            ]),
        ]),
        select(
            &[(19, 4)],
            |v| v == 0,
            simd_modified_imm(),
            nyi("AdvSIMD shift by immediate"),
        ),
    ])
}

fn simd_three_same() -> Decoder {
    let bytes = |op: Opcode| {
        instr(op, vec![qbit(30), arrange_fixed(VectorKind::I8), vreg(0, 5), vreg(5, 5), vreg(16, 5)])
    };
    let sized = |op: Opcode| {
        instr(op, vec![qbit(30), arrange(22, 2), vreg(0, 5), vreg(5, 5), vreg(16, 5)])
    };
    sparse(11, 5, nyi("AdvSIMD three same"), vec![
        (3, mask(29, 1, vec![
            mask(22, 2, vec![bytes(And), bytes(Bic), bytes(Orr), bytes(Orn)]),
            mask(22, 2, vec![bytes(Eor), bytes(Bsl), bytes(Bit), bytes(Bif)]),
        ])),
        (16, mask(29, 1, vec![sized(Add), sized(Sub)])),
        (17, mask(29, 1, vec![nyi("cmtst"), sized(Cmeq)])),
        (19, mask(29, 1, vec![sized(Mul), bytes(Pmul)])),
        (23, mask(29, 1, vec![sized(Addp), invalid()])),
    ])
}

fn simd_modified_imm() -> Decoder {
    let modimm = |op: Opcode| {
        instr(op, vec![qbit(30), modimm_arrangement(), vreg(0, 5), simd_mod_imm()])
    };
    select(
        &[(10, 2)],
        |v| v == 0b01,
        mask(29, 1, vec![
            sparse(12, 4, modimm(Movi), vec![
                (1, modimm(Orr)),
                (3, modimm(Orr)),
                (5, modimm(Orr)),
                (7, modimm(Orr)),
                (9, modimm(Orr)),
                (11, modimm(Orr)),
                (15, instr(Fmov, vec![
                    qbit(30),
                    arrange_fixed(VectorKind::F32),
                    vreg(0, 5),
                    simd_fp32_imm(),
                ])),
            ]),
            sparse(12, 4, modimm(Mvni), vec![
                (1, modimm(Bic)),
                (3, modimm(Bic)),
                (5, modimm(Bic)),
                (7, modimm(Bic)),
                (9, modimm(Bic)),
                (11, modimm(Bic)),
                (14, nyi("movi (64-bit per-bit expansion)")),
                (15, invalid()),
            ]),
        ]),
        invalid(),
    )
}
