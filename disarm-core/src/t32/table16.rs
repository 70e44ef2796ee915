// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! T32 16-bit dispatch table.
//!
//! The root splits on the top three bits of the halfword. The eighth branch
//! re-examines bits 11..13: value 4 (prefix 0b11100) is the unconditional
//! branch; the remaining values belong to the 32-bit decoder and are never
//! routed here by the driver.

use std::sync::OnceLock;

use disarm_common::PrimitiveType::{Byte, Int16, SByte, Word16, Word32};

use crate::decoder::{
    cond_field, const_imm, flags, instr, invalid, mask, nyi, select, sparse, uimm, uimm_sh, wback,
    Decoder,
};
use crate::opcode::Opcode::{self, *};

use super::mutators::*;

/// The 16-bit root decoder.
pub fn root() -> &'static Decoder {
    static ROOT: OnceLock<Decoder> = OnceLock::new();
    ROOT.get_or_init(build_root)
}

fn build_root() -> Decoder {
    mask(13, 3, vec![
        shift_add_sub(),
        alu_imm8(),
        dp_and_ldst(),
        ldst_word_byte(),
        ldst_half_sp(),
        adr_sp_misc(),
        multiple_and_cond(),
        mask(11, 3, vec![
            invalid(),
            invalid(),
            invalid(),
            invalid(),
            instr(B, vec![branch_disp16(0, 11)]),
            invalid(),
            invalid(),
            invalid(),
        ]),
    ])
}

// ---------------------------------------------------------------------------
// 000: shift by immediate, add/subtract
// ---------------------------------------------------------------------------

fn shift_add_sub() -> Decoder {
    let shift = |op: Opcode, full_range: bool| {
        instr(op, vec![r(0), r(3), shift_amount16(full_range), flags()])
    };
    mask(11, 2, vec![
        shift(Lsl, false),
        shift(Lsr, true),
        shift(Asr, true),
        mask(9, 2, vec![
            instr(Add, vec![r(0), r(3), r(6), flags()]),
            instr(Sub, vec![r(0), r(3), r(6), flags()]),
            instr(Add, vec![r(0), r(3), uimm(6, 3, Word32), flags()]),
            instr(Sub, vec![r(0), r(3), uimm(6, 3, Word32), flags()]),
        ]),
    ])
}

// ---------------------------------------------------------------------------
// 001: mov/cmp/add/sub with imm8
// ---------------------------------------------------------------------------

fn alu_imm8() -> Decoder {
    let leaf = |op: Opcode| instr(op, vec![r(8), uimm(0, 8, Word32), flags()]);
    mask(11, 2, vec![leaf(Mov), leaf(Cmp), leaf(Add), leaf(Sub)])
}

// ---------------------------------------------------------------------------
// 010: register ALU, hi-register ops, ldr literal, register-offset ldst
// ---------------------------------------------------------------------------

fn dp_and_ldst() -> Decoder {
    mask(10, 3, vec![
        alu_register(),
        special_data(),
        instr(Ldr, vec![r(8), pc_lit(0, 8, 2)]),
        instr(Ldr, vec![r(8), pc_lit(0, 8, 2)]),
        mask(9, 1, vec![
            instr(Str, vec![r(0), mem_reg16(Word32)]),
            instr(Strh, vec![r(0), mem_reg16(Word16)]),
        ]),
        mask(9, 1, vec![
            instr(Strb, vec![r(0), mem_reg16(Byte)]),
            instr(Ldrsb, vec![r(0), mem_reg16(SByte)]),
        ]),
        mask(9, 1, vec![
            instr(Ldr, vec![r(0), mem_reg16(Word32)]),
            instr(Ldrh, vec![r(0), mem_reg16(Word16)]),
        ]),
        mask(9, 1, vec![
            instr(Ldrb, vec![r(0), mem_reg16(Byte)]),
            instr(Ldrsh, vec![r(0), mem_reg16(Int16)]),
        ]),
    ])
}

fn alu_register() -> Decoder {
    let rr = |op: Opcode| instr(op, vec![r(0), r(3), flags()]);
    mask(6, 4, vec![
        rr(And),
        rr(Eor),
        rr(Lsl),
        rr(Lsr),
        rr(Asr),
        rr(Adc),
        rr(Sbc),
        rr(Ror),
        rr(Tst),
        instr(Rsb, vec![r(0), r(3), const_imm(0, Word32), flags()]),
        rr(Cmp),
        rr(Cmn),
        rr(Orr),
        rr(Mul),
        rr(Bic),
        rr(Mvn),
    ])
}

fn special_data() -> Decoder {
    mask(8, 2, vec![
        instr(Add, vec![rdn(), r4(3)]),
        instr(Cmp, vec![rdn(), r4(3), flags()]),
        instr(Mov, vec![rdn(), r4(3)]),
        mask(7, 1, vec![
            instr(Bx, vec![r4(3)]),
            instr(Blx, vec![r4(3)]),
        ]),
    ])
}

// ---------------------------------------------------------------------------
// 011 / 100: immediate-offset loads and stores
// ---------------------------------------------------------------------------

fn ldst_word_byte() -> Decoder {
    mask(11, 2, vec![
        instr(Str, vec![r(0), mem_imm5(Word32)]),
        instr(Ldr, vec![r(0), mem_imm5(Word32)]),
        instr(Strb, vec![r(0), mem_imm5(Byte)]),
        instr(Ldrb, vec![r(0), mem_imm5(Byte)]),
    ])
}

fn ldst_half_sp() -> Decoder {
    mask(11, 2, vec![
        instr(Strh, vec![r(0), mem_imm5(Word16)]),
        instr(Ldrh, vec![r(0), mem_imm5(Word16)]),
        instr(Str, vec![r(8), mem_sp8()]),
        instr(Ldr, vec![r(8), mem_sp8()]),
    ])
}

// ---------------------------------------------------------------------------
// 101: adr, add sp, miscellaneous
// ---------------------------------------------------------------------------

fn adr_sp_misc() -> Decoder {
    mask(11, 2, vec![
        instr(Adr, vec![r(8), pc_lit(0, 8, 2)]),
        instr(Add, vec![r(8), sp_reg(), uimm_sh(0, 8, Word32, 2)]),
        miscellaneous(),
        miscellaneous(),
    ])
}

fn miscellaneous() -> Decoder {
    let cmp_branch = |op: Opcode| instr(op, vec![r(0), cbz_disp()]);
    let push = || instr(Push, vec![reglist(8), reglist_extra(8, 14)]);
    let pop = || instr(Pop, vec![reglist(8), reglist_extra(8, 15)]);
    mask(8, 4, vec![
        mask(7, 1, vec![
            instr(Add, vec![sp_reg(), uimm_sh(0, 7, Word32, 2)]),
            instr(Sub, vec![sp_reg(), uimm_sh(0, 7, Word32, 2)]),
        ]),
        cmp_branch(Cbz),
        mask(6, 2, vec![
            instr(Sxth, vec![r(0), r(3)]),
            instr(Sxtb, vec![r(0), r(3)]),
            instr(Uxth, vec![r(0), r(3)]),
            instr(Uxtb, vec![r(0), r(3)]),
        ]),
        cmp_branch(Cbz),
        push(),
        push(),
        nyi("cps/setend"),
        invalid(),
        invalid(),
        cmp_branch(Cbnz),
        mask(6, 2, vec![
            instr(Rev, vec![r(0), r(3)]),
            instr(Rev16, vec![r(0), r(3)]),
            nyi("hlt"),
            instr(Revsh, vec![r(0), r(3)]),
        ]),
        cmp_branch(Cbnz),
        pop(),
        pop(),
        instr(Bkpt, vec![uimm(0, 8, Byte)]),
        it_and_hints(),
    ])
}

fn it_and_hints() -> Decoder {
    select(
        &[(0, 4)],
        |v| v == 0,
        sparse(4, 4, nyi("hint"), vec![
            (0, instr(Nop, vec![])),
            (1, instr(Yield, vec![])),
            (2, instr(Wfe, vec![])),
            (3, instr(Wfi, vec![])),
            (4, instr(Sev, vec![])),
        ]),
        instr(It, vec![it_op()]),
    )
}

// ---------------------------------------------------------------------------
// 110: load/store multiple, conditional branch, svc
// ---------------------------------------------------------------------------

fn multiple_and_cond() -> Decoder {
    mask(12, 1, vec![
        mask(11, 1, vec![
            instr(Stm, vec![r(8), wback(), reglist(8)]),
            instr(Ldm, vec![r(8), ldm_wback(8, 3), reglist(8)]),
        ]),
        cond_branch_svc(),
    ])
}

fn cond_branch_svc() -> Decoder {
    let bcond = || instr(B, vec![cond_field(8), branch_disp16(0, 8)]);
    let mut children: Vec<Decoder> = (0..14).map(|_| bcond()).collect();
    children.push(instr(Udf, vec![uimm(0, 8, Byte)]));
    children.push(instr(Svc, vec![uimm(0, 8, Byte)]));
    mask(8, 4, children)
}
