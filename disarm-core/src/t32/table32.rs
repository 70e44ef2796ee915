// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! T32 32-bit dispatch table.
//!
//! Operates on the combined word `hw1:hw2` (leading halfword in the upper
//! bits). The root splits on op1 (bits 27..28); coprocessor and AdvSIMD
//! pages are recognized but not implemented.

use std::sync::OnceLock;

use disarm_common::PrimitiveType::{self, Byte, Int16, SByte, Word16, Word32};

use crate::decoder::{
    barrier, bf_mask, cond_field, flags, flags_bit, instr, invalid, mask, nyi, select,
    shift_imm_fields, sparse, uimm_fields, wback_bit, Decoder, Mutator,
};
use crate::opcode::Opcode::{self, *};

use super::mutators::*;

type Mem = fn(PrimitiveType) -> Mutator;

/// The 32-bit root decoder.
pub fn root() -> &'static Decoder {
    static ROOT: OnceLock<Decoder> = OnceLock::new();
    ROOT.get_or_init(build_root)
}

fn build_root() -> Decoder {
    mask(27, 2, vec![
        invalid(),
        mask(25, 2, vec![
            mask(22, 1, vec![ldst_multiple(), dual_exclusive()]),
            dp_shifted_reg(),
            nyi("coprocessor/AdvSIMD"),
            nyi("coprocessor/AdvSIMD"),
        ]),
        mask(15, 1, vec![
            mask(25, 1, vec![dp_modified_imm(), dp_plain_imm()]),
            branches_and_misc(),
        ]),
        mask(26, 1, vec![
            mask(24, 2, vec![
                w_ldst_single(false),
                w_ldst_single(true),
                dp_register(),
                multiplies(),
            ]),
            nyi("coprocessor/AdvSIMD"),
        ]),
    ])
}

// ---------------------------------------------------------------------------
// Load/store multiple, dual, exclusive
// ---------------------------------------------------------------------------

fn ldst_multiple() -> Decoder {
    let multi = |st_op: Opcode, ld_op: Opcode| {
        mask(20, 1, vec![
            instr(st_op, vec![r4(16), wback_bit(21), reglist(16)]),
            instr(ld_op, vec![r4(16), wback_bit(21), reglist(16)]),
        ])
    };
    mask(23, 2, vec![
        nyi("srs/rfe"),
        multi(Stm, Ldm),
        multi(Stmdb, Ldmdb),
        nyi("srs/rfe"),
    ])
}

fn dual_exclusive() -> Decoder {
    let dual = || {
        mask(20, 1, vec![
            instr(Strd, vec![r4(12), r4(8), mem_w_dual()]),
            instr(Ldrd, vec![r4(12), r4(8), mem_w_dual()]),
        ])
    };
    mask(23, 2, vec![
        mask(21, 1, vec![
            mask(20, 1, vec![
                instr(Strex, vec![r4(8), r4(12), mem_w_excl()]),
                instr(Ldrex, vec![r4(12), mem_w_excl()]),
            ]),
            dual(),
        ]),
        mask(21, 1, vec![nyi("strexb/strexh/tbb/tbh"), dual()]),
        dual(),
        dual(),
    ])
}

// ---------------------------------------------------------------------------
// Data processing (shifted register)
// ---------------------------------------------------------------------------

fn dp_shifted_reg() -> Decoder {
    fn shift() -> Mutator {
        shift_imm_fields(4, &[(12, 3), (6, 2)])
    }
    let rrr = |op: Opcode| instr(op, vec![r4(8), r4(16), r4(0), shift(), flags_bit(20)]);
    let compare = |op: Opcode| instr(op, vec![r4(16), r4(0), shift(), flags()]);
    let unary = |op: Opcode| instr(op, vec![r4(8), r4(0), shift(), flags_bit(20)]);
    // tst/teq/cmn/cmp are the rd=pc flag-setting forms; mov/mvn the rn=pc
    // forms.
    let with_compare = |op: Opcode, cmp_op: Opcode| {
        select(&[(8, 4), (20, 1)], |v| v == 0x1F, compare(cmp_op), rrr(op))
    };
    let with_unary =
        |op: Opcode, un_op: Opcode| select(&[(16, 4)], |v| v == 0xF, unary(un_op), rrr(op));
    mask(21, 4, vec![
        with_compare(And, Tst),
        rrr(Bic),
        with_unary(Orr, Mov),
        with_unary(Orn, Mvn),
        with_compare(Eor, Teq),
        invalid(),
        nyi("pkhbt/pkhtb"),
        invalid(),
        with_compare(Add, Cmn),
        invalid(),
        rrr(Adc),
        rrr(Sbc),
        invalid(),
        with_compare(Sub, Cmp),
        rrr(Rsb),
        invalid(),
    ])
}

// ---------------------------------------------------------------------------
// Data processing (modified immediate)
// ---------------------------------------------------------------------------

fn dp_modified_imm() -> Decoder {
    let rri = |op: Opcode| instr(op, vec![r4(8), r4(16), modified_imm(), flags_bit(20)]);
    let compare = |op: Opcode| instr(op, vec![r4(16), modified_imm(), flags()]);
    let unary = |op: Opcode| instr(op, vec![r4(8), modified_imm(), flags_bit(20)]);
    let with_compare = |op: Opcode, cmp_op: Opcode| {
        select(&[(8, 4), (20, 1)], |v| v == 0x1F, compare(cmp_op), rri(op))
    };
    let with_unary = |op: Opcode, un_op: Opcode| {
        select(&[(16, 4)], |v| v == 0xF, unary(un_op), rri(op))
    };
    mask(21, 4, vec![
        with_compare(And, Tst),
        rri(Bic),
        with_unary(Orr, Mov),
        with_unary(Orn, Mvn),
        with_compare(Eor, Teq),
        invalid(),
        invalid(),
        invalid(),
        with_compare(Add, Cmn),
        invalid(),
        rri(Adc),
        rri(Sbc),
        invalid(),
        with_compare(Sub, Cmp),
        rri(Rsb),
        invalid(),
    ])
}

// ---------------------------------------------------------------------------
// Data processing (plain binary immediate)
// ---------------------------------------------------------------------------

fn dp_plain_imm() -> Decoder {
    let imm12 = || uimm_fields(&[(26, 1), (12, 3), (0, 8)], Word32);
    let imm16 = || uimm_fields(&[(16, 4), (26, 1), (12, 3), (0, 8)], Word32);
    sparse(20, 5, invalid(), vec![
        (0b00000, select(
            &[(16, 4)],
            |v| v == 0xF,
            instr(Adr, vec![r4(8), adr_w(true)]),
            instr(Add, vec![r4(8), r4(16), imm12()]),
        )),
        (0b00100, instr(Mov, vec![r4(8), imm16()])),
        (0b01010, select(
            &[(16, 4)],
            |v| v == 0xF,
            instr(Adr, vec![r4(8), adr_w(false)]),
            instr(Sub, vec![r4(8), r4(16), imm12()]),
        )),
        (0b01100, instr(Movt, vec![r4(8), imm16()])),
        (0b10000, nyi("ssat")),
        (0b10010, nyi("ssat16")),
        (0b10100, instr(Sbfx, vec![r4(8), r4(16), lsb_imm(), width_m1(0, 5)])),
        (0b10110, select(
            &[(16, 4)],
            |v| v == 0xF,
            instr(Bfc, vec![r4(8), bf_lsb_width()]),
            instr(Bfi, vec![r4(8), r4(16), bf_lsb_width()]),
        )),
        (0b11000, nyi("usat")),
        (0b11010, nyi("usat16")),
        (0b11100, instr(Ubfx, vec![r4(8), r4(16), lsb_imm(), width_m1(0, 5)])),
    ])
}

// ---------------------------------------------------------------------------
// Branches and miscellaneous control
// ---------------------------------------------------------------------------

fn branches_and_misc() -> Decoder {
    bf_mask(&[(14, 1), (12, 1)], vec![
        select(
            &[(23, 3)],
            |v| v == 7,
            misc_control(),
            instr(B, vec![cond_field(22), bcond_disp_t3()]),
        ),
        instr(B, vec![bw_disp_t4()]),
        instr(Blx, vec![blx_disp()]),
        instr(Bl, vec![bw_disp_t4()]),
    ])
}

fn misc_control() -> Decoder {
    mask(20, 3, vec![
        nyi("msr"),
        nyi("msr"),
        wide_hints(),
        wide_barriers(),
        nyi("bxj/exception return"),
        invalid(),
        nyi("mrs"),
        nyi("mrs"),
    ])
}

fn wide_hints() -> Decoder {
    sparse(0, 8, nyi("hint"), vec![
        (0, instr(Nop, vec![])),
        (1, instr(Yield, vec![])),
        (2, instr(Wfe, vec![])),
        (3, instr(Wfi, vec![])),
        (4, instr(Sev, vec![])),
    ])
}

fn wide_barriers() -> Decoder {
    mask(4, 4, vec![
        nyi("misc control"),
        nyi("misc control"),
        instr(Clrex, vec![]),
        nyi("misc control"),
        instr(Dsb, vec![barrier(0)]),
        instr(Dmb, vec![barrier(0)]),
        instr(Isb, vec![barrier(0)]),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
        invalid(),
    ])
}

// ---------------------------------------------------------------------------
// Load/store single data item
// ---------------------------------------------------------------------------

fn w_ldst_single(signed: bool) -> Decoder {
    select(
        &[(16, 4)],
        |v| v == 0xF,
        w_ldst_literal(signed),
        mask(23, 1, vec![
            mask(11, 1, vec![
                select(&[(6, 5)], |v| v == 0, w_single_matrix(mem_w_reg, signed), invalid()),
                select(
                    &[(8, 3)],
                    |v| v == 0b110,
                    nyi("unprivileged load/store"),
                    w_single_matrix(mem_w_imm8, signed),
                ),
            ]),
            w_single_matrix(mem_w_imm12, signed),
        ]),
    )
}

fn w_single_matrix(mem: Mem, signed: bool) -> Decoder {
    if signed {
        mask(21, 2, vec![
            mask(20, 1, vec![invalid(), instr(Ldrsb, vec![r4(12), mem(SByte)])]),
            mask(20, 1, vec![invalid(), instr(Ldrsh, vec![r4(12), mem(Int16)])]),
            invalid(),
            invalid(),
        ])
    } else {
        mask(21, 2, vec![
            mask(20, 1, vec![
                instr(Strb, vec![r4(12), mem(Byte)]),
                instr(Ldrb, vec![r4(12), mem(Byte)]),
            ]),
            mask(20, 1, vec![
                instr(Strh, vec![r4(12), mem(Word16)]),
                instr(Ldrh, vec![r4(12), mem(Word16)]),
            ]),
            mask(20, 1, vec![
                instr(Str, vec![r4(12), mem(Word32)]),
                instr(Ldr, vec![r4(12), mem(Word32)]),
            ]),
            invalid(),
        ])
    }
}

fn w_ldst_literal(signed: bool) -> Decoder {
    let lit = |op: Opcode| {
        mask(20, 1, vec![invalid(), instr(op, vec![r4(12), pc_lit_w()])])
    };
    if signed {
        mask(21, 2, vec![lit(Ldrsb), lit(Ldrsh), invalid(), invalid()])
    } else {
        mask(21, 2, vec![lit(Ldrb), lit(Ldrh), lit(Ldr), invalid()])
    }
}

// ---------------------------------------------------------------------------
// Data processing (register) and multiplies
// ---------------------------------------------------------------------------

fn dp_register() -> Decoder {
    mask(7, 1, vec![register_shifts(), extend_and_misc()])
}

fn register_shifts() -> Decoder {
    let leaf = |op: Opcode| instr(op, vec![r4(8), r4(16), r4(0), flags_bit(20)]);
    select(
        &[(23, 1), (12, 4), (4, 3)],
        |v| v == 0b0_1111_000,
        mask(21, 2, vec![leaf(Lsl), leaf(Lsr), leaf(Asr), leaf(Ror)]),
        invalid(),
    )
}

fn extend_and_misc() -> Decoder {
    let extend = |op: Opcode| {
        select(
            &[(16, 4)],
            |v| v == 0xF,
            instr(op, vec![r4(8), r4(0)]),
            nyi("extend and add"),
        )
    };
    let rr = |op: Opcode| instr(op, vec![r4(8), r4(0)]);
    sparse(20, 4, nyi("parallel addition and subtraction"), vec![
        (0b0000, extend(Sxth)),
        (0b0001, extend(Uxth)),
        (0b0100, extend(Sxtb)),
        (0b0101, extend(Uxtb)),
        (0b1001, sparse(4, 4, invalid(), vec![
            (8, rr(Rev)),
            (9, rr(Rev16)),
            (10, rr(Rbit)),
            (11, rr(Revsh)),
        ])),
        (0b1011, select(&[(4, 4)], |v| v == 8, rr(Clz), nyi("qadd/qsub family"))),
    ])
}

fn multiplies() -> Decoder {
    let div = |op: Opcode| {
        select(
            &[(12, 4), (4, 4)],
            |v| v == 0xFF,
            instr(op, vec![r4(8), r4(16), r4(0)]),
            invalid(),
        )
    };
    mask(23, 1, vec![
        select(
            &[(20, 3)],
            |v| v == 0,
            sparse(4, 4, nyi("halfword multiplies"), vec![
                (0, select(
                    &[(12, 4)],
                    |v| v == 0xF,
                    instr(Mul, vec![r4(8), r4(16), r4(0)]),
                    instr(Mla, vec![r4(8), r4(16), r4(0), r4(12)]),
                )),
                (1, instr(Mls, vec![r4(8), r4(16), r4(0), r4(12)])),
            ]),
            nyi("halfword multiply accumulate"),
        ),
        mask(20, 3, vec![
            instr(Smull, vec![r4(12), r4(8), r4(16), r4(0)]),
            div(Sdiv),
            instr(Umull, vec![r4(12), r4(8), r4(16), r4(0)]),
            div(Udiv),
            nyi("smlal"),
            nyi("smlald/smlsld"),
            nyi("umlal"),
            nyi("umaal"),
        ]),
    ])
}
