// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Opcode identifiers for both instruction sets.
//!
//! One flat enum; mnemonics shared between T32 and A64 (`add`, `ldr`, ...)
//! are a single value. Shift and extend operators double as context values
//! in the record's `shift_type` and in memory-operand `index_extend`.

/// Symbolic opcode attached to a decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum Opcode {
    /// Undecodable encoding; also the "absent" value for `shift_type`.
    #[default]
    Invalid,

    // -- Shift / extend operators (context values and register shifts) ------
    Lsl,
    Lsr,
    Asr,
    Ror,
    Rrx,
    Uxtb,
    Uxth,
    Uxtw,
    Uxtx,
    Sxtb,
    Sxth,
    Sxtw,
    Sxtx,

    // -- Data processing ------------------------------------------------------
    Adc,
    Adcs,
    Add,
    Adds,
    Adr,
    Adrp,
    And,
    Ands,
    Bfc,
    Bfi,
    Bfm,
    Bic,
    Bics,
    Cls,
    Clz,
    Cmn,
    Cmp,
    Crc32b,
    Crc32h,
    Crc32w,
    Crc32x,
    Crc32cb,
    Crc32ch,
    Crc32cw,
    Crc32cx,
    Eon,
    Eor,
    Extr,
    Mla,
    Mls,
    Mov,
    Movk,
    Movn,
    Movt,
    Movz,
    Mul,
    Mvn,
    Orn,
    Orr,
    Rbit,
    Rev,
    Rev16,
    Rev32,
    Revsh,
    Rsb,
    Sbc,
    Sbcs,
    Sbfm,
    Sbfx,
    Sdiv,
    Madd,
    Msub,
    Smaddl,
    Smsubl,
    Smulh,
    Smull,
    Sub,
    Subs,
    Teq,
    Tst,
    Ubfm,
    Ubfx,
    Udiv,
    Umaddl,
    Umsubl,
    Umulh,
    Umull,

    // -- Conditional operations ----------------------------------------------
    Ccmn,
    Ccmp,
    Csel,
    Csinc,
    Csinv,
    Csneg,

    // -- Branches -------------------------------------------------------------
    B,
    Bkpt,
    Bl,
    Blr,
    Blx,
    Br,
    Bx,
    Cbnz,
    Cbz,
    Drps,
    Eret,
    Ret,
    Tbnz,
    Tbz,

    // -- Exceptions and system ------------------------------------------------
    Brk,
    Clrex,
    Dmb,
    Dsb,
    Hlt,
    Hvc,
    Isb,
    It,
    Nop,
    Sev,
    Sevl,
    Smc,
    Svc,
    Udf,
    Wfe,
    Wfi,
    Yield,

    // -- Loads and stores ------------------------------------------------------
    Ldar,
    Ldaxr,
    Ldm,
    Ldmdb,
    Ldnp,
    Ldp,
    Ldpsw,
    Ldr,
    Ldrb,
    Ldrd,
    Ldrex,
    Ldrh,
    Ldrsb,
    Ldrsh,
    Ldrsw,
    Ldur,
    Ldurb,
    Ldurh,
    Ldursb,
    Ldursh,
    Ldursw,
    Ldxr,
    Pop,
    Prfm,
    Push,
    Stlr,
    Stlxr,
    Stm,
    Stmdb,
    Stnp,
    Stp,
    Str,
    Strb,
    Strd,
    Strex,
    Strh,
    Stur,
    Sturb,
    Sturh,
    Stxr,

    // -- Scalar floating point -------------------------------------------------
    Fabs,
    Fadd,
    Fccmp,
    Fccmpe,
    Fcmp,
    Fcmpe,
    Fcsel,
    Fcvt,
    Fcvtzs,
    Fcvtzu,
    Fdiv,
    Fmadd,
    Fmax,
    Fmaxnm,
    Fmin,
    Fminnm,
    Fmov,
    Fmsub,
    Fmul,
    Fneg,
    Fnmadd,
    Fnmsub,
    Fnmul,
    Frinta,
    Frinti,
    Frintm,
    Frintn,
    Frintp,
    Frintx,
    Frintz,
    Fsqrt,
    Fsub,
    Scvtf,
    Ucvtf,

    // -- SIMD ------------------------------------------------------------------
    Addp,
    Bif,
    Bit,
    Bsl,
    Cmeq,
    Movi,
    Mvni,
    Pmul,
}
