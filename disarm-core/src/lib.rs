// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Table-driven disassembler core for the T32 (Thumb-2) and A64 (AArch64)
//! instruction sets.
//!
//! Bytes come in through an [`ImageReader`]; each instruction is routed
//! through a static decoder tree down to a leaf that runs a list of operand
//! mutators, producing one [`Instruction`] record. Undecodable encodings
//! yield a record with [`Opcode::Invalid`]; only running out of bytes ends
//! the stream.

pub mod a64;
pub mod bitfield;
pub mod decoder;
pub mod disasm;
pub mod immediates;
pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod reader;
pub mod t32;

pub use disasm::Disassembler;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use operand::{Immediate, MemOperand, Operand};
pub use reader::{ImageReader, SliceReader};
