// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

/// Errors surfaced by the library API.
///
/// Decode-level failures are not errors: an undecodable encoding yields an
/// `Invalid` instruction record and the stream continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisasmError {
    #[error("base address 0x{address:X} is not {required}-byte aligned")]
    MisalignedBase { address: u64, required: u32 },

    #[error("unknown architecture variant: {0:?}")]
    UnknownArch(String),
}
