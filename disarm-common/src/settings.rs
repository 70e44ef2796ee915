// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Disassembler configuration.

use std::str::FromStr;

use crate::error::DisasmError;

/// Instruction-set variant a disassembler instance is constructed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchVariant {
    /// Thumb-2: variable-length 16/32-bit encodings.
    T32,
    /// AArch64: fixed 32-bit encodings.
    A64,
}

impl ArchVariant {
    /// Required alignment of the image base address, in bytes.
    #[inline]
    pub const fn alignment(self) -> u32 {
        match self {
            ArchVariant::T32 => 2,
            ArchVariant::A64 => 4,
        }
    }
}

impl FromStr for ArchVariant {
    type Err = DisasmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "t32" | "thumb" | "thumb2" => Ok(ArchVariant::T32),
            "a64" | "aarch64" | "arm64" => Ok(ArchVariant::A64),
            other => Err(DisasmError::UnknownArch(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("a64".parse::<ArchVariant>().unwrap(), ArchVariant::A64);
        assert_eq!("Thumb".parse::<ArchVariant>().unwrap(), ArchVariant::T32);
        assert!("m68k".parse::<ArchVariant>().is_err());
    }

    #[test]
    fn test_alignment() {
        assert_eq!(ArchVariant::T32.alignment(), 2);
        assert_eq!(ArchVariant::A64.alignment(), 4);
    }
}
