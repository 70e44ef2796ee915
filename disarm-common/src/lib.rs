// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod error;
pub mod registers;
pub mod settings;
pub mod types;

pub use error::DisasmError;
pub use registers::{Register, RegisterFamily};
pub use settings::ArchVariant;
pub use types::*;
