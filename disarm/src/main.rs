// SPDX-FileCopyrightText: 2026 disarm contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use memmap2::Mmap;

use disarm_common::ArchVariant;
use disarm_core::{Disassembler, SliceReader};

/// disarm - T32/A64 machine-code disassembler
#[derive(Parser, Debug)]
#[command(name = "disarm", version, about = "Decode T32 or A64 machine code into instruction records")]
struct Args {
    /// Binary file with raw machine code
    file: PathBuf,

    /// Instruction set: t32 or a64
    #[arg(short, long, default_value = "a64")]
    arch: String,

    /// Base address of the image (hex accepted with 0x prefix)
    #[arg(short, long, default_value = "0", value_parser = parse_address)]
    base: u64,

    /// Byte offset into the file to start at
    #[arg(short, long, default_value_t = 0)]
    offset: usize,

    /// Decode at most this many instructions
    #[arg(short, long)]
    limit: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address {s:?}: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let arch: ArchVariant = args
        .arch
        .parse()
        .with_context(|| format!("unsupported architecture {:?}", args.arch))?;

    let file = File::open(&args.file)
        .with_context(|| format!("cannot open {}", args.file.display()))?;
    // Safety: the mapping is read-only and lives for the whole run.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("cannot map {}", args.file.display()))?;
    let data = map
        .get(args.offset..)
        .with_context(|| format!("offset {} is past the end of the file", args.offset))?;

    info!(
        "disassembling {} ({} bytes, {:?}, base {:#X})",
        args.file.display(),
        data.len(),
        arch,
        args.base
    );

    let dasm = Disassembler::new(arch, SliceReader::new(data, args.base))?;
    let limit = args.limit.unwrap_or(usize::MAX);
    let mut total = 0usize;
    let mut undecoded = 0usize;
    for insn in dasm.take(limit) {
        if !insn.is_valid() {
            undecoded += 1;
        }
        println!("{:08X} {:?}", insn.address, insn);
        total += 1;
    }
    info!("{total} instructions, {undecoded} undecodable");
    Ok(())
}
