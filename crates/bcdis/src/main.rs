//! bcdis - a register-VM bytecode disassembler
//!
//! Usage:
//!   bcdis <file>                   Disassemble raw bytecode
//!   bcdis <file> --hex             Disassemble hex text (`0c 05 40`)
//!   bcdis <file> -p 3              Name registers for a 3-parameter frame
//!   bcdis <file> --table isa.json  Use a custom opcode table
//!   bcdis --dump-table             Print the built-in opcode table as JSON

mod input;

use anyhow::{Context, Result};
use bcdis_core::{FrameRegisters, Instruction, OpcodeTable, REGISTER_FILE_START_OFFSET};
use bcdis_disasm::{BytecodeDisassembler, Disassembler, Listing, Walk};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bcdis")]
#[command(about = "A register-VM bytecode disassembler", long_about = None)]
struct Cli {
    /// Path to the bytecode file
    #[arg(required_unless_present = "dump_table")]
    input: Option<PathBuf>,

    /// Read the input as hex text instead of raw bytes
    #[arg(long)]
    hex: bool,

    /// Parameter count of the frame, receiver included
    #[arg(short, long, default_value = "1")]
    params: i32,

    /// JSON opcode table to use instead of the built-in one
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Operand value that encodes r0
    #[arg(long, default_value_t = REGISTER_FILE_START_OFFSET, allow_hyphen_values = true)]
    register_offset: i32,

    /// Offset to start disassembling at (decimal or 0x hex)
    #[arg(short, long, value_parser = input::parse_offset, default_value = "0")]
    start: usize,

    /// Maximum number of instructions to print
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Emit one JSON object per instruction
    #[arg(long)]
    json: bool,

    /// Print the opcode table as JSON and exit
    #[arg(long)]
    dump_table: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// JSON form of a decoded instruction.
#[derive(Serialize)]
struct InstructionLine<'a> {
    #[serde(flatten)]
    instruction: &'a Instruction,
    text: String,
}

/// JSON form of a byte that failed to decode.
#[derive(Serialize)]
struct ErrorLine {
    offset: usize,
    error: String,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn load_table(path: Option<&PathBuf>) -> Result<OpcodeTable> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read opcode table: {}", path.display()))?;
            OpcodeTable::from_json(&json)
                .with_context(|| format!("Failed to load opcode table: {}", path.display()))
        }
        None => Ok(OpcodeTable::standard()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let table = load_table(cli.table.as_ref())?;
    log::info!("using opcode table with {} opcodes", table.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.dump_table {
        writeln!(out, "{}", table.to_json()?)?;
        return Ok(());
    }

    let path = cli.input.as_ref().context("No input file given")?;
    let bytes = input::read_bytecode(path, cli.hex)?;
    log::info!("read {} bytes from {}", bytes.len(), path.display());

    let disasm = BytecodeDisassembler::with_registers(table, FrameRegisters::new(cli.register_offset))
        .with_parameter_count(cli.params);

    if cli.json {
        write_json(&mut out, &disasm, &bytes, cli.start, cli.count)?;
    } else {
        let mut listing = Listing::new(&disasm).start(cli.start);
        if let Some(count) = cli.count {
            listing = listing.limit(count);
        }
        write!(out, "{}", listing.render(&bytes))?;
    }

    Ok(())
}

fn write_json<W: Write, D: Disassembler>(
    out: &mut W,
    disasm: &D,
    bytes: &[u8],
    start: usize,
    count: Option<usize>,
) -> Result<()> {
    let steps = Walk::new(disasm, bytes).start(start);
    for (offset, result) in steps.take(count.unwrap_or(usize::MAX)) {
        let line = match result {
            Ok(instruction) => serde_json::to_string(&InstructionLine {
                text: disasm.render_instruction(&instruction),
                instruction: &instruction,
            })?,
            Err(e) => serde_json::to_string(&ErrorLine {
                offset,
                error: e.to_string(),
            })?,
        };
        writeln!(out, "{line}")?;
    }

    Ok(())
}
