//! Decoded instructions and operands.

use std::fmt;

use crate::{OperandScale, Register, RegisterAddressing};

/// Width of the raw-byte column, in two-digit hex groups.
///
/// Shorter instructions are padded so mnemonics line up across lines.
pub const BYTECODE_COLUMN_GROUPS: usize = 6;

/// A decoded operand value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// Register count (`#n`).
    RegCount(u32),
    /// Flag byte (`#n`).
    Flag(u32),
    /// Constant pool or feedback slot index (`[n]`).
    Index(u32),
    /// Runtime function id (`[n]`).
    RuntimeId(u32),
    /// Intrinsic function id (`[n]`).
    IntrinsicId(u32),
    /// Signed immediate (`[n]`).
    Immediate(i32),
    /// A single register.
    Register(Register),
    /// Consecutive registers `first` through `last`, inclusive.
    RegisterRange { first: Register, last: Register },
}

impl Operand {
    /// Creates a range covering `first` and the `length` registers after it.
    pub fn range(first: Register, length: i32) -> Self {
        Self::RegisterRange {
            first,
            last: first.offset(length),
        }
    }

    /// Returns true if this operand names registers.
    pub fn is_register(&self) -> bool {
        matches!(self, Self::Register(_) | Self::RegisterRange { .. })
    }

    /// Writes the textual form of this operand.
    pub fn write_to<W, R>(&self, out: &mut W, registers: &R, parameter_count: i32) -> fmt::Result
    where
        W: fmt::Write + ?Sized,
        R: RegisterAddressing + ?Sized,
    {
        match *self {
            Self::RegCount(n) | Self::Flag(n) => write!(out, "#{n}"),
            Self::Index(n) | Self::RuntimeId(n) | Self::IntrinsicId(n) => write!(out, "[{n}]"),
            Self::Immediate(n) => write!(out, "[{n}]"),
            Self::Register(reg) => out.write_str(&registers.name(reg, parameter_count)),
            Self::RegisterRange { first, last } => write!(
                out,
                "{}-{}",
                registers.name(first, parameter_count),
                registers.name(last, parameter_count)
            ),
        }
    }
}

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Offset of the first byte (the prefix, if any) in the bytecode.
    pub offset: usize,
    /// Raw bytes, prefix included.
    pub bytes: Vec<u8>,
    /// Opcode byte after any scale prefix.
    pub opcode: u8,
    /// Operand scale selected by the prefix.
    pub scale: OperandScale,
    /// Number of prefix bytes (0 or 1).
    pub prefix_len: usize,
    /// Mnemonic including any scale suffix.
    pub mnemonic: String,
    /// Decoded operands. Empty for debug-break markers.
    pub operands: Vec<Operand>,
    /// Whether this is a debug-break marker.
    pub debug_break: bool,
}

impl Instruction {
    /// Size in bytes, prefix included.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Offset of the next instruction.
    pub fn end_offset(&self) -> usize {
        self.offset + self.size()
    }

    /// Writes the raw-byte column, mnemonic and operands.
    pub fn write_to<W, R>(&self, out: &mut W, registers: &R, parameter_count: i32) -> fmt::Result
    where
        W: fmt::Write + ?Sized,
        R: RegisterAddressing + ?Sized,
    {
        for byte in &self.bytes {
            write!(out, "{byte:02x} ")?;
        }
        for _ in self.bytes.len()..BYTECODE_COLUMN_GROUPS {
            out.write_str("   ")?;
        }

        write!(out, "{} ", self.mnemonic)?;

        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            operand.write_to(out, registers, parameter_count)?;
        }
        Ok(())
    }

    /// Returns a value that formats this instruction with `registers`.
    pub fn display<'a, R>(&'a self, registers: &'a R, parameter_count: i32) -> InstructionDisplay<'a, R>
    where
        R: RegisterAddressing + ?Sized,
    {
        InstructionDisplay {
            instruction: self,
            registers,
            parameter_count,
        }
    }
}

/// [`fmt::Display`] adapter returned by [`Instruction::display`].
pub struct InstructionDisplay<'a, R: ?Sized> {
    instruction: &'a Instruction,
    registers: &'a R,
    parameter_count: i32,
}

impl<R: RegisterAddressing + ?Sized> fmt::Display for InstructionDisplay<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.instruction
            .write_to(f, self.registers, self.parameter_count)
    }
}
