//! # bcdis-core
//!
//! Instruction-set model for the bcdis bytecode disassembler. This crate
//! defines operand scales, operand types and their widths, interpreter
//! registers and how operands address them, and the metadata interface
//! the disassembler queries, with a table-driven implementation.

pub mod error;
pub mod instruction;
pub mod metadata;
pub mod operand;
pub mod register;
pub mod scale;
pub mod standard;
pub mod table;

pub use error::TableError;
pub use instruction::{Instruction, InstructionDisplay, Operand, BYTECODE_COLUMN_GROUPS};
pub use metadata::BytecodeMetadata;
pub use operand::OperandType;
pub use register::{FrameRegisters, Register, RegisterAddressing, REGISTER_FILE_START_OFFSET};
pub use scale::{OperandScale, OperandSize};
pub use table::{OpcodeInfo, OpcodeKind, OpcodeTable, OpcodeTableBuilder};
