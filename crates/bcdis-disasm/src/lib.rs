//! # bcdis-disasm
//!
//! Bytecode disassembler for register-based virtual machines.
//!
//! This crate provides:
//! - operand value decoding (signed and unsigned, 1/2/4-byte widths)
//! - register operand decoding through a [`RegisterAddressing`] scheme
//! - single-instruction disassembly with scale prefixes and column-aligned
//!   text output
//! - sequential walks and whole-buffer listings
//!
//! [`RegisterAddressing`]: bcdis_core::RegisterAddressing

pub mod decoder;
pub mod error;
pub mod listing;
pub mod operand;
pub mod register;
pub mod traits;
pub mod walk;

pub use decoder::BytecodeDisassembler;
pub use error::DecodeError;
pub use listing::Listing;
pub use operand::{decode_signed, decode_unsigned};
pub use register::decode_register;
pub use traits::Disassembler;
pub use walk::Walk;
