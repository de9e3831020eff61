//! Disassembler traits.

use crate::walk::Walk;
use crate::DecodeError;
use bcdis_core::Instruction;

/// Checked decoding over untrusted buffers.
pub trait Disassembler {
    /// Decode a single instruction starting at the first byte of `bytes`.
    ///
    /// # Arguments
    /// * `bytes` - The raw bytes to decode
    /// * `offset` - The bytecode offset of the first byte
    ///
    /// # Returns
    /// The decoded instruction, whose size is the number of bytes consumed.
    fn decode_instruction(&self, bytes: &[u8], offset: usize) -> Result<Instruction, DecodeError>;

    /// Renders a decoded instruction in the column-aligned text form.
    fn render_instruction(&self, instruction: &Instruction) -> String;

    /// Disassemble a block of bytecode into instructions.
    fn disassemble_block(&self, bytes: &[u8], start_offset: usize) -> Vec<Result<Instruction, DecodeError>> {
        Walk::new(self, bytes)
            .base(start_offset)
            .map(|(_, result)| result)
            .collect()
    }
}
