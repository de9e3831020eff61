//! Sequential decoding over a buffer.

use bcdis_core::Instruction;

use crate::error::DecodeError;
use crate::traits::Disassembler;

/// Iterator over the instructions of a buffer.
///
/// Yields the buffer position of each step with its decode result. A
/// failed decode consumes one byte, so every byte from the start position
/// on is covered exactly once.
pub struct Walk<'a, D: ?Sized> {
    disassembler: &'a D,
    bytes: &'a [u8],
    position: usize,
    base: usize,
}

impl<'a, D: Disassembler + ?Sized> Walk<'a, D> {
    pub fn new(disassembler: &'a D, bytes: &'a [u8]) -> Self {
        Self {
            disassembler,
            bytes,
            position: 0,
            base: 0,
        }
    }

    /// Begins at `position` bytes into the buffer.
    pub fn start(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Labels buffer position 0 as bytecode offset `base`.
    pub fn base(mut self, base: usize) -> Self {
        self.base = base;
        self
    }
}

impl<'a, D: Disassembler + ?Sized> Iterator for Walk<'a, D> {
    type Item = (usize, Result<Instruction, DecodeError>);

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.position;
        let rest = self.bytes.get(position..).filter(|rest| !rest.is_empty())?;

        let result = self
            .disassembler
            .decode_instruction(rest, self.base + position);
        self.position += match &result {
            Ok(instruction) => instruction.size(),
            Err(_) => 1,
        };
        Some((position, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BytecodeDisassembler;
    use bcdis_core::OpcodeTable;

    #[test]
    fn test_walk_positions_and_labels() {
        let disasm = BytecodeDisassembler::new(OpcodeTable::standard());
        // LdaSmi [1]; <unknown>; Return
        let bytes = [0x0c, 0x01, 0xee, 0x40];
        let steps: Vec<_> = Walk::new(&disasm, &bytes).base(0x20).collect();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].0, 0);
        assert_eq!(steps[0].1.as_ref().unwrap().offset, 0x20);
        assert_eq!(steps[1].0, 2);
        assert_eq!(steps[1].1.as_ref().unwrap_err().offset(), 0x22);
        assert_eq!(steps[2].0, 3);
    }

    #[test]
    fn test_walk_start_past_end() {
        let disasm = BytecodeDisassembler::new(OpcodeTable::standard());
        assert_eq!(Walk::new(&disasm, &[0x40]).start(1).count(), 0);
        assert_eq!(Walk::new(&disasm, &[0x40]).start(5).count(), 0);
    }
}
