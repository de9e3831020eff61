//! Whole-buffer listings, one instruction per line.

use std::fmt;

use crate::traits::Disassembler;
use crate::walk::Walk;
use bcdis_core::BYTECODE_COLUMN_GROUPS;

/// Renders a buffer of bytecode with an offset column.
///
/// ```text
///     0 : 0c 05             LdaSmi [5]
///     2 : 11 fb             Star r0
/// ```
///
/// Bytes that fail to decode are listed one at a time with the error and
/// skipped.
pub struct Listing<'a, D: ?Sized> {
    disassembler: &'a D,
    start: usize,
    limit: Option<usize>,
}

impl<'a, D: Disassembler + ?Sized> Listing<'a, D> {
    pub fn new(disassembler: &'a D) -> Self {
        Self {
            disassembler,
            start: 0,
            limit: None,
        }
    }

    /// Begins the listing at `start` bytes into the buffer.
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Stops after `limit` lines.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Writes the listing of `bytes` into `out`.
    pub fn write_to<W: fmt::Write + ?Sized>(&self, out: &mut W, bytes: &[u8]) -> fmt::Result {
        let steps = Walk::new(self.disassembler, bytes).start(self.start);
        for (offset, result) in steps.take(self.limit.unwrap_or(usize::MAX)) {
            match result {
                Ok(instruction) => writeln!(
                    out,
                    "{:>5} : {}",
                    offset,
                    self.disassembler.render_instruction(&instruction)
                )?,
                Err(e) => {
                    log::warn!("skipping byte {:#04x}: {}", bytes[offset], e);
                    writeln!(
                        out,
                        "{:>5} : {:02x} {}; {}",
                        offset,
                        bytes[offset],
                        "   ".repeat(BYTECODE_COLUMN_GROUPS - 1),
                        e
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Returns the listing of `bytes` as a string.
    pub fn render(&self, bytes: &[u8]) -> String {
        let mut out = String::new();
        self.write_to(&mut out, bytes)
            .unwrap_or_else(|_| unreachable!("writing to a String cannot fail"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BytecodeDisassembler;
    use bcdis_core::OpcodeTable;

    #[test]
    fn test_listing_offsets() {
        let disasm = BytecodeDisassembler::new(OpcodeTable::standard()).with_parameter_count(1);
        // LdaSmi [5]; Star r0; Return
        let bytes = [0x0c, 0x05, 0x11, 0xfb, 0x40];
        let text = Listing::new(&disasm).render(&bytes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "    0 : 0c 05             LdaSmi [5]");
        assert_eq!(lines[1], "    2 : 11 fb             Star r0");
        assert_eq!(lines[2], "    4 : 40                Return ");
    }

    #[test]
    fn test_listing_skips_unknown_bytes() {
        let disasm = BytecodeDisassembler::new(OpcodeTable::standard());
        let bytes = [0xee, 0x40];
        let text = Listing::new(&disasm).render(&bytes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("    0 : ee                ; unknown opcode"), "{}", lines[0]);
        assert!(lines[1].starts_with("    1 : 40 "));
    }

    #[test]
    fn test_listing_start_and_limit() {
        let disasm = BytecodeDisassembler::new(OpcodeTable::standard());
        let bytes = [0x08, 0x08, 0x08, 0x40];
        let text = Listing::new(&disasm).start(1).limit(2).render(&bytes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("    1 : 08"));
        assert!(lines[1].starts_with("    2 : 08"));
    }
}
