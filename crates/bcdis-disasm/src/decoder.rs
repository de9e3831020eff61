//! Single-instruction bytecode disassembler.

use std::fmt;

use bcdis_core::{
    BytecodeMetadata, FrameRegisters, Instruction, Operand, OperandScale, OperandType,
    RegisterAddressing,
};

use crate::error::DecodeError;
use crate::operand::{decode_signed, decode_unsigned};
use crate::register::decode_register;
use crate::traits::Disassembler;

/// Disassembler for one instruction set and register addressing scheme.
///
/// The trusting entry points ([`decode`](Self::decode),
/// [`write_instruction`](Self::write_instruction),
/// [`render`](Self::render)) assume the buffer holds a complete, valid
/// instruction and panic otherwise. [`Disassembler::decode_instruction`]
/// checks the buffer first.
#[derive(Debug, Clone)]
pub struct BytecodeDisassembler<M, R = FrameRegisters> {
    metadata: M,
    registers: R,
    /// Parameter count used by the [`Disassembler`] impl.
    parameter_count: i32,
}

impl<M: BytecodeMetadata> BytecodeDisassembler<M, FrameRegisters> {
    /// Creates a disassembler using the default frame register layout.
    pub fn new(metadata: M) -> Self {
        Self::with_registers(metadata, FrameRegisters::default())
    }
}

impl<M: BytecodeMetadata, R: RegisterAddressing> BytecodeDisassembler<M, R> {
    /// Creates a disassembler with a custom register addressing scheme.
    pub fn with_registers(metadata: M, registers: R) -> Self {
        Self {
            metadata,
            registers,
            parameter_count: 0,
        }
    }

    /// Sets the parameter count of the frame being disassembled.
    pub fn with_parameter_count(mut self, parameter_count: i32) -> Self {
        self.parameter_count = parameter_count;
        self
    }

    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    pub fn registers(&self) -> &R {
        &self.registers
    }

    pub fn parameter_count(&self) -> i32 {
        self.parameter_count
    }

    /// Resolves the scale prefix, returning `(opcode, scale, prefix_len)`.
    fn resolve(&self, bytes: &[u8]) -> (u8, OperandScale, usize) {
        match self.metadata.scale_prefix(bytes[0]) {
            Some(scale) => (bytes[1], scale, 1),
            None => (bytes[0], OperandScale::Single, 0),
        }
    }

    /// Number of bytes the instruction at the start of `bytes` occupies,
    /// prefix included.
    pub fn instruction_size(&self, bytes: &[u8]) -> usize {
        let (opcode, scale, prefix_len) = self.resolve(bytes);
        prefix_len + self.metadata.size(opcode, scale)
    }

    /// Decodes the instruction at the start of `bytes`.
    ///
    /// `offset` only labels the result.
    ///
    /// # Panics
    /// If `bytes` is shorter than the instruction or names an undefined
    /// opcode.
    pub fn decode(&self, bytes: &[u8], offset: usize) -> Instruction {
        let (opcode, scale, prefix_len) = self.resolve(bytes);
        let size = prefix_len + self.metadata.size(opcode, scale);
        let debug_break = self.metadata.is_debug_break(opcode);

        // Operands of a debug break belong to the instruction it replaced.
        let operands = if debug_break {
            Vec::new()
        } else {
            let operand_bytes = &bytes[prefix_len..size];
            (0..self.metadata.operand_count(opcode))
                .map(|i| {
                    let ty = self.metadata.operand_type(opcode, i);
                    let start = self.metadata.operand_offset(opcode, i, scale);
                    self.decode_operand(&operand_bytes[start..], ty, scale)
                })
                .collect()
        };

        let instruction = Instruction {
            offset,
            bytes: bytes[..size].to_vec(),
            opcode,
            scale,
            prefix_len,
            mnemonic: self.metadata.mnemonic(opcode, scale),
            operands,
            debug_break,
        };
        log::trace!(
            "decoded {} ({} bytes) at offset {}",
            instruction.mnemonic,
            size,
            offset
        );
        instruction
    }

    fn decode_operand(&self, operand: &[u8], ty: OperandType, scale: OperandScale) -> Operand {
        match ty {
            OperandType::RegCount => Operand::RegCount(decode_unsigned(operand, ty, scale)),
            OperandType::Flag8 => Operand::Flag(decode_unsigned(operand, ty, scale)),
            OperandType::Idx => Operand::Index(decode_unsigned(operand, ty, scale)),
            OperandType::RuntimeId => Operand::RuntimeId(decode_unsigned(operand, ty, scale)),
            OperandType::IntrinsicId => Operand::IntrinsicId(decode_unsigned(operand, ty, scale)),
            OperandType::Imm => Operand::Immediate(decode_signed(operand, ty, scale)),
            OperandType::Reg | OperandType::RegOut | OperandType::MaybeReg => {
                Operand::Register(decode_register(operand, ty, scale, &self.registers))
            }
            OperandType::RegPair | OperandType::RegOutPair => {
                self.decode_register_range(operand, ty, scale, 1)
            }
            OperandType::RegTriple | OperandType::RegOutTriple => {
                self.decode_register_range(operand, ty, scale, 2)
            }
        }
    }

    fn decode_register_range(
        &self,
        operand: &[u8],
        ty: OperandType,
        scale: OperandScale,
        length: i32,
    ) -> Operand {
        let first = decode_register(operand, ty, scale, &self.registers);
        Operand::range(first, length)
    }

    /// Writes the text form of the instruction at the start of `bytes`
    /// and returns the number of bytes it occupies.
    ///
    /// # Panics
    /// Same conditions as [`decode`](Self::decode).
    pub fn write_instruction<W>(
        &self,
        out: &mut W,
        bytes: &[u8],
        parameter_count: i32,
    ) -> Result<usize, fmt::Error>
    where
        W: fmt::Write + ?Sized,
    {
        let instruction = self.decode(bytes, 0);
        instruction.write_to(out, &self.registers, parameter_count)?;
        Ok(instruction.size())
    }

    /// Renders the instruction at the start of `bytes`, returning the text
    /// and the number of bytes consumed.
    ///
    /// # Panics
    /// Same conditions as [`decode`](Self::decode).
    pub fn render(&self, bytes: &[u8], parameter_count: i32) -> (String, usize) {
        let mut text = String::new();
        let size = self
            .write_instruction(&mut text, bytes, parameter_count)
            .unwrap_or_else(|_| unreachable!("writing to a String cannot fail"));
        (text, size)
    }
}

impl<M: BytecodeMetadata, R: RegisterAddressing> Disassembler for BytecodeDisassembler<M, R> {
    fn decode_instruction(&self, bytes: &[u8], offset: usize) -> Result<Instruction, DecodeError> {
        let first = *bytes
            .first()
            .ok_or_else(|| DecodeError::truncated(offset, 1, 0))?;
        if !self.metadata.is_defined(first) {
            return Err(DecodeError::unknown_opcode(offset, &bytes[..1]));
        }

        if self.metadata.scale_prefix(first).is_some() {
            let opcode = *bytes
                .get(1)
                .ok_or_else(|| DecodeError::truncated(offset, 2, bytes.len()))?;
            if !self.metadata.is_defined(opcode) {
                return Err(DecodeError::unknown_opcode(offset, &bytes[..2]));
            }
            if self.metadata.scale_prefix(opcode).is_some() {
                return Err(DecodeError::invalid_encoding(
                    offset,
                    format!(
                        "scale prefix {} followed by scale prefix {}",
                        self.metadata.name(first),
                        self.metadata.name(opcode)
                    ),
                ));
            }
        }

        let needed = self.instruction_size(bytes);
        if bytes.len() < needed {
            return Err(DecodeError::truncated(offset, needed, bytes.len()));
        }
        Ok(self.decode(&bytes[..needed], offset))
    }

    fn render_instruction(&self, instruction: &Instruction) -> String {
        instruction
            .display(&self.registers, self.parameter_count)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcdis_core::{OpcodeTable, Register};
    use OperandType::*;

    fn table() -> OpcodeTable {
        OpcodeTable::builder()
            .scale_prefix(0x00, "Wide", OperandScale::Double)
            .scale_prefix(0x01, "ExtraWide", OperandScale::Quad)
            .debug_break(0x02, "DebugBreak2", &[Reg, Reg])
            .opcode(0x0c, "LdaSmi", &[Imm])
            .opcode(0x10, "Mov", &[Reg, RegOut])
            .opcode(0x20, "CallRuntime", &[RuntimeId, RegPair, RegCount])
            .opcode(0x21, "ForInPrepare", &[RegOutTriple, Idx])
            .opcode(0x22, "CreateClosure", &[Idx, Idx, Flag8])
            .opcode(0x23, "Return", &[])
            .build()
            .unwrap()
    }

    /// Encodes local register `index` as a one-byte operand.
    fn reg(index: i32) -> u8 {
        FrameRegisters::default().to_operand(Register::new(index)) as i8 as u8
    }

    fn pad(groups: usize) -> String {
        "   ".repeat(6 - groups)
    }

    #[test]
    fn test_lda_smi() {
        let disasm = BytecodeDisassembler::new(table());
        let (text, size) = disasm.render(&[0x0c, 0x05], 0);
        assert_eq!(size, 2);
        assert_eq!(text, format!("0c 05 {}LdaSmi [5]", pad(2)));
    }

    #[test]
    fn test_negative_immediate() {
        let disasm = BytecodeDisassembler::new(table());
        let (text, _) = disasm.render(&[0x0c, 0x80], 0);
        assert!(text.ends_with("LdaSmi [-128]"), "{text}");
    }

    #[test]
    fn test_registers_and_parameters() {
        let disasm = BytecodeDisassembler::new(table());
        let bytes = [0x10, reg(-2), reg(3)];
        let (text, size) = disasm.render(&bytes, 2);
        assert_eq!(size, 3);
        assert_eq!(
            text,
            format!("10 {:02x} {:02x} {}Mov <this>, r3", bytes[1], bytes[2], pad(3))
        );
    }

    #[test]
    fn test_register_pair_and_fixed_widths() {
        let disasm = BytecodeDisassembler::new(table());
        let bytes = [0x20, 0x34, 0x12, reg(4), 0x02];
        let (text, size) = disasm.render(&bytes, 0);
        assert_eq!(size, 5);
        assert!(text.ends_with("CallRuntime [4660], r4-r5, #2"), "{text}");
    }

    #[test]
    fn test_register_triple() {
        let disasm = BytecodeDisassembler::new(table());
        let (text, _) = disasm.render(&[0x21, reg(7), 0x09], 0);
        assert!(text.ends_with("ForInPrepare r7-r9, [9]"), "{text}");
    }

    #[test]
    fn test_flags() {
        let disasm = BytecodeDisassembler::new(table());
        let (text, _) = disasm.render(&[0x22, 0x01, 0x02, 0x83], 0);
        assert!(text.ends_with("CreateClosure [1], [2], #131"), "{text}");
    }

    #[test]
    fn test_no_operands_keeps_trailing_space() {
        let disasm = BytecodeDisassembler::new(table());
        let (text, size) = disasm.render(&[0x23], 0);
        assert_eq!(size, 1);
        assert_eq!(text, format!("23 {}Return ", pad(1)));
    }

    #[test]
    fn test_wide_prefix() {
        let disasm = BytecodeDisassembler::new(table());
        let bytes = [0x00, 0x0c, 0x00, 0x80];
        let (text, size) = disasm.render(&bytes, 0);
        assert_eq!(size, 4);
        assert_eq!(text, format!("00 0c 00 80 {}LdaSmi.Wide [-32768]", pad(4)));
    }

    #[test]
    fn test_extra_wide_overflows_column() {
        let disasm = BytecodeDisassembler::new(table());
        let bytes = [0x01, 0x0c, 0x00, 0x00, 0x01, 0x00];
        let (text, size) = disasm.render(&bytes, 0);
        assert_eq!(size, 6);
        assert_eq!(text, "01 0c 00 00 01 00 LdaSmi.ExtraWide [65536]");

        let bytes = [0x01, 0x10, 0xfb, 0xff, 0xff, 0xff, 0xfa, 0xff, 0xff, 0xff];
        let (text, size) = disasm.render(&bytes, 0);
        assert_eq!(size, 10);
        assert!(text.starts_with("01 10 fb ff ff ff fa ff ff ff Mov.ExtraWide "), "{text}");
        assert!(text.ends_with("r0, r1"), "{text}");
    }

    #[test]
    fn test_debug_break_has_no_operands() {
        let disasm = BytecodeDisassembler::new(table());
        let (text, size) = disasm.render(&[0x02, reg(0), reg(1)], 0);
        assert_eq!(size, 3);
        assert!(text.ends_with("DebugBreak2 "), "{text}");
        let insn = disasm.decode(&[0x02, reg(0), reg(1)], 0);
        assert!(insn.debug_break);
        assert!(insn.operands.is_empty());
    }

    #[test]
    fn test_write_into_existing_buffer() {
        let disasm = BytecodeDisassembler::new(table());
        let mut out = String::from("> ");
        let size = disasm.write_instruction(&mut out, &[0x0c, 0x07, 0xff], 0).unwrap();
        assert_eq!(size, 2);
        assert_eq!(out, format!("> 0c 07 {}LdaSmi [7]", pad(2)));
    }

    #[test]
    fn test_checked_unknown_opcode() {
        let disasm = BytecodeDisassembler::new(table());
        let err = disasm.decode_instruction(&[0xee, 0x00], 8).unwrap_err();
        assert_eq!(err, DecodeError::unknown_opcode(8, &[0xee]));
        let err = disasm.decode_instruction(&[0x00, 0xee], 8).unwrap_err();
        assert_eq!(err, DecodeError::unknown_opcode(8, &[0x00, 0xee]));
    }

    #[test]
    fn test_checked_truncated() {
        let disasm = BytecodeDisassembler::new(table());
        assert_eq!(
            disasm.decode_instruction(&[], 0).unwrap_err(),
            DecodeError::truncated(0, 1, 0)
        );
        assert_eq!(
            disasm.decode_instruction(&[0x00], 3).unwrap_err(),
            DecodeError::truncated(3, 2, 1)
        );
        assert_eq!(
            disasm.decode_instruction(&[0x00, 0x0c, 0x01], 0).unwrap_err(),
            DecodeError::truncated(0, 4, 3)
        );
    }

    #[test]
    fn test_checked_double_prefix() {
        let disasm = BytecodeDisassembler::new(table());
        let err = disasm.decode_instruction(&[0x00, 0x01, 0x0c], 0).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidEncoding { offset: 0, .. }));
    }

    #[test]
    fn test_checked_extra_wide_range_at_index_limit() {
        let disasm = BytecodeDisassembler::new(table());
        // First register decodes to i32::MAX; the rest of the triple wraps.
        let bytes = [0x01, 0x21, 0xfc, 0xff, 0xff, 0x7f, 0x00, 0x00, 0x00, 0x00];
        let insn = disasm.decode_instruction(&bytes, 0).unwrap();
        assert_eq!(insn.size(), 10);
        assert_eq!(
            insn.operands[0],
            Operand::RegisterRange {
                first: Register::new(i32::MAX),
                last: Register::new(i32::MIN + 1),
            }
        );
        let text = disasm.render_instruction(&insn);
        assert!(text.ends_with("ForInPrepare.ExtraWide r2147483647-r-2147483647, [0]"), "{text}");
    }

    #[test]
    fn test_checked_matches_trusting() {
        let disasm = BytecodeDisassembler::new(table()).with_parameter_count(1);
        let bytes = [0x00, 0x10, 0xfb, 0xff, 0xfa, 0xff, 0x23];
        let insn = disasm.decode_instruction(&bytes, 0).unwrap();
        assert_eq!(insn.size(), 6);
        assert_eq!(disasm.render_instruction(&insn), disasm.render(&bytes, 1).0);
    }

    #[test]
    fn test_block() {
        let disasm = BytecodeDisassembler::new(table());
        let bytes = [0x0c, 0x01, 0xee, 0x23];
        let block = disasm.disassemble_block(&bytes, 0x10);
        assert_eq!(block.len(), 3);
        assert_eq!(block[0].as_ref().unwrap().offset, 0x10);
        assert!(block[1].is_err());
        assert_eq!(block[2].as_ref().unwrap().offset, 0x13);
    }
}
