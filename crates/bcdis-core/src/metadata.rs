//! Instruction-set metadata interface.

use crate::{OperandScale, OperandType};

/// Read-only description of an instruction set.
///
/// Opcodes are raw bytes. Apart from [`is_defined`](Self::is_defined),
/// every query assumes the opcode is defined; implementations may panic
/// otherwise.
pub trait BytecodeMetadata {
    /// Returns true if `opcode` names an instruction.
    fn is_defined(&self, opcode: u8) -> bool;

    /// Operand types of `opcode`, in encoding order.
    fn operand_types(&self, opcode: u8) -> &[OperandType];

    /// Mnemonic of `opcode` without any scale suffix.
    fn name(&self, opcode: u8) -> &str;

    /// If `opcode` is a scale prefix, the scale it selects.
    fn scale_prefix(&self, opcode: u8) -> Option<OperandScale>;

    /// Returns true if `opcode` is a debug-break marker.
    fn is_debug_break(&self, opcode: u8) -> bool;

    /// Number of operands of `opcode`.
    fn operand_count(&self, opcode: u8) -> usize {
        self.operand_types(opcode).len()
    }

    /// Type of operand `index` of `opcode`.
    fn operand_type(&self, opcode: u8, index: usize) -> OperandType {
        self.operand_types(opcode)[index]
    }

    /// Byte offset of operand `index` from the opcode byte.
    fn operand_offset(&self, opcode: u8, index: usize, scale: OperandScale) -> usize {
        1 + self.operand_types(opcode)[..index]
            .iter()
            .map(|ty| ty.size(scale).bytes())
            .sum::<usize>()
    }

    /// Size of `opcode` and its operands in bytes, excluding any prefix.
    fn size(&self, opcode: u8, scale: OperandScale) -> usize {
        let types = self.operand_types(opcode);
        self.operand_offset(opcode, types.len(), scale)
    }

    /// Mnemonic of `opcode` as printed under `scale`.
    fn mnemonic(&self, opcode: u8, scale: OperandScale) -> String {
        format!("{}{}", self.name(opcode), scale.mnemonic_suffix())
    }
}

impl<T: BytecodeMetadata + ?Sized> BytecodeMetadata for &T {
    fn is_defined(&self, opcode: u8) -> bool {
        (**self).is_defined(opcode)
    }

    fn operand_types(&self, opcode: u8) -> &[OperandType] {
        (**self).operand_types(opcode)
    }

    fn name(&self, opcode: u8) -> &str {
        (**self).name(opcode)
    }

    fn scale_prefix(&self, opcode: u8) -> Option<OperandScale> {
        (**self).scale_prefix(opcode)
    }

    fn is_debug_break(&self, opcode: u8) -> bool {
        (**self).is_debug_break(opcode)
    }

    fn operand_offset(&self, opcode: u8, index: usize, scale: OperandScale) -> usize {
        (**self).operand_offset(opcode, index, scale)
    }

    fn size(&self, opcode: u8, scale: OperandScale) -> usize {
        (**self).size(opcode, scale)
    }

    fn mnemonic(&self, opcode: u8, scale: OperandScale) -> String {
        (**self).mnemonic(opcode, scale)
    }
}
