//! Built-in instruction set.
//!
//! An accumulator-plus-register-file ISA in the style of a JavaScript
//! bytecode interpreter. Byte `0x0C` is `LdaSmi`, a single signed
//! immediate.

use crate::{OpcodeTable, OperandScale, OperandType};
use OperandType::*;

/// Ordinary opcodes of the standard table, after the prefixes and
/// debug-break markers.
const OPCODES: &[(u8, &str, &[OperandType])] = &[
    // Accumulator loads
    (0x08, "LdaZero", &[]),
    (0x09, "LdaUndefined", &[]),
    (0x0A, "LdaNull", &[]),
    (0x0B, "LdaTheHole", &[]),
    (0x0C, "LdaSmi", &[Imm]),
    (0x0D, "LdaConstant", &[Idx]),
    (0x0E, "LdaTrue", &[]),
    (0x0F, "LdaFalse", &[]),
    // Register transfers
    (0x10, "Ldar", &[Reg]),
    (0x11, "Star", &[RegOut]),
    (0x12, "Mov", &[Reg, RegOut]),
    // Globals and contexts
    (0x13, "LdaGlobal", &[Idx, Idx]),
    (0x14, "StaGlobal", &[Idx, Idx]),
    (0x15, "PushContext", &[RegOut]),
    (0x16, "PopContext", &[Reg]),
    (0x17, "LdaContextSlot", &[Reg, Idx, Idx]),
    (0x18, "StaContextSlot", &[Reg, Idx, Idx]),
    // Properties
    (0x19, "LdaNamedProperty", &[Reg, Idx, Idx]),
    (0x1A, "StaNamedProperty", &[Reg, Idx, Idx]),
    (0x1B, "LdaKeyedProperty", &[Reg, Idx]),
    (0x1C, "StaKeyedProperty", &[Reg, Reg, Idx]),
    // Arithmetic and tests
    (0x1D, "Add", &[Reg, Idx]),
    (0x1E, "Sub", &[Reg, Idx]),
    (0x1F, "Mul", &[Reg, Idx]),
    (0x20, "Div", &[Reg, Idx]),
    (0x21, "AddSmi", &[Imm, Idx]),
    (0x22, "Inc", &[Idx]),
    (0x23, "Dec", &[Idx]),
    (0x24, "TestEqual", &[Reg, Idx]),
    (0x25, "TestLessThan", &[Reg, Idx]),
    (0x26, "TypeOf", &[]),
    (0x27, "LogicalNot", &[]),
    // Calls
    (0x28, "CallProperty", &[Reg, Reg, RegCount, Idx]),
    (0x29, "CallUndefinedReceiver2", &[Reg, Reg, Reg, Idx]),
    (0x2A, "Construct", &[Reg, Reg, RegCount, Idx]),
    (0x2B, "CallRuntime", &[RuntimeId, Reg, RegCount]),
    (0x2C, "CallRuntimeForPair", &[RuntimeId, Reg, RegCount, RegOutPair]),
    (0x2D, "InvokeIntrinsic", &[IntrinsicId, Reg, RegCount]),
    (0x2E, "CallJSRuntime", &[Idx, Reg, RegCount]),
    // Iteration
    (0x2F, "ForInPrepare", &[RegOutTriple, Idx]),
    (0x30, "ForInNext", &[Reg, Reg, RegPair, Idx]),
    (0x31, "ForInStep", &[Reg]),
    (0x32, "ForOfNext", &[RegTriple, Idx]),
    // Literals and closures
    (0x33, "CreateClosure", &[Idx, Idx, Flag8]),
    (0x34, "CreateObjectLiteral", &[Idx, Idx, Flag8]),
    (0x35, "CreateArrayLiteral", &[Idx, Idx, Flag8]),
    (0x36, "CreateRegExpLiteral", &[Idx, Idx, Flag8]),
    (0x37, "CreateBlockContext", &[Idx, MaybeReg]),
    // Control flow
    (0x38, "Jump", &[Imm]),
    (0x39, "JumpIfTrue", &[Imm]),
    (0x3A, "JumpIfFalse", &[Imm]),
    (0x3B, "JumpIfUndefined", &[Imm]),
    (0x3C, "JumpLoop", &[Imm, Imm]),
    (0x3D, "StackCheck", &[]),
    (0x3E, "Throw", &[]),
    (0x3F, "ReThrow", &[]),
    (0x40, "Return", &[]),
    // Generators
    (0x41, "SuspendGenerator", &[Reg, Reg, RegCount, Idx]),
    (0x42, "ResumeGenerator", &[Reg, RegOut, RegCount]),
    (0x43, "Illegal", &[]),
];

impl OpcodeTable {
    /// Returns the built-in instruction set.
    pub fn standard() -> Self {
        let builder = OpcodeTable::builder()
            .scale_prefix(0x00, "Wide", OperandScale::Double)
            .scale_prefix(0x01, "ExtraWide", OperandScale::Quad)
            .debug_break(0x02, "DebugBreakWide", &[RegCount])
            .debug_break(0x03, "DebugBreakExtraWide", &[RegCount])
            .debug_break(0x04, "DebugBreak0", &[])
            .debug_break(0x05, "DebugBreak1", &[Reg])
            .debug_break(0x06, "DebugBreak2", &[Reg, Reg])
            .debug_break(0x07, "DebugBreak3", &[Reg, Reg, Reg]);

        OPCODES
            .iter()
            .fold(builder, |builder, &(byte, name, operands)| {
                builder.opcode(byte, name, operands)
            })
            .build()
            .unwrap_or_else(|e| unreachable!("standard opcode table is inconsistent: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BytecodeMetadata;

    #[test]
    fn test_standard_table_builds() {
        let table = OpcodeTable::standard();
        assert_eq!(table.len(), OPCODES.len() + 8);
    }

    #[test]
    fn test_lda_smi() {
        let table = OpcodeTable::standard();
        assert_eq!(table.name(0x0C), "LdaSmi");
        assert_eq!(table.operand_types(0x0C), &[Imm]);
        assert_eq!(table.size(0x0C, OperandScale::Single), 2);
    }

    #[test]
    fn test_prefixes() {
        let table = OpcodeTable::standard();
        assert_eq!(table.scale_prefix(0x00), Some(OperandScale::Double));
        assert_eq!(table.scale_prefix(0x01), Some(OperandScale::Quad));
        let prefixes = (0..=255u8).filter(|&b| table.scale_prefix(b).is_some()).count();
        assert_eq!(prefixes, 2);
    }

    #[test]
    fn test_debug_breaks_have_no_scale_semantics() {
        let table = OpcodeTable::standard();
        for byte in 0x02..=0x07 {
            assert!(table.is_debug_break(byte));
            assert!(table.scale_prefix(byte).is_none());
        }
    }

    #[test]
    fn test_every_opcode_fits_six_columns_unscaled() {
        let table = OpcodeTable::standard();
        for info in table.iter() {
            assert!(
                table.size(info.byte, OperandScale::Single) <= 6,
                "{} is wider than the hex column",
                info.name
            );
        }
    }
}
