//! Operand roles and their encoding properties.

use crate::{OperandScale, OperandSize};

/// The semantic role of an operand.
///
/// Fixed per opcode and position by the instruction-set metadata. The role
/// determines both the operand's byte width and how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OperandType {
    /// Register read by the instruction.
    Reg,
    /// First of two consecutive input registers.
    RegPair,
    /// First of three consecutive input registers.
    RegTriple,
    /// Register written by the instruction.
    RegOut,
    /// First of two consecutive output registers.
    RegOutPair,
    /// First of three consecutive output registers.
    RegOutTriple,
    /// Register that may be absent (encoded as a sentinel register).
    MaybeReg,
    /// Number of registers in a register list.
    RegCount,
    /// Index into a constant pool or feedback vector.
    Idx,
    /// Signed immediate.
    Imm,
    /// Runtime function id.
    RuntimeId,
    /// Intrinsic function id.
    IntrinsicId,
    /// 8-bit flag set.
    Flag8,
}

impl OperandType {
    /// Returns true if this operand is decoded zero-extended.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::RegCount | Self::Idx | Self::RuntimeId | Self::IntrinsicId | Self::Flag8
        )
    }

    /// Returns true if this operand names one or more registers.
    pub fn is_register(&self) -> bool {
        matches!(
            self,
            Self::Reg
                | Self::RegPair
                | Self::RegTriple
                | Self::RegOut
                | Self::RegOutPair
                | Self::RegOutTriple
                | Self::MaybeReg
        )
    }

    /// Returns true if the width of this operand follows the operand scale.
    pub fn is_scalable(&self) -> bool {
        !matches!(self, Self::Flag8 | Self::IntrinsicId | Self::RuntimeId)
    }

    /// Resolves the byte width of this operand under `scale`.
    pub fn size(&self, scale: OperandScale) -> OperandSize {
        match self {
            Self::Flag8 | Self::IntrinsicId => OperandSize::Byte,
            Self::RuntimeId => OperandSize::Short,
            _ => OperandSize::scaled(scale),
        }
    }

    /// Number of registers past the first one covered by a range operand.
    pub fn range_length(&self) -> Option<i32> {
        match self {
            Self::RegPair | Self::RegOutPair => Some(1),
            Self::RegTriple | Self::RegOutTriple => Some(2),
            _ => None,
        }
    }

    /// Returns the name used for this type in opcode table files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reg => "reg",
            Self::RegPair => "reg_pair",
            Self::RegTriple => "reg_triple",
            Self::RegOut => "reg_out",
            Self::RegOutPair => "reg_out_pair",
            Self::RegOutTriple => "reg_out_triple",
            Self::MaybeReg => "maybe_reg",
            Self::RegCount => "reg_count",
            Self::Idx => "idx",
            Self::Imm => "imm",
            Self::RuntimeId => "runtime_id",
            Self::IntrinsicId => "intrinsic_id",
            Self::Flag8 => "flag8",
        }
    }
}

impl std::fmt::Display for OperandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
