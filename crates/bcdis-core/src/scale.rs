//! Operand scaling and resolved operand widths.

/// Multiplier applied to scalable operands, selected by a prefix opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OperandScale {
    /// No prefix: scalable operands are one byte wide.
    #[default]
    Single,
    /// `Wide` prefix: scalable operands are two bytes wide.
    Double,
    /// `ExtraWide` prefix: scalable operands are four bytes wide.
    Quad,
}

impl OperandScale {
    /// All scales, narrowest first.
    pub const ALL: [OperandScale; 3] = [Self::Single, Self::Double, Self::Quad];

    /// Returns the multiplier (1, 2 or 4).
    pub fn multiplier(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Quad => 4,
        }
    }

    /// Suffix appended to mnemonics of scaled instructions.
    pub fn mnemonic_suffix(&self) -> &'static str {
        match self {
            Self::Single => "",
            Self::Double => ".Wide",
            Self::Quad => ".ExtraWide",
        }
    }

    /// Returns the name of this scale.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Quad => "quad",
        }
    }
}

/// Resolved byte width of a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandSize {
    Byte,
    Short,
    Quad,
}

impl OperandSize {
    /// Width in bytes.
    pub fn bytes(&self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Short => 2,
            Self::Quad => 4,
        }
    }

    /// Scales a one-byte base width.
    pub fn scaled(scale: OperandScale) -> Self {
        match scale {
            OperandScale::Single => Self::Byte,
            OperandScale::Double => Self::Short,
            OperandScale::Quad => Self::Quad,
        }
    }
}
