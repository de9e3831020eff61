//! Error types for bcdis-core.

use thiserror::Error;

/// Error building or loading an opcode table.
#[derive(Error, Debug)]
pub enum TableError {
    /// Two entries claim the same opcode byte.
    #[error("opcode {byte:#04x} defined twice ({first} and {second})")]
    DuplicateOpcode {
        byte: u8,
        first: String,
        second: String,
    },

    /// An entry has an empty mnemonic.
    #[error("opcode {0:#04x} has an empty mnemonic")]
    EmptyMnemonic(u8),

    /// A scale prefix declares operands.
    #[error("scale prefix {name} ({byte:#04x}) must not take operands")]
    PrefixWithOperands { byte: u8, name: String },

    /// A scale prefix selects the unscaled width.
    #[error("scale prefix {name} ({byte:#04x}) must select a wider scale")]
    SingleScalePrefix { byte: u8, name: String },

    /// The table file is not valid JSON or does not match the schema.
    #[cfg(feature = "serde")]
    #[error("invalid opcode table: {0}")]
    Json(#[from] serde_json::Error),
}
