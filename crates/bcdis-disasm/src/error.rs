//! Errors from the checked decode path.

use thiserror::Error;

/// Why the bytes at an offset do not form an instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Opcode byte, or prefix and opcode, with no table entry.
    #[error("unknown opcode at offset {offset}: {bytes:02x?}")]
    UnknownOpcode { offset: usize, bytes: Vec<u8> },

    /// Buffer ends before the instruction's last operand byte.
    #[error("truncated instruction at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Defined bytes in an illegal sequence, such as two scale prefixes.
    #[error("invalid encoding at offset {offset}: {reason}")]
    InvalidEncoding { offset: usize, reason: String },
}

impl DecodeError {
    /// `bytes` are the prefix and opcode bytes that were looked up.
    pub fn unknown_opcode(offset: usize, bytes: &[u8]) -> Self {
        Self::UnknownOpcode {
            offset,
            bytes: bytes.to_vec(),
        }
    }

    /// `needed` counts the prefix byte, if any.
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available,
        }
    }

    pub fn invalid_encoding(offset: usize, reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            offset,
            reason: reason.into(),
        }
    }

    /// Bytecode offset of the first byte that failed to decode.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnknownOpcode { offset, .. }
            | Self::Truncated { offset, .. }
            | Self::InvalidEncoding { offset, .. } => *offset,
        }
    }
}
