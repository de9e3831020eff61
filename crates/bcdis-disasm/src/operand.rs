//! Operand value decoding.
//!
//! Operands are little-endian and unaligned. The slice passed in starts at
//! the operand's first byte; its width comes from the operand type and
//! scale.

use bcdis_core::{OperandScale, OperandSize, OperandType};

/// Decodes a signed operand, sign-extending 8- and 16-bit forms.
///
/// # Panics
/// If `operand` is shorter than the resolved width. In debug builds, also
/// if `ty` is an unsigned operand type.
pub fn decode_signed(operand: &[u8], ty: OperandType, scale: OperandScale) -> i32 {
    debug_assert!(!ty.is_unsigned(), "{ty} operands are unsigned");
    match ty.size(scale) {
        OperandSize::Byte => operand[0] as i8 as i32,
        OperandSize::Short => i16::from_le_bytes([operand[0], operand[1]]) as i32,
        OperandSize::Quad => i32::from_le_bytes([operand[0], operand[1], operand[2], operand[3]]),
    }
}

/// Decodes an unsigned operand, zero-extending 8- and 16-bit forms.
///
/// # Panics
/// If `operand` is shorter than the resolved width. In debug builds, also
/// if `ty` is a signed operand type.
pub fn decode_unsigned(operand: &[u8], ty: OperandType, scale: OperandScale) -> u32 {
    debug_assert!(ty.is_unsigned(), "{ty} operands are signed");
    match ty.size(scale) {
        OperandSize::Byte => operand[0] as u32,
        OperandSize::Short => u16::from_le_bytes([operand[0], operand[1]]) as u32,
        OperandSize::Quad => u32::from_le_bytes([operand[0], operand[1], operand[2], operand[3]]),
    }
}
