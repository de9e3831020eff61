//! Register operand decoding.

use bcdis_core::{OperandScale, OperandType, Register, RegisterAddressing};

use crate::operand::decode_signed;

/// Decodes a register operand.
///
/// The operand is read through the signed path and then mapped back to a
/// register by `registers`, which owns the producer's bias.
///
/// # Panics
/// If `operand` is shorter than the resolved width. In debug builds, also
/// if `ty` is not a register type.
pub fn decode_register<R>(
    operand: &[u8],
    ty: OperandType,
    scale: OperandScale,
    registers: &R,
) -> Register
where
    R: RegisterAddressing + ?Sized,
{
    debug_assert!(ty.is_register(), "{ty} is not a register operand");
    registers.from_operand(decode_signed(operand, ty, scale))
}
