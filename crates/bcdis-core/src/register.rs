//! Interpreter register representation and addressing.
//!
//! Registers live in the interpreter frame. Locals have non-negative
//! indices; parameters sit below the register file and have negative
//! indices. Operands do not store the index directly: the bytecode producer
//! biases it so that register operands stay distinguishable from other
//! integers, and [`RegisterAddressing`] owns that bias.

/// Operand value that encodes register `r0`.
///
/// Locals count down from it and parameters count up, so with the default
/// bias an operand of `-6` is `r1` and `-4` is the last parameter.
pub const REGISTER_FILE_START_OFFSET: i32 = -5;

/// An interpreter register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Register {
    index: i32,
}

impl Register {
    /// Creates a register from its frame index.
    pub const fn new(index: i32) -> Self {
        Self { index }
    }

    /// Returns the frame index.
    pub const fn index(&self) -> i32 {
        self.index
    }

    /// Returns the register `n` slots after this one.
    ///
    /// Indices wrap, matching [`FrameRegisters::from_operand`] on
    /// out-of-range operands.
    pub const fn offset(&self, n: i32) -> Self {
        Self::new(self.index.wrapping_add(n))
    }

    /// Returns true if this register holds a parameter.
    pub const fn is_parameter(&self) -> bool {
        self.index < 0
    }

    /// Creates the register for parameter slot `slot`, where slot 0 is the
    /// receiver.
    pub const fn from_parameter_slot(slot: i32, parameter_count: i32) -> Self {
        Self::new(slot.wrapping_sub(parameter_count))
    }

    /// Returns the parameter slot of this register, counting the receiver
    /// as slot 0.
    pub const fn parameter_slot(&self, parameter_count: i32) -> i32 {
        self.index.wrapping_add(parameter_count)
    }
}

/// Maps operand integers to registers and registers to text.
pub trait RegisterAddressing {
    /// Inverts the producer's operand encoding.
    fn from_operand(&self, operand: i32) -> Register;

    /// Encodes a register the way the producer does.
    fn to_operand(&self, register: Register) -> i32;

    /// Renders a register relative to the frame's parameter count.
    fn name(&self, register: Register, parameter_count: i32) -> String;
}

impl<T: RegisterAddressing + ?Sized> RegisterAddressing for &T {
    fn from_operand(&self, operand: i32) -> Register {
        (**self).from_operand(operand)
    }

    fn to_operand(&self, register: Register) -> i32 {
        (**self).to_operand(register)
    }

    fn name(&self, register: Register, parameter_count: i32) -> String {
        (**self).name(register, parameter_count)
    }
}

/// Register file addressed relative to the frame pointer.
///
/// Operands count downwards from the start of the register file, so
/// `operand = start_offset - index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameRegisters {
    /// Operand value that encodes `r0`.
    pub start_offset: i32,
}

impl FrameRegisters {
    /// Creates an addressing scheme with a custom register file offset.
    pub const fn new(start_offset: i32) -> Self {
        Self { start_offset }
    }
}

impl Default for FrameRegisters {
    fn default() -> Self {
        Self::new(REGISTER_FILE_START_OFFSET)
    }
}

impl RegisterAddressing for FrameRegisters {
    fn from_operand(&self, operand: i32) -> Register {
        Register::new(self.start_offset.wrapping_sub(operand))
    }

    fn to_operand(&self, register: Register) -> i32 {
        self.start_offset.wrapping_sub(register.index())
    }

    fn name(&self, register: Register, parameter_count: i32) -> String {
        if !register.is_parameter() {
            return format!("r{}", register.index());
        }
        match register.parameter_slot(parameter_count) {
            0 => "<this>".to_string(),
            slot if slot > 0 => format!("a{}", slot - 1),
            // Below the declared parameters: show the raw frame index.
            _ => format!("r{}", register.index()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_encoding_inverts() {
        let regs = FrameRegisters::default();
        for operand in [-128, -6, -5, -1, 0, 1, 127, i16::MAX as i32, i32::MIN] {
            let reg = regs.from_operand(operand);
            assert_eq!(regs.to_operand(reg), operand);
        }
    }

    #[test]
    fn test_default_bias() {
        let regs = FrameRegisters::default();
        // r0 encodes as the register file offset itself.
        assert_eq!(regs.to_operand(Register::new(0)), -5);
        assert_eq!(regs.from_operand(-5), Register::new(0));
        assert_eq!(regs.from_operand(-6), Register::new(1));
        assert_eq!(regs.from_operand(-4), Register::new(-1));
    }

    #[test]
    fn test_local_names() {
        let regs = FrameRegisters::default();
        assert_eq!(regs.name(Register::new(0), 3), "r0");
        assert_eq!(regs.name(Register::new(12), 0), "r12");
    }

    #[test]
    fn test_parameter_names() {
        let regs = FrameRegisters::default();
        assert_eq!(regs.name(Register::from_parameter_slot(0, 3), 3), "<this>");
        assert_eq!(regs.name(Register::from_parameter_slot(1, 3), 3), "a0");
        assert_eq!(regs.name(Register::from_parameter_slot(2, 3), 3), "a1");
        assert_eq!(regs.name(Register::new(-1), 3), "a1");
    }

    #[test]
    fn test_out_of_frame_parameter() {
        let regs = FrameRegisters::default();
        assert_eq!(regs.name(Register::new(-7), 2), "r-7");
    }

    #[test]
    fn test_offset() {
        let reg = Register::new(4);
        assert_eq!(reg.offset(2).index(), 6);
        assert_eq!(Register::new(-2).offset(1), Register::new(-1));
    }

    #[test]
    fn test_offset_wraps_at_index_limit() {
        assert_eq!(Register::new(i32::MAX).offset(2), Register::new(i32::MIN + 1));
    }

    #[test]
    fn test_extreme_indices_name_without_overflow() {
        let regs = FrameRegisters::default();
        assert_eq!(regs.name(Register::new(i32::MIN), 0), "r-2147483648");
        assert_eq!(regs.name(Register::new(i32::MIN + 1), 3), "r-2147483647");
    }
}
