use super::regs::{REG_A, REG_F};
use super::{Bus, Cpu, Flag, Operand};

const fn flag_bit(flag: Flag) -> u8 {
    1 << flag as u8
}

/// Unconditional flag bits applied by an opcode family: `set` bits are
/// forced on, `clear` bits forced off, everything else is left alone.
#[derive(Clone, Copy, Debug)]
pub(super) struct FlagPolicy {
    set: u8,
    clear: u8,
}

impl FlagPolicy {
    /// ADD/ADC/INC: N cleared ahead of carry detection.
    pub(super) const ADDITIVE: FlagPolicy = FlagPolicy {
        set: 0,
        clear: flag_bit(Flag::N),
    };
    /// SUB/SBC/DEC: N set ahead of carry detection.
    pub(super) const SUBTRACTIVE: FlagPolicy = FlagPolicy {
        set: flag_bit(Flag::N),
        clear: 0,
    };
    /// AND: H set, N and C cleared.
    pub(super) const LOGIC_AND: FlagPolicy = FlagPolicy {
        set: flag_bit(Flag::H),
        clear: flag_bit(Flag::N) | flag_bit(Flag::C),
    };
    /// OR/XOR/SWAP: N, H, C all cleared.
    pub(super) const LOGIC: FlagPolicy = FlagPolicy {
        set: 0,
        clear: flag_bit(Flag::N) | flag_bit(Flag::H) | flag_bit(Flag::C),
    };
}

/// The binary ALU family. The accumulator is always the implicit left
/// operand and the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum BinaryOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    fn apply(self, lhs: u8, rhs: u8, carry_in: bool) -> u8 {
        let carry = carry_in as u8;
        match self {
            BinaryOp::Add => lhs.wrapping_add(rhs),
            BinaryOp::Adc => lhs.wrapping_add(rhs).wrapping_add(carry),
            BinaryOp::Sub => lhs.wrapping_sub(rhs),
            BinaryOp::Sbc => lhs.wrapping_sub(rhs).wrapping_sub(carry),
            BinaryOp::And => lhs & rhs,
            BinaryOp::Or => lhs | rhs,
            BinaryOp::Xor => lhs ^ rhs,
        }
    }

    fn policy(self) -> FlagPolicy {
        match self {
            BinaryOp::Add | BinaryOp::Adc => FlagPolicy::ADDITIVE,
            BinaryOp::Sub | BinaryOp::Sbc => FlagPolicy::SUBTRACTIVE,
            BinaryOp::And => FlagPolicy::LOGIC_AND,
            BinaryOp::Or | BinaryOp::Xor => FlagPolicy::LOGIC,
        }
    }

    /// Whether the generic half-carry/carry detector runs for this op.
    /// The bitwise family fixes H and C through its policy instead.
    fn detects_carry(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Adc | BinaryOp::Sub | BinaryOp::Sbc
        )
    }
}

/// Right-hand side of a binary ALU instruction.
#[derive(Clone, Copy, Debug)]
pub(super) enum AluSrc {
    Operand(Operand),
    /// The next literal byte at PC.
    Immediate,
}

/// The unary ALU family: operates in place on a register or memory byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum UnaryOp {
    Inc,
    Dec,
    Swap,
}

impl UnaryOp {
    fn apply(self, value: u8) -> u8 {
        match self {
            UnaryOp::Inc => value.wrapping_add(1),
            UnaryOp::Dec => value.wrapping_sub(1),
            UnaryOp::Swap => value.rotate_left(4),
        }
    }

    fn policy(self) -> FlagPolicy {
        match self {
            UnaryOp::Inc => FlagPolicy::ADDITIVE,
            UnaryOp::Dec => FlagPolicy::SUBTRACTIVE,
            UnaryOp::Swap => FlagPolicy::LOGIC,
        }
    }
}

impl Cpu {
    #[inline]
    pub(super) fn apply_policy(&mut self, policy: FlagPolicy) {
        let f = self.regs.read(REG_F);
        self.regs.write(REG_F, (f | policy.set) & !policy.clear);
    }

    /// Execute one binary ALU instruction against the accumulator.
    ///
    /// Pipeline: resolve the right-hand side, latch the carry flag, apply
    /// the operation, write A, set Z from the result, apply the family's
    /// unconditional flag policy, then run carry detection for the
    /// arithmetic ops.
    pub(super) fn exec_binary<B: Bus>(&mut self, bus: &mut B, op: BinaryOp, src: AluSrc) {
        let rhs = match src {
            AluSrc::Operand(operand) => self.read_operand(bus, operand),
            AluSrc::Immediate => self.fetch8(bus),
        };
        let lhs = self.regs.read(REG_A);
        // ADC/SBC consume the carry left by the previous instruction, so it
        // must be latched before any flag update below.
        let carry_in = self.get_flag(Flag::C);

        let result = op.apply(lhs, rhs, carry_in);
        self.regs.write(REG_A, result);

        self.set_flag(Flag::Z, result == 0);
        self.apply_policy(op.policy());
        if op.detects_carry() {
            // The policy has already resolved N; hand the direction to the
            // detector explicitly instead of letting it peek at F.
            let subtract = self.get_flag(Flag::N);
            self.set_carry_flags(lhs, rhs, subtract);
        }
    }

    /// Execute one unary ALU instruction in place on `operand`.
    ///
    /// With no second operand the generic carry detector does not apply:
    /// INC/DEC report half-carry from the low-nibble wrap instead and
    /// leave C untouched.
    pub(super) fn exec_unary<B: Bus>(&mut self, bus: &mut B, op: UnaryOp, operand: Operand) {
        let value = self.read_operand(bus, operand);
        let result = op.apply(value);
        self.write_operand(bus, operand, result);

        self.set_flag(Flag::Z, result == 0);
        self.apply_policy(op.policy());
        match op {
            UnaryOp::Inc => self.set_flag(Flag::H, value & 0x0F == 0x0F),
            UnaryOp::Dec => self.set_flag(Flag::H, value & 0x0F == 0x00),
            UnaryOp::Swap => {}
        }
    }

    /// Generic half-carry/carry detection shared by the add and subtract
    /// families.
    ///
    /// `subtract` must be the N flag as resolved by the opcode's flag
    /// policy, which is why callers apply the policy first. XORing the
    /// operands against the widened result exposes the carry/borrow out of
    /// bit 3 (bit 4 of `carry_bits`) and out of bit 7 (bit 8). Both flags
    /// are assigned, never accumulated.
    fn set_carry_flags(&mut self, lhs: u8, rhs: u8, subtract: bool) {
        let (lhs, rhs) = (i32::from(lhs), i32::from(rhs));
        let wide = if subtract { lhs - rhs } else { lhs + rhs };
        let carry_bits = lhs ^ rhs ^ wide;
        self.set_flag(Flag::H, carry_bits & 0x10 != 0);
        self.set_flag(Flag::C, carry_bits & 0x100 != 0);
    }
}
