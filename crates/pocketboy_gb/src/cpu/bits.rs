use super::{Bus, Cpu, Flag, Operand};

impl Cpu {
    /// BIT b: Z is set iff the tested bit is clear — inverted relative to
    /// the ALU's zero rule. N cleared, H set, C left untouched.
    pub(super) fn exec_bit_test<B: Bus>(&mut self, bus: &mut B, operand: Operand, bit: u8) {
        assert_eq!(bit.count_ones(), 1, "bit mask {bit:#010b} must name one bit");
        let value = self.read_operand(bus, operand);
        self.set_flag(Flag::Z, value & bit == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, true);
    }

    /// SET b: mutates the operand, touches no flags.
    pub(super) fn exec_bit_set<B: Bus>(&mut self, bus: &mut B, operand: Operand, bit: u8) {
        assert_eq!(bit.count_ones(), 1, "bit mask {bit:#010b} must name one bit");
        let value = self.read_operand(bus, operand);
        self.write_operand(bus, operand, value | bit);
    }

    /// RES b: mutates the operand, touches no flags.
    pub(super) fn exec_bit_reset<B: Bus>(&mut self, bus: &mut B, operand: Operand, bit: u8) {
        assert_eq!(bit.count_ones(), 1, "bit mask {bit:#010b} must name one bit");
        let value = self.read_operand(bus, operand);
        self.write_operand(bus, operand, value & !bit);
    }
}
