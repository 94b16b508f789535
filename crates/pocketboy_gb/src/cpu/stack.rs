use super::{Bus, Cpu};

impl Cpu {
    /// Write a 16-bit value onto the stack: high byte at the current free
    /// slot, low byte one below, SP left two lower.
    pub(super) fn push16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
    }

    /// Exact inverse of `push16`: step up to the low byte, then the high
    /// byte, leaving SP back where the matching push started.
    pub(super) fn pop16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let lo = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read8(self.regs.sp);
        u16::from_be_bytes([hi, lo])
    }

    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, hi: usize, lo: usize) {
        let value = self.regs.pair(hi, lo);
        self.push16(bus, value);
    }

    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &mut B, hi: usize, lo: usize) {
        let value = self.pop16(bus);
        self.regs.set_pair(hi, lo, value);
    }

    /// RST: push the full 16-bit return PC — both bytes, through the normal
    /// push mechanics — then jump to the fixed vector.
    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, vector: u16) {
        let ret = self.regs.pc;
        self.push16(bus, ret);
        self.regs.pc = vector;
    }
}
