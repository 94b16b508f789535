use bitflags::bitflags;

/// Number of architectural byte registers.
pub const NUM_REGISTERS: usize = 8;

/// Storage indices into the register array. Index 0 is the accumulator and
/// index 1 the flag register; identities are fixed for the CPU's lifetime.
pub const REG_A: usize = 0;
pub const REG_F: usize = 1;
pub const REG_B: usize = 2;
pub const REG_C: usize = 3;
pub const REG_D: usize = 4;
pub const REG_E: usize = 5;
pub const REG_H: usize = 6;
pub const REG_L: usize = 7;

bitflags! {
    /// Bit-mask names for registers and register pairs.
    ///
    /// Each single register owns the bit at its storage index, so a pair is
    /// the OR of its two members, and the member at the lower bit position
    /// contributes the high byte: in BC, B is high and C is low.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct RegisterMask: u8 {
        const A = 1 << REG_A;
        const F = 1 << REG_F;
        const B = 1 << REG_B;
        const C = 1 << REG_C;
        const D = 1 << REG_D;
        const E = 1 << REG_E;
        const H = 1 << REG_H;
        const L = 1 << REG_L;

        const AF = Self::A.bits() | Self::F.bits();
        const BC = Self::B.bits() | Self::C.bits();
        const DE = Self::D.bits() | Self::E.bits();
        const HL = Self::H.bits() | Self::L.bits();
    }
}

/// A resolved operand specifier.
///
/// Produced from a `RegisterMask` once, while the dispatch tables are
/// built, so execution never re-counts mask bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// A single byte register, by storage index.
    Reg(usize),
    /// A register pair addressing memory; `hi` is the index of the register
    /// holding the high byte of the composed address.
    Pair { hi: usize, lo: usize },
}

impl Operand {
    /// Classify a mask by population count.
    ///
    /// Panics on any mask that names neither a single register nor a pair.
    /// Such a mask can only come from a dispatch-table bug, never from an
    /// architecturally valid instruction stream.
    pub fn from_mask(mask: RegisterMask) -> Operand {
        let bits = mask.bits();
        match bits.count_ones() {
            1 => Operand::Reg(bits.trailing_zeros() as usize),
            2 => Operand::Pair {
                hi: bits.trailing_zeros() as usize,
                lo: (7 - bits.leading_zeros()) as usize,
            },
            n => panic!("operand mask {bits:#010b} names {n} registers, expected 1 or 2"),
        }
    }

    /// The storage index behind a single-register operand.
    ///
    /// Panics when handed a pair; used where the instruction set only
    /// admits single registers, such as immediate-load destinations.
    pub(crate) fn expect_reg(self) -> usize {
        match self {
            Operand::Reg(index) => index,
            Operand::Pair { .. } => panic!("expected a single register, got a pair"),
        }
    }

    /// The (high, low) storage indices behind a pair operand.
    ///
    /// Panics when handed a single register; push/pop require pairs.
    pub(crate) fn expect_pair(self) -> (usize, usize) {
        match self {
            Operand::Pair { hi, lo } => (hi, lo),
            Operand::Reg(index) => panic!("expected a register pair, got register {index}"),
        }
    }
}

/// The architectural register file: eight byte registers plus SP and PC.
///
/// PC always points at the next byte to fetch; SP at the next free stack
/// slot below the top of stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct Registers {
    regs: [u8; NUM_REGISTERS],
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn read(&self, index: usize) -> u8 {
        self.regs[index]
    }

    #[inline]
    pub fn write(&mut self, index: usize, value: u8) {
        self.regs[index] = value;
    }

    /// Compose the 16-bit value of a pair; `hi` contributes the high byte.
    ///
    /// Serves both memory addressing through a pair and 16-bit pair loads.
    #[inline]
    pub fn pair(&self, hi: usize, lo: usize) -> u16 {
        u16::from_be_bytes([self.regs[hi], self.regs[lo]])
    }

    #[inline]
    pub fn set_pair(&mut self, hi: usize, lo: usize, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.regs[hi] = high;
        self.regs[lo] = low;
    }
}
