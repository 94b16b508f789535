mod alu;
mod bits;
mod dispatch;
mod regs;
mod stack;


use std::error::Error;
use std::fmt;

pub use regs::{
    Operand, RegisterMask, Registers, NUM_REGISTERS, REG_A, REG_B, REG_C, REG_D, REG_E, REG_F,
    REG_H, REG_L,
};

use crate::{ENTRY_POINT, INITIAL_SP};

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
#[derive(Clone, Copy, Debug)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

/// Abstraction over the memory bus.
///
/// The core only ever observes or mutates the world outside its registers
/// through this trait, which makes it the seam where memory-mapped
/// peripherals would attach later.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

/// One opcode byte as fetched, tagged with the dispatch page it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Primary(u8),
    /// Reached through the 0xCB prefix.
    Extended(u8),
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Primary(op) => write!(f, "{op:#04X}"),
            Opcode::Extended(op) => write!(f, "0xCB {op:#04X}"),
        }
    }
}

/// Fatal conditions raised by the instruction loop.
///
/// Both variants are unrecoverable: the run loop stops at the first one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecError {
    /// An architecturally undefined byte was fetched as an opcode.
    InvalidOpcode { opcode: Opcode, pc: u16 },
    /// An architecturally valid opcode that this core does not wire to an
    /// action. Fatal so that gaps surface immediately instead of silently
    /// corrupting later state.
    Unimplemented { opcode: Opcode, pc: u16 },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::InvalidOpcode { opcode, pc } => {
                write!(f, "invalid opcode {opcode} fetched at {pc:#06X}")
            }
            ExecError::Unimplemented { opcode, pc } => {
                write!(f, "unimplemented opcode {opcode} fetched at {pc:#06X}")
            }
        }
    }
}

impl Error for ExecError {}

/// The instruction-execution core: fetches from a `Bus`, decodes against
/// the two 256-entry dispatch tables, and mutates the register file.
#[derive(Debug)]
pub struct Cpu {
    pub regs: Registers,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
        };
        cpu.reset();
        cpu
    }

    /// Reset to the post-boot entry state: PC at the cartridge entry point,
    /// SP at the top of the downward-growing stack, all registers zero.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.regs.pc = ENTRY_POINT;
        self.regs.sp = INITIAL_SP;
    }

    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        self.regs.read(REG_F) & (1 << flag as u8) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = 1 << flag as u8;
        let f = self.regs.read(REG_F);
        self.regs.write(REG_F, if value { f | bit } else { f & !bit });
    }

    /// Read the byte at PC and advance PC by one.
    ///
    /// Used for the primary opcode, the extended-page selector, and any
    /// immediate operand bytes an instruction consumes.
    #[inline]
    fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Resolve an operand to a byte: single registers are read directly,
    /// pairs indirect through the byte at their composed address.
    ///
    /// This resolution is shared by the move, ALU, and bit engines.
    #[inline]
    pub(crate) fn read_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand) -> u8 {
        match operand {
            Operand::Reg(index) => self.regs.read(index),
            Operand::Pair { hi, lo } => bus.read8(self.regs.pair(hi, lo)),
        }
    }

    /// Counterpart of `read_operand` for write-back.
    #[inline]
    pub(crate) fn write_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand, value: u8) {
        match operand {
            Operand::Reg(index) => self.regs.write(index, value),
            Operand::Pair { hi, lo } => bus.write8(self.regs.pair(hi, lo), value),
        }
    }

    /// Fetch, decode, and execute exactly one instruction.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<(), ExecError> {
        let pc = self.regs.pc;
        let primary = self.fetch8(bus);

        let (opcode, instr) = if matches!(
            dispatch::PRIMARY[primary as usize],
            dispatch::Instr::Prefix
        ) {
            let ext = self.fetch8(bus);
            (Opcode::Extended(ext), dispatch::EXTENDED[ext as usize])
        } else {
            (Opcode::Primary(primary), dispatch::PRIMARY[primary as usize])
        };

        match instr {
            dispatch::Instr::Invalid => Err(ExecError::InvalidOpcode { opcode, pc }),
            dispatch::Instr::Unimplemented => Err(ExecError::Unimplemented { opcode, pc }),
            _ => {
                self.exec_instr(bus, instr);
                Ok(())
            }
        }
    }

    /// Run the fetch-decode-execute loop until the first fatal condition.
    ///
    /// No halt instruction is modelled, so the loop only ends by returning
    /// the error that stopped it.
    pub fn run<B: Bus>(&mut self, bus: &mut B) -> ExecError {
        loop {
            if let Err(err) = self.step(bus) {
                return err;
            }
        }
    }
}
