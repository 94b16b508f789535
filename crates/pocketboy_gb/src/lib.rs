pub mod cpu;
pub mod emulator;
pub mod memory;

pub use cpu::{Bus, Cpu, ExecError, Opcode};
pub use emulator::Emulator;
pub use memory::{Memory, MEMORY_SIZE};

/// Address of the first opcode fetched after reset (cartridge entry point).
pub const ENTRY_POINT: u16 = 0x0100;
/// Initial stack pointer: the next free slot below the top of the
/// downward-growing stack.
pub const INITIAL_SP: u16 = 0xFFFE;
