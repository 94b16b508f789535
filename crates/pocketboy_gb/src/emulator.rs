use crate::cpu::{Cpu, ExecError};
use crate::memory::Memory;

/// High-level machine: the CPU core plus the flat memory bus.
///
/// Hosts are expected to reset once, optionally load an image, then call
/// `run` — or `step` repeatedly when debugging.
pub struct Emulator {
    pub cpu: Cpu,
    pub bus: Memory,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: Memory::new(),
        }
    }

    /// Reinitialize PC, SP, and the register file. The memory image is left
    /// in place so a loaded program survives a reset.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Copy a program image into memory before the first fetch.
    pub fn load_image(&mut self, image: &[u8]) {
        self.bus.load_image(image);
    }

    /// Execute exactly one instruction.
    pub fn step(&mut self) -> Result<(), ExecError> {
        self.cpu.step(&mut self.bus)
    }

    /// Run until the first fatal condition and return it.
    pub fn run(&mut self) -> ExecError {
        let err = self.cpu.run(&mut self.bus);
        log::error!("execution stopped: {err}");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{ExecError, Opcode};
    use crate::ENTRY_POINT;

    #[test]
    fn run_stops_at_first_fatal_condition() {
        let mut emu = Emulator::new();
        // Two NOPs, then an architecturally undefined byte.
        let mut image = vec![0u8; ENTRY_POINT as usize];
        image.extend_from_slice(&[0x00, 0x00, 0xD3]);
        emu.load_image(&image);

        let err = emu.run();
        assert_eq!(
            err,
            ExecError::InvalidOpcode {
                opcode: Opcode::Primary(0xD3),
                pc: ENTRY_POINT + 2,
            }
        );
    }

    #[test]
    fn reset_preserves_the_loaded_image() {
        let mut emu = Emulator::new();
        let mut image = vec![0u8; ENTRY_POINT as usize];
        image.extend_from_slice(&[0x3E, 0x42]); // LD A, 0x42
        emu.load_image(&image);

        emu.step().unwrap();
        emu.reset();

        assert_eq!(emu.cpu.regs.pc, ENTRY_POINT);
        // The program is still there: stepping again reloads A.
        emu.step().unwrap();
        assert_eq!(emu.cpu.regs.read(crate::cpu::REG_A), 0x42);
    }
}
