use lazy_static::lazy_static;

use super::alu::{AluSrc, BinaryOp, UnaryOp};
use super::regs::{Operand, RegisterMask, REG_F};
use super::{Bus, Cpu};

/// One decoded dispatch-table entry.
///
/// Entries are plain `Copy` data so the tables stay flat and execution
/// stays branch-predictable; no boxed closures per slot.
#[derive(Clone, Copy, Debug)]
pub(super) enum Instr {
    Nop,
    /// LD r, d8. The destination is a single, non-flag register; this is
    /// validated while the table is built.
    LoadImm(usize),
    /// Register/memory move. At most one side is a pair.
    Move { dst: Operand, src: Operand },
    Binary { op: BinaryOp, src: AluSrc },
    Unary { op: UnaryOp, operand: Operand },
    BitTest { operand: Operand, bit: u8 },
    BitReset { operand: Operand, bit: u8 },
    BitSet { operand: Operand, bit: u8 },
    Push { hi: usize, lo: usize },
    Pop { hi: usize, lo: usize },
    Rst(u16),
    IncSp,
    DecSp,
    /// 0xCB: dispatch the next byte through the extended table.
    Prefix,
    /// Architecturally valid but not wired to an action in this core.
    Unimplemented,
    /// Architecturally undefined byte.
    Invalid,
}

/// Operand slot order shared by the move grid, the ALU block, and every
/// extended-page family: B, C, D, E, H, L, (HL), A.
const OPERAND_SLOTS: [RegisterMask; 8] = [
    RegisterMask::B,
    RegisterMask::C,
    RegisterMask::D,
    RegisterMask::E,
    RegisterMask::H,
    RegisterMask::L,
    RegisterMask::HL,
    RegisterMask::A,
];

/// Slot index of the memory-indirect (HL) operand.
const SLOT_HL: usize = 6;

lazy_static! {
    pub(super) static ref PRIMARY: [Instr; 256] = build_primary();
    pub(super) static ref EXTENDED: [Instr; 256] = build_extended();
}

/// Validate an immediate-load destination: pairs and the flag register are
/// never legal targets, and a violation is a table bug worth a panic at
/// construction time rather than at execution time.
fn imm_load_target(mask: RegisterMask) -> usize {
    let index = Operand::from_mask(mask).expect_reg();
    assert_ne!(index, REG_F, "the flag register is not a load target");
    index
}

fn build_primary() -> [Instr; 256] {
    let mut table = [Instr::Unimplemented; 256];

    table[0x00] = Instr::Nop;

    // A moves through the BC and DE pointers.
    let a = Operand::from_mask(RegisterMask::A);
    for (base, pair) in [(0x00usize, RegisterMask::BC), (0x10, RegisterMask::DE)] {
        let pair = Operand::from_mask(pair);
        table[base + 0x02] = Instr::Move { dst: pair, src: a };
        table[base + 0x0A] = Instr::Move { dst: a, src: pair };
    }

    // INC, DEC, and LD d8 rows, one row of eight opcodes per operand slot.
    // The (HL) slot has no immediate-load form.
    for (slot, mask) in OPERAND_SLOTS.iter().enumerate() {
        let operand = Operand::from_mask(*mask);
        let row = slot * 8;
        table[0x04 + row] = Instr::Unary {
            op: UnaryOp::Inc,
            operand,
        };
        table[0x05 + row] = Instr::Unary {
            op: UnaryOp::Dec,
            operand,
        };
        if slot != SLOT_HL {
            table[0x06 + row] = Instr::LoadImm(imm_load_target(*mask));
        }
    }

    table[0x33] = Instr::IncSp;
    table[0x3B] = Instr::DecSp;

    // The 0x40-0x7F move grid: destination slot in bits 3-5, source slot in
    // bits 0-2. 0x76 is the architectural HALT slot; halting is not
    // modelled, so it stays unimplemented.
    for (d, dst_mask) in OPERAND_SLOTS.iter().enumerate() {
        for (s, src_mask) in OPERAND_SLOTS.iter().enumerate() {
            if d == SLOT_HL && s == SLOT_HL {
                continue;
            }
            table[0x40 + d * 8 + s] = Instr::Move {
                dst: Operand::from_mask(*dst_mask),
                src: Operand::from_mask(*src_mask),
            };
        }
    }

    // Binary ALU block: one family per row of eight operand slots, plus the
    // "against the next literal byte" form 0x46 above each row base
    // (0x80 ADD -> 0xC6 ADD d8, and so on down the families).
    let families = [
        (0x80usize, BinaryOp::Add),
        (0x88, BinaryOp::Adc),
        (0x90, BinaryOp::Sub),
        (0x98, BinaryOp::Sbc),
        (0xA0, BinaryOp::And),
        (0xA8, BinaryOp::Xor),
        (0xB0, BinaryOp::Or),
    ];
    for (base, op) in families {
        for (slot, mask) in OPERAND_SLOTS.iter().enumerate() {
            table[base + slot] = Instr::Binary {
                op,
                src: AluSrc::Operand(Operand::from_mask(*mask)),
            };
        }
        table[base + 0x46] = Instr::Binary {
            op,
            src: AluSrc::Immediate,
        };
    }

    // Stack rows: POP at 0xC1 + 0x10 per pair, PUSH four above it.
    let pairs = [
        RegisterMask::BC,
        RegisterMask::DE,
        RegisterMask::HL,
        RegisterMask::AF,
    ];
    for (row, pair) in pairs.iter().enumerate() {
        let (hi, lo) = Operand::from_mask(*pair).expect_pair();
        table[0xC1 + row * 0x10] = Instr::Pop { hi, lo };
        table[0xC5 + row * 0x10] = Instr::Push { hi, lo };
    }

    // RST: the vector is encoded in bits 3-5 of the opcode.
    for vector in (0x00u16..0x40).step_by(8) {
        table[0xC7 + vector as usize] = Instr::Rst(vector);
    }

    table[0xCB] = Instr::Prefix;

    // Holes in the primary opcode space: fetching one of these is fatal.
    for invalid in [
        0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
    ] {
        table[invalid] = Instr::Invalid;
    }

    table
}

fn build_extended() -> [Instr; 256] {
    // Four generic families over the eight operand slots. The rotate/shift
    // block (0x00-0x2F, 0x38-0x3F) is architecturally valid but unwired
    // here, so those entries keep the fatal `Unimplemented` default. Every
    // extended byte is defined, so none are `Invalid`.
    let mut table = [Instr::Unimplemented; 256];

    for (slot, mask) in OPERAND_SLOTS.iter().enumerate() {
        let operand = Operand::from_mask(*mask);
        table[0x30 + slot] = Instr::Unary {
            op: UnaryOp::Swap,
            operand,
        };
        for bit in 0..8usize {
            let entry = bit * 8 + slot;
            let bit = 1u8 << bit;
            table[0x40 + entry] = Instr::BitTest { operand, bit };
            table[0x80 + entry] = Instr::BitReset { operand, bit };
            table[0xC0 + entry] = Instr::BitSet { operand, bit };
        }
    }

    table
}

impl Cpu {
    /// Execute one decoded table entry.
    ///
    /// `Prefix`, `Invalid`, and `Unimplemented` never reach this point;
    /// `step` resolves the prefix and turns the other two into errors.
    pub(super) fn exec_instr<B: Bus>(&mut self, bus: &mut B, instr: Instr) {
        match instr {
            Instr::Nop => {}
            Instr::LoadImm(index) => {
                let value = self.fetch8(bus);
                self.regs.write(index, value);
            }
            Instr::Move { dst, src } => {
                // Pair-to-pair is undefined and never constructed.
                debug_assert!(
                    !(matches!(dst, Operand::Pair { .. })
                        && matches!(src, Operand::Pair { .. })),
                    "pair-to-pair move in the dispatch table"
                );
                let value = self.read_operand(bus, src);
                self.write_operand(bus, dst, value);
            }
            Instr::Binary { op, src } => self.exec_binary(bus, op, src),
            Instr::Unary { op, operand } => self.exec_unary(bus, op, operand),
            Instr::BitTest { operand, bit } => self.exec_bit_test(bus, operand, bit),
            Instr::BitReset { operand, bit } => self.exec_bit_reset(bus, operand, bit),
            Instr::BitSet { operand, bit } => self.exec_bit_set(bus, operand, bit),
            Instr::Push { hi, lo } => self.exec_push(bus, hi, lo),
            Instr::Pop { hi, lo } => self.exec_pop(bus, hi, lo),
            Instr::Rst(vector) => self.exec_rst(bus, vector),
            Instr::IncSp => self.regs.sp = self.regs.sp.wrapping_add(1),
            Instr::DecSp => self.regs.sp = self.regs.sp.wrapping_sub(1),
            Instr::Prefix | Instr::Invalid | Instr::Unimplemented => {
                unreachable!("handled by step before execution")
            }
        }
    }
}
