mod alu;
mod exec;
mod helpers;
mod regs;
mod step;
mod table;

pub use regs::{Flags, Reg16, Reg8, Registers};
pub use step::Executed;
pub use table::{Control, Flow, Instruction, OpcodeTable, Operation};
pub(crate) use table::{IMM16_TOKEN, IMM8_TOKEN};

/// Game Boy CPU core (LR35902).
///
/// Holds the register file and the interrupt master enable latch. Memory is
/// owned by the caller and handed to each `step`, so the same core can run
/// against any `AddressSpace`.
#[derive(Clone, Debug, Default)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable. DI/EI/RETI drive it; nothing services
    /// interrupts yet, so it is plain observable state.
    pub ime: bool,
}

impl Cpu {
    /// Create a CPU with every register cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the registers into the state the DMG boot ROM leaves behind when
    /// it hands control to the cartridge at 0x0100.
    pub fn reset(&mut self) {
        self.regs.set_af(0x01B0);
        self.regs.set_bc(0x0013);
        self.regs.set_de(0x00D8);
        self.regs.set_hl(0x014D);
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;
        self.ime = false;
    }
}

#[cfg(test)]
mod tests;
