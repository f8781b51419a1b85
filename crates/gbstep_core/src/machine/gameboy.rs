use std::collections::BTreeSet;

use super::init;
use crate::cpu::{Cpu, Executed, OpcodeTable};
use crate::disasm::Disassembler;
use crate::error::Result;
use crate::memory::AddressSpace;

/// Cartridge header title field.
const TITLE_START: u16 = 0x0134;
const TITLE_LEN: usize = 16;

/// Result of a single `GameBoy::step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Executed(Executed),
    /// PC reached a breakpoint. Nothing was executed; the next `step`
    /// runs the instruction at `pc`.
    Breakpoint { pc: u16 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Breakpoint { pc: u16 },
    InstructionLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    /// Instructions executed by this `run` call.
    pub executed: u64,
    pub stop: StopReason,
}

/// High-level Game Boy machine.
///
/// Holds the CPU core, the address space and the cycle counter. Hosts drive
/// it one instruction at a time (`step`) or in bounded bursts (`run`), and
/// may read or poke `cpu.regs` and `memory` freely between steps.
pub struct GameBoy {
    pub cpu: Cpu,
    pub memory: AddressSpace,
    table: &'static OpcodeTable,
    cycles: u64,
    instructions: u64,
    breakpoints: BTreeSet<u16>,
    /// Breakpoint reported by the previous `step`, so that stepping again
    /// executes through it instead of reporting it forever.
    resume_at: Option<u16>,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self::with_table(OpcodeTable::global())
    }

    pub fn with_table(table: &'static OpcodeTable) -> Self {
        Self {
            cpu: Cpu::new(),
            memory: AddressSpace::new(),
            table,
            cycles: 0,
            instructions: 0,
            breakpoints: BTreeSet::new(),
            resume_at: None,
        }
    }

    /// Load a ROM image into the cartridge ROM area.
    ///
    /// An image larger than the ROM window is rejected and memory keeps its
    /// previous contents.
    pub fn load_cartridge(&mut self, rom: &[u8]) -> Result<()> {
        if let Err(err) = self.memory.load_cartridge(rom) {
            log::warn!("GB cartridge rejected: {err}");
            return Err(err);
        }
        log::info!(
            "GB cartridge loaded: {} bytes, title {:?}",
            rom.len(),
            self.cartridge_title()
        );
        Ok(())
    }

    /// Power on: registers and IO registers take the values the boot ROM
    /// leaves behind, and the cycle counter restarts from zero. Cartridge
    /// and RAM contents are kept.
    pub fn start(&mut self) {
        self.cpu.reset();
        init::apply_dmg_initial_io_state(&mut self.memory);
        self.cycles = 0;
        self.instructions = 0;
        self.resume_at = None;
        log::info!("GB power-on: {}", self.cpu.regs);
    }

    /// Execute one instruction, or stop in front of a breakpoint.
    pub fn step(&mut self) -> Result<Step> {
        let pc = self.cpu.regs.pc;
        if self.breakpoints.contains(&pc) && self.resume_at != Some(pc) {
            self.resume_at = Some(pc);
            log::debug!("GB breakpoint at PC=0x{pc:04X}: {}", self.cpu.regs);
            return Ok(Step::Breakpoint { pc });
        }

        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "{pc:04X}  {:<20} {}",
                self.disassemble_instruction(pc),
                self.cpu.regs
            );
        }

        let executed = self.cpu.step(&mut self.memory, self.table)?;
        self.resume_at = None;
        self.cycles += executed.cycles as u64;
        self.instructions += 1;
        Ok(Step::Executed(executed))
    }

    /// Step until a breakpoint or until `max_instructions` have executed.
    ///
    /// An unimplemented opcode ends the run with an error; `instructions()`
    /// still reports how far the machine got.
    pub fn run(&mut self, max_instructions: u64) -> Result<RunOutcome> {
        let mut executed = 0;
        while executed < max_instructions {
            match self.step()? {
                Step::Executed(_) => executed += 1,
                Step::Breakpoint { pc } => {
                    return Ok(RunOutcome {
                        executed,
                        stop: StopReason::Breakpoint { pc },
                    });
                }
            }
        }
        Ok(RunOutcome {
            executed,
            stop: StopReason::InstructionLimit,
        })
    }

    /// Total T-cycles charged since power-on.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Instructions executed since power-on.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    pub fn table(&self) -> &'static OpcodeTable {
        self.table
    }

    pub fn add_breakpoint(&mut self, addr: u16) -> bool {
        self.breakpoints.insert(addr)
    }

    pub fn remove_breakpoint(&mut self, addr: u16) -> bool {
        self.breakpoints.remove(&addr)
    }

    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
        self.resume_at = None;
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = u16> + '_ {
        self.breakpoints.iter().copied()
    }

    pub fn disassembler(&self) -> Disassembler<'_> {
        Disassembler::new(&self.memory, self.table)
    }

    pub fn disassemble_instruction(&self, address: u16) -> String {
        self.disassembler().instruction(address)
    }

    /// Title from the cartridge header (0x0134–0x0143), up to the first NUL
    /// and with non-printable bytes dropped.
    pub fn cartridge_title(&self) -> String {
        let start = TITLE_START as usize;
        self.memory.rom()[start..start + TITLE_LEN]
            .iter()
            .take_while(|&&b| b != 0)
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|&b| b as char)
            .collect()
    }
}
