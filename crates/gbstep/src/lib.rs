use std::fmt;
use std::io::Write;

use anyhow::{Context, Result};
use gbstep_core::{CoreError, GameBoy, Registers, Step, StopReason};

mod config;

pub use config::{parse_address, parse_args, parse_number, RunConfig, DEFAULT_STEPS, ROM_ENV, USAGE};

/// Bytes per row of a memory dump.
const DUMP_ROW: usize = 16;

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop {
    Breakpoint { pc: u16 },
    StepLimit,
    /// The CPU met an instruction it cannot execute. State is exactly as it
    /// was in front of that instruction.
    Fault(CoreError),
}

impl From<StopReason> for Stop {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::Breakpoint { pc } => Stop::Breakpoint { pc },
            StopReason::InstructionLimit => Stop::StepLimit,
        }
    }
}

/// Final machine state of a `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub title: String,
    pub instructions: u64,
    pub cycles: u64,
    pub regs: Registers,
    pub stop: Stop,
}

impl RunReport {
    /// `Err` when the run ended on a fault.
    pub fn into_result(self) -> Result<()> {
        match self.stop {
            Stop::Fault(err) => Err(err.into()),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stop {
            Stop::Breakpoint { pc } => writeln!(f, "stopped: breakpoint at 0x{pc:04X}")?,
            Stop::StepLimit => writeln!(f, "stopped: step limit reached")?,
            Stop::Fault(err) => writeln!(f, "stopped: {err}")?,
        }
        writeln!(
            f,
            "executed {} instructions in {} cycles",
            self.instructions, self.cycles
        )?;
        write!(f, "{}", self.regs)
    }
}

/// Load the configured cartridge, power on, and execute until a breakpoint,
/// the step budget or an unimplemented opcode. Listings, traces and dumps
/// are written to `out`.
pub fn run(config: &RunConfig, out: &mut impl Write) -> Result<RunReport> {
    let path = &config.rom_path;
    let rom = std::fs::read(path).with_context(|| format!("failed to read ROM {}", path.display()))?;

    let mut gb = GameBoy::new();
    gb.load_cartridge(&rom)
        .with_context(|| format!("failed to load ROM {}", path.display()))?;
    gb.start();
    for &addr in &config.breakpoints {
        gb.add_breakpoint(addr);
    }

    if let Some((start, end)) = config.disassemble {
        for line in gb.disassembler().lines(start, end) {
            let bytes: Vec<String> = line.bytes.iter().map(|b| format!("{b:02X}")).collect();
            writeln!(out, "{:04X}  {:<9} {}", line.address, bytes.join(" "), line.text)?;
        }
    }

    let stop = execute(&mut gb, config, out)?;

    if let Some((start, len)) = config.dump {
        let bytes = gb
            .memory
            .slice(start, len)
            .with_context(|| format!("cannot dump {len} bytes at 0x{start:04X}"))?;
        write_dump(out, start, bytes)?;
    }

    Ok(RunReport {
        title: gb.cartridge_title(),
        instructions: gb.instructions(),
        cycles: gb.cycles(),
        regs: gb.cpu.regs,
        stop,
    })
}

fn execute(gb: &mut GameBoy, config: &RunConfig, out: &mut impl Write) -> Result<Stop> {
    if !config.trace {
        return Ok(match gb.run(config.max_instructions) {
            Ok(outcome) => outcome.stop.into(),
            Err(err) => Stop::Fault(err),
        });
    }

    let budget_end = gb.instructions() + config.max_instructions;
    while gb.instructions() < budget_end {
        let pc = gb.cpu.regs.pc;
        let text = gb.disassemble_instruction(pc);
        match gb.step() {
            Ok(Step::Executed(executed)) => writeln!(
                out,
                "{pc:04X}  {text:<20} {:>2}  {}",
                executed.cycles, gb.cpu.regs
            )?,
            Ok(Step::Breakpoint { pc }) => return Ok(Stop::Breakpoint { pc }),
            Err(err) => return Ok(Stop::Fault(err)),
        }
    }
    Ok(Stop::StepLimit)
}

fn write_dump(out: &mut impl Write, start: u16, bytes: &[u8]) -> std::io::Result<()> {
    for (row, chunk) in bytes.chunks(DUMP_ROW).enumerate() {
        let addr = start as usize + row * DUMP_ROW;
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02X}")).collect();
        writeln!(out, "{addr:04X}: {}", hex.join(" "))?;
    }
    Ok(())
}
