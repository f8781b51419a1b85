pub mod cpu;
pub mod disasm;
mod error;
pub mod machine;
pub mod memory;

pub use cpu::{Cpu, Executed, Flags, OpcodeTable, Reg16, Reg8, Registers};
pub use disasm::{Disassembler, Line};
pub use error::{CoreError, Result};
pub use machine::{GameBoy, RunOutcome, Step, StopReason};
pub use memory::AddressSpace;
