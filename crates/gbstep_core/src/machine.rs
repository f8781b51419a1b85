mod gameboy;
mod init;

pub use gameboy::{GameBoy, RunOutcome, Step, StopReason};
