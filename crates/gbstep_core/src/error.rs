use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by the core to its host.
///
/// None of these leave the machine half-updated: the operation that fails
/// is rejected before it touches registers or memory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("cartridge is {size} bytes but the ROM window holds {capacity}")]
    CapacityExceeded { size: usize, capacity: usize },
    #[error("unimplemented opcode {opcode:#04x} at pc {pc:#06x}")]
    UnimplementedOpcode { opcode: u8, pc: u16 },
    #[error("range {start:#06x}+{len:#x} runs past the end of the address space")]
    InvalidAddress { start: u16, len: usize },
}
