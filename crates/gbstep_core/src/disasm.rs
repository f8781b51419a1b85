use crate::cpu::{OpcodeTable, Operation, IMM16_TOKEN, IMM8_TOKEN};
use crate::memory::AddressSpace;

/// One row of a disassembly listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub address: u16,
    /// Opcode followed by its operand bytes. Length-0 entries show just the
    /// opcode.
    pub bytes: Vec<u8>,
    pub text: String,
}

/// Read-only instruction renderer over an address space.
#[derive(Clone, Copy)]
pub struct Disassembler<'a> {
    memory: &'a AddressSpace,
    table: &'a OpcodeTable,
}

impl<'a> Disassembler<'a> {
    pub fn new(memory: &'a AddressSpace, table: &'a OpcodeTable) -> Self {
        Self { memory, table }
    }

    /// Render the instruction at `address`, e.g. `LD BC, 0x1234`.
    pub fn instruction(&self, address: u16) -> String {
        let instr = self.table.get(self.memory.read8(address));
        let operand = address.wrapping_add(1);

        match instr.operation {
            Operation::Imm8(_) => {
                let value = self.memory.read8(operand);
                instr
                    .mnemonic
                    .replacen(IMM8_TOKEN, &format!("0x{value:02X}"), 1)
            }
            Operation::Imm16(_) => {
                let value = self.memory.read16(operand);
                instr
                    .mnemonic
                    .replacen(IMM16_TOKEN, &format!("0x{value:04X}"), 1)
            }
            Operation::Implied(_) | Operation::Unimplemented => instr.mnemonic.to_string(),
        }
    }

    /// Byte length used to step over the instruction at `address`: its
    /// declared length, or 1 for entries that have none.
    pub fn stride(&self, address: u16) -> u16 {
        let len = self.table.get(self.memory.read8(address)).len;
        len.max(1) as u16
    }

    pub fn line(&self, address: u16) -> Line {
        let stride = self.stride(address);
        let bytes = (0..stride)
            .map(|i| self.memory.read8(address.wrapping_add(i)))
            .collect();
        Line {
            address,
            bytes,
            text: self.instruction(address),
        }
    }

    /// Listing from `start` up to (not including) `end`.
    ///
    /// An instruction that begins before `end` is listed whole even if its
    /// operands extend past it.
    pub fn lines(&self, start: u16, end: u16) -> impl Iterator<Item = Line> + 'a {
        let this = *self;
        let mut address = start as u32;
        let end = end as u32;
        std::iter::from_fn(move || {
            if address >= end {
                return None;
            }
            let line = this.line(address as u16);
            address += this.stride(address as u16) as u32;
            Some(line)
        })
    }
}
