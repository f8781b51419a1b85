use super::{Control, Cpu, Flow, OpcodeTable, Operation};
use crate::error::{CoreError, Result};
use crate::memory::AddressSpace;

/// Record of one executed instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Executed {
    /// Address the opcode was fetched from.
    pub pc: u16,
    pub opcode: u8,
    /// T-cycles charged, including the taken-branch cost when it applies.
    pub cycles: u32,
}

impl Cpu {
    /// Decode and execute the instruction at PC.
    ///
    /// Operand bytes are read according to the descriptor's operation shape,
    /// PC is moved past the whole instruction, and then the handler runs. A
    /// handler that redirects control flow replaces PC instead.
    ///
    /// An unimplemented entry is reported before anything is modified, so
    /// the caller can inspect the exact state that reached it.
    pub fn step(&mut self, mem: &mut AddressSpace, table: &OpcodeTable) -> Result<Executed> {
        let pc = self.regs.pc;
        let opcode = mem.read8(pc);
        let instr = table.get(opcode);

        let next = pc.wrapping_add(instr.len as u16);
        let control = match instr.operation {
            Operation::Implied(handler) => {
                self.regs.pc = next;
                handler(self, mem, opcode)
            }
            Operation::Imm8(handler) => {
                let operand = mem.read8(pc.wrapping_add(1));
                self.regs.pc = next;
                handler(self, mem, opcode, operand)
            }
            Operation::Imm16(handler) => {
                let operand = mem.read16(pc.wrapping_add(1));
                self.regs.pc = next;
                handler(self, mem, opcode, operand)
            }
            Operation::Unimplemented => {
                log::error!(
                    "GB CPU stopped: unimplemented opcode 0x{opcode:02X} ({mnemonic}) at PC=0x{pc:04X} (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
                    mnemonic = instr.mnemonic,
                    sp = self.regs.sp,
                    af = self.regs.af(),
                    bc = self.regs.bc(),
                    de = self.regs.de(),
                    hl = self.regs.hl(),
                );
                return Err(CoreError::UnimplementedOpcode { opcode, pc });
            }
        };

        debug_assert!(
            !(instr.flow == Flow::Sequential && matches!(control, Control::Jump(_))),
            "sequential opcode {opcode:#04x} redirected control flow"
        );

        let cycles = match (instr.flow, control) {
            (Flow::Branch { taken_cycles }, Control::Jump(_)) => taken_cycles,
            _ => instr.cycles,
        };
        if let Control::Jump(target) = control {
            self.regs.pc = target;
        }

        Ok(Executed { pc, opcode, cycles })
    }
}
