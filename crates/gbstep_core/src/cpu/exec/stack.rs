use crate::cpu::{Control, Cpu};
use crate::memory::AddressSpace;

impl Cpu {
    pub(crate) fn exec_push(&mut self, mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));
        let value = self.read_rp2((opcode >> 4) & 0x03);
        self.push_u16(mem, value);
        Control::Next
    }

    /// POP rr. `POP AF` drops the low nibble of F.
    pub(crate) fn exec_pop(&mut self, mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));
        let value = self.pop_u16(mem);
        self.write_rp2((opcode >> 4) & 0x03, value);
        Control::Next
    }

    pub(crate) fn exec_rst(&mut self, mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!(matches!(
            opcode,
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF
        ));
        let ret = self.regs.pc;
        self.push_u16(mem, ret);
        Control::Jump((opcode & 0x38) as u16)
    }

    pub(crate) fn exec_call(&mut self, mem: &mut AddressSpace, _opcode: u8, addr: u16) -> Control {
        let ret = self.regs.pc;
        self.push_u16(mem, ret);
        Control::Jump(addr)
    }

    pub(crate) fn exec_ret(&mut self, mem: &mut AddressSpace, _opcode: u8) -> Control {
        Control::Jump(self.pop_u16(mem))
    }

    pub(crate) fn exec_reti(&mut self, mem: &mut AddressSpace, _opcode: u8) -> Control {
        self.ime = true;
        Control::Jump(self.pop_u16(mem))
    }
}
