use crate::cpu::{Control, Cpu};
use crate::memory::AddressSpace;

impl Cpu {
    /// Target of a relative jump. The displacement is a signed 8-bit offset
    /// from the address following the operand, which is already in PC.
    #[inline]
    fn relative_target(&self, offset: u8) -> u16 {
        self.regs.pc.wrapping_add_signed(offset as i8 as i16)
    }

    pub(crate) fn exec_jr(&mut self, _mem: &mut AddressSpace, _opcode: u8, offset: u8) -> Control {
        Control::Jump(self.relative_target(offset))
    }

    pub(crate) fn exec_jr_cc(&mut self, _mem: &mut AddressSpace, opcode: u8, offset: u8) -> Control {
        debug_assert!(matches!(opcode, 0x20 | 0x28 | 0x30 | 0x38));
        if self.cc_condition(opcode >> 3) {
            Control::Jump(self.relative_target(offset))
        } else {
            Control::Next
        }
    }

    pub(crate) fn exec_jp(&mut self, _mem: &mut AddressSpace, _opcode: u8, addr: u16) -> Control {
        Control::Jump(addr)
    }

    pub(crate) fn exec_jp_cc(&mut self, _mem: &mut AddressSpace, opcode: u8, addr: u16) -> Control {
        debug_assert!(matches!(opcode, 0xC2 | 0xCA | 0xD2 | 0xDA));
        if self.cc_condition(opcode >> 3) {
            Control::Jump(addr)
        } else {
            Control::Next
        }
    }

    pub(crate) fn exec_jp_hl(&mut self, _mem: &mut AddressSpace, _opcode: u8) -> Control {
        Control::Jump(self.regs.hl())
    }

    pub(crate) fn exec_call_cc(&mut self, mem: &mut AddressSpace, opcode: u8, addr: u16) -> Control {
        debug_assert!(matches!(opcode, 0xC4 | 0xCC | 0xD4 | 0xDC));
        if self.cc_condition(opcode >> 3) {
            let ret = self.regs.pc;
            self.push_u16(mem, ret);
            Control::Jump(addr)
        } else {
            Control::Next
        }
    }

    pub(crate) fn exec_ret_cc(&mut self, mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!(matches!(opcode, 0xC0 | 0xC8 | 0xD0 | 0xD8));
        if self.cc_condition(opcode >> 3) {
            Control::Jump(self.pop_u16(mem))
        } else {
            Control::Next
        }
    }
}
