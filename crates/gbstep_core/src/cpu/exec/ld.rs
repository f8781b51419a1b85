use crate::cpu::{Control, Cpu};
use crate::memory::AddressSpace;

impl Cpu {
    pub(crate) fn exec_ld_rr_n16(&mut self, _mem: &mut AddressSpace, opcode: u8, value: u16) -> Control {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));
        self.write_rp((opcode >> 4) & 0x03, value);
        Control::Next
    }

    /// Address for the `(BC)`, `(DE)`, `(HL+)`, `(HL-)` forms, applying the
    /// HL post-increment/decrement.
    fn indirect_addr(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(crate) fn exec_ld_indirect_a(&mut self, mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!(matches!(opcode, 0x02 | 0x12 | 0x22 | 0x32));
        let addr = self.indirect_addr(opcode);
        mem.write8(addr, self.regs.a);
        Control::Next
    }

    pub(crate) fn exec_ld_a_indirect(&mut self, mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!(matches!(opcode, 0x0A | 0x1A | 0x2A | 0x3A));
        let addr = self.indirect_addr(opcode);
        self.regs.a = mem.read8(addr);
        Control::Next
    }

    pub(crate) fn exec_ld_r_n8(&mut self, mem: &mut AddressSpace, opcode: u8, value: u8) -> Control {
        debug_assert!(matches!(
            opcode,
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E
        ));
        self.write_reg8(mem, (opcode >> 3) & 0x07, value);
        Control::Next
    }

    /// LD r1, r2 over 0x40–0x7F (0x76 is HALT and never reaches here).
    pub(crate) fn exec_ld_r_r(&mut self, mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!((0x40..=0x7F).contains(&opcode) && opcode != 0x76);
        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let value = self.read_reg8(mem, src);
        self.write_reg8(mem, dst, value);
        Control::Next
    }

    pub(crate) fn exec_ld_a16_sp(&mut self, mem: &mut AddressSpace, _opcode: u8, addr: u16) -> Control {
        mem.write16(addr, self.regs.sp);
        Control::Next
    }

    pub(crate) fn exec_ldh_a8(&mut self, mem: &mut AddressSpace, opcode: u8, offset: u8) -> Control {
        debug_assert!(matches!(opcode, 0xE0 | 0xF0));
        let addr = 0xFF00u16.wrapping_add(offset as u16);
        match opcode {
            0xE0 => mem.write8(addr, self.regs.a),
            _ => self.regs.a = mem.read8(addr),
        }
        Control::Next
    }

    pub(crate) fn exec_ldh_c(&mut self, mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!(matches!(opcode, 0xE2 | 0xF2));
        let addr = 0xFF00u16.wrapping_add(self.regs.c as u16);
        match opcode {
            0xE2 => mem.write8(addr, self.regs.a),
            _ => self.regs.a = mem.read8(addr),
        }
        Control::Next
    }

    pub(crate) fn exec_ld_a16_a(&mut self, mem: &mut AddressSpace, opcode: u8, addr: u16) -> Control {
        debug_assert!(matches!(opcode, 0xEA | 0xFA));
        match opcode {
            0xEA => mem.write8(addr, self.regs.a),
            _ => self.regs.a = mem.read8(addr),
        }
        Control::Next
    }

    pub(crate) fn exec_ld_hl_sp_e8(&mut self, _mem: &mut AddressSpace, _opcode: u8, offset: u8) -> Control {
        let result = self.alu_add16_signed(self.regs.sp, offset);
        self.regs.set_hl(result);
        Control::Next
    }

    pub(crate) fn exec_ld_sp_hl(&mut self, _mem: &mut AddressSpace, _opcode: u8) -> Control {
        self.regs.sp = self.regs.hl();
        Control::Next
    }
}
