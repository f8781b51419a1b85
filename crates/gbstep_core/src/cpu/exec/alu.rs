use crate::cpu::{Control, Cpu, Flags};
use crate::memory::AddressSpace;

impl Cpu {
    fn alu_apply(&mut self, operation: u8, value: u8) {
        match operation & 0x07 {
            0 => self.alu_add(value, false),
            1 => self.alu_add(value, true),
            2 => self.alu_sub(value, false),
            3 => self.alu_sub(value, true),
            4 => self.alu_and(value),
            5 => self.alu_xor(value),
            6 => self.alu_or(value),
            _ => self.alu_cp(value),
        }
    }

    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A, r over 0x80–0xBF.
    pub(crate) fn exec_alu_r(&mut self, mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!((0x80..=0xBF).contains(&opcode));
        let value = self.read_reg8(mem, opcode & 0x07);
        self.alu_apply(opcode >> 3, value);
        Control::Next
    }

    pub(crate) fn exec_alu_n8(&mut self, _mem: &mut AddressSpace, opcode: u8, value: u8) -> Control {
        debug_assert!(matches!(
            opcode,
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE
        ));
        self.alu_apply(opcode >> 3, value);
        Control::Next
    }

    pub(crate) fn exec_rotate_a(&mut self, _mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));

        let a = self.regs.a;
        let carry_in = self.flag(Flags::CARRY);
        let (result, carry_out) = match opcode {
            // RLCA: bit 7 to carry and bit 0.
            0x07 => (a.rotate_left(1), a & 0x80 != 0),
            // RRCA: bit 0 to carry and bit 7.
            0x0F => (a.rotate_right(1), a & 0x01 != 0),
            // RLA: through carry.
            0x17 => ((a << 1) | u8::from(carry_in), a & 0x80 != 0),
            // RRA: through carry.
            _ => ((a >> 1) | if carry_in { 0x80 } else { 0 }, a & 0x01 != 0),
        };

        self.regs.a = result;
        self.regs.f = if carry_out { Flags::CARRY } else { Flags::empty() };
        Control::Next
    }

    pub(crate) fn exec_add_hl_rr(&mut self, _mem: &mut AddressSpace, opcode: u8) -> Control {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));
        let value = self.read_rp((opcode >> 4) & 0x03);
        self.alu_add16_hl(value);
        Control::Next
    }

    pub(crate) fn exec_add_sp_e8(&mut self, _mem: &mut AddressSpace, _opcode: u8, offset: u8) -> Control {
        self.regs.sp = self.alu_add16_signed(self.regs.sp, offset);
        Control::Next
    }

    pub(crate) fn exec_daa(&mut self, _mem: &mut AddressSpace, _opcode: u8) -> Control {
        self.alu_daa();
        Control::Next
    }

    pub(crate) fn exec_cpl(&mut self, _mem: &mut AddressSpace, _opcode: u8) -> Control {
        self.regs.a = !self.regs.a;
        self.regs.set_flags(Flags::NEGATIVE | Flags::HALF_CARRY);
        Control::Next
    }

    pub(crate) fn exec_scf(&mut self, _mem: &mut AddressSpace, _opcode: u8) -> Control {
        self.regs.set_flags(Flags::CARRY);
        self.regs.clear_flags(Flags::NEGATIVE | Flags::HALF_CARRY);
        Control::Next
    }

    pub(crate) fn exec_ccf(&mut self, _mem: &mut AddressSpace, _opcode: u8) -> Control {
        self.regs.f.toggle(Flags::CARRY);
        self.regs.clear_flags(Flags::NEGATIVE | Flags::HALF_CARRY);
        Control::Next
    }
}
