use super::{Cpu, Flags};
use crate::memory::AddressSpace;

impl Cpu {
    /// Helper to read an 8-bit register or (HL) by index.
    ///
    /// The encoding matches the standard Game Boy register order used by
    /// opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8(&self, mem: &AddressSpace, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => mem.read8(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    /// Helper to write an 8-bit register or (HL) by index.
    ///
    /// The encoding matches `read_reg8`.
    #[inline]
    pub(super) fn write_reg8(&mut self, mem: &mut AddressSpace, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => mem.write8(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    /// 16-bit pair by the `rp` field: 0=BC, 1=DE, 2=HL, 3=SP.
    #[inline]
    pub(super) fn read_rp(&self, index: u8) -> u16 {
        match index & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_rp(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    /// 16-bit pair by the PUSH/POP `rp2` field: 0=BC, 1=DE, 2=HL, 3=AF.
    #[inline]
    pub(super) fn read_rp2(&self, index: u8) -> u16 {
        match index & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.af(),
        }
    }

    #[inline]
    pub(super) fn write_rp2(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.set_af(value),
        }
    }

    /// Branch condition by the `cc` field: 0=NZ, 1=Z, 2=NC, 3=C.
    #[inline]
    pub(super) fn cc_condition(&self, cc: u8) -> bool {
        match cc & 0x03 {
            0 => !self.flag(Flags::ZERO),
            1 => self.flag(Flags::ZERO),
            2 => !self.flag(Flags::CARRY),
            _ => self.flag(Flags::CARRY),
        }
    }

    /// Stack grows downward: SP drops by two, then memory[SP] = low and
    /// memory[SP+1] = high.
    #[inline]
    pub(super) fn push_u16(&mut self, mem: &mut AddressSpace, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        mem.write16(self.regs.sp, value);
    }

    #[inline]
    pub(super) fn pop_u16(&mut self, mem: &AddressSpace) -> u16 {
        let value = mem.read16(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }
}
