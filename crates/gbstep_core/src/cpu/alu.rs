use super::{Cpu, Flags};

impl Cpu {
    #[inline]
    pub(super) fn flag(&self, mask: Flags) -> bool {
        self.regs.is_flag_set(mask)
    }

    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry_in = u8::from(use_carry && self.flag(Flags::CARRY));

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.a = result;

        let mut f = Flags::empty();
        f.set(Flags::ZERO, result == 0);
        f.set(Flags::HALF_CARRY, half > 0x0F);
        f.set(Flags::CARRY, full > 0xFF);
        self.regs.f = f;
    }

    /// Core 8-bit SUB/SBC operation on A.
    ///
    /// `use_carry` selects between SUB (false) and SBC (true).
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry_in = i16::from(use_carry && self.flag(Flags::CARRY));

        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        self.regs.a = result;

        let mut f = Flags::NEGATIVE;
        f.set(Flags::ZERO, result == 0);
        f.set(Flags::HALF_CARRY, half < 0);
        f.set(Flags::CARRY, full < 0);
        self.regs.f = f;
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a & value;
        self.regs.a = result;

        let mut f = Flags::HALF_CARRY;
        f.set(Flags::ZERO, result == 0);
        self.regs.f = f;
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a | value;
        self.regs.a = result;

        let mut f = Flags::empty();
        f.set(Flags::ZERO, result == 0);
        self.regs.f = f;
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a ^ value;
        self.regs.a = result;

        let mut f = Flags::empty();
        f.set(Flags::ZERO, result == 0);
        self.regs.f = f;
    }

    /// Compare A with `value`, setting flags as if `A - value` was performed.
    /// A itself is not modified.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        let a = self.regs.a;

        let mut f = Flags::NEGATIVE;
        f.set(Flags::ZERO, a == value);
        f.set(Flags::HALF_CARRY, (value & 0x0F) > (a & 0x0F));
        f.set(Flags::CARRY, a < value);
        self.regs.f = f;
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Updates A, Z, H, C; leaves N unchanged. After a subtraction C is never
    /// changed; after an addition a C that was already set stays set.
    pub(super) fn alu_daa(&mut self) {
        let half = self.flag(Flags::HALF_CARRY);
        let carry = self.flag(Flags::CARRY);
        let mut value = self.regs.a as u16;

        if self.flag(Flags::NEGATIVE) {
            if half {
                value = value.wrapping_sub(0x06) & 0xFF;
            }
            if carry {
                value = value.wrapping_sub(0x60);
            }
        } else {
            if half || (value & 0x0F) > 0x09 {
                value += 0x06;
            }
            if carry || value > 0x9F {
                value += 0x60;
            }
        }

        let result = value as u8;
        self.regs.a = result;
        self.regs.set_flag(Flags::ZERO, result == 0);
        self.regs.clear_flags(Flags::HALF_CARRY);
        if value & 0x100 != 0 {
            self.regs.set_flags(Flags::CARRY);
        }
    }

    /// 8-bit increment helper used by INC r and INC (HL).
    ///
    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.set_flag(Flags::ZERO, result == 0);
        self.regs.clear_flags(Flags::NEGATIVE);
        self.regs.set_flag(Flags::HALF_CARRY, (value & 0x0F) == 0x0F);
        result
    }

    /// 8-bit decrement helper used by DEC r and DEC (HL).
    ///
    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.set_flag(Flags::ZERO, result == 0);
        self.regs.set_flags(Flags::NEGATIVE);
        self.regs.set_flag(Flags::HALF_CARRY, (value & 0x0F) == 0);
        result
    }

    /// 16-bit add helper for `ADD HL,rr`.
    ///
    /// Z is unaffected; N is cleared; H and C come from bits 11 and 15.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let result = hl.wrapping_add(value);

        self.regs.clear_flags(Flags::NEGATIVE);
        self.regs
            .set_flag(Flags::HALF_CARRY, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.regs
            .set_flag(Flags::CARRY, hl as u32 + value as u32 > 0xFFFF);

        self.regs.set_hl(result);
    }

    /// Signed 8-bit offset added to a 16-bit base, shared by ADD SP,e8 and
    /// LD HL,SP+e8.
    ///
    /// Z and N are cleared; H and C are computed from the low byte.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;

        let mut f = Flags::empty();
        f.set(Flags::HALF_CARRY, (base & 0x000F) + (offset & 0x000F) > 0x000F);
        f.set(Flags::CARRY, (base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        self.regs.f = f;

        base.wrapping_add(offset)
    }
}
