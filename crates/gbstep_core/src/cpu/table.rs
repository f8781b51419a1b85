use std::borrow::Cow;

use lazy_static::lazy_static;

use super::Cpu;
use crate::memory::AddressSpace;

/// Register names in opcode-field order (see `Cpu::read_reg8`).
const R8: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const RP: [&str; 4] = ["BC", "DE", "HL", "SP"];
const RP2: [&str; 4] = ["BC", "DE", "HL", "AF"];
const CC: [&str; 4] = ["NZ", "Z", "NC", "C"];
const INDIRECT: [&str; 4] = ["(BC)", "(DE)", "(HL+)", "(HL-)"];
const ALU: [&str; 8] = ["ADD A,", "ADC A,", "SUB", "SBC A,", "AND", "XOR", "OR", "CP"];

/// Placeholder tokens the disassembler substitutes with the operand.
pub(crate) const IMM8_TOKEN: &str = "n8";
pub(crate) const IMM16_TOKEN: &str = "n16";

/// What a handler did with the program counter.
///
/// The engine has already moved PC past the instruction when a handler
/// runs, so `Next` needs no further work and relative targets and return
/// addresses are computed from the current PC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Next,
    Jump(u16),
}

/// Control-flow class of an instruction, declared in its descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Never redirects PC.
    Sequential,
    /// Always redirects PC (JP, CALL, RET, RST, JR).
    Jump,
    /// Redirects only when its condition holds, and then costs
    /// `taken_cycles` instead of the base cycle count.
    Branch { taken_cycles: u32 },
}

/// Handler with no operand. Every handler receives the opcode byte so that
/// instruction families can decode their register and condition fields.
pub type ImpliedFn = fn(&mut Cpu, &mut AddressSpace, u8) -> Control;
/// Handler taking the byte that follows the opcode.
pub type Imm8Fn = fn(&mut Cpu, &mut AddressSpace, u8, u8) -> Control;
/// Handler taking the little-endian word that follows the opcode.
pub type Imm16Fn = fn(&mut Cpu, &mut AddressSpace, u8, u16) -> Control;

/// Operand-width-typed handler.
#[derive(Clone, Copy)]
pub enum Operation {
    Implied(ImpliedFn),
    Imm8(Imm8Fn),
    Imm16(Imm16Fn),
    /// No handler: HALT, STOP, the CB prefix and the opcode holes.
    Unimplemented,
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Implied(_) => "Implied",
            Operation::Imm8(_) => "Imm8",
            Operation::Imm16(_) => "Imm16",
            Operation::Unimplemented => "Unimplemented",
        };
        f.write_str(name)
    }
}

/// Immutable opcode descriptor.
#[derive(Clone, Debug)]
pub struct Instruction {
    /// Total length in bytes including the opcode; 0 marks an entry the
    /// engine refuses to execute.
    pub len: u8,
    /// T-cycles charged when the instruction falls through (or always, for
    /// anything that is not a `Flow::Branch`).
    pub cycles: u32,
    pub flow: Flow,
    pub operation: Operation,
    /// Disassembly template; operands appear as `n8` or `n16`.
    pub mnemonic: Cow<'static, str>,
}

impl Instruction {
    fn implied(mnemonic: impl Into<Cow<'static, str>>, cycles: u32, handler: ImpliedFn) -> Self {
        Self {
            len: 1,
            cycles,
            flow: Flow::Sequential,
            operation: Operation::Implied(handler),
            mnemonic: mnemonic.into(),
        }
    }

    fn imm8(mnemonic: impl Into<Cow<'static, str>>, cycles: u32, handler: Imm8Fn) -> Self {
        Self {
            len: 2,
            cycles,
            flow: Flow::Sequential,
            operation: Operation::Imm8(handler),
            mnemonic: mnemonic.into(),
        }
    }

    fn imm16(mnemonic: impl Into<Cow<'static, str>>, cycles: u32, handler: Imm16Fn) -> Self {
        Self {
            len: 3,
            cycles,
            flow: Flow::Sequential,
            operation: Operation::Imm16(handler),
            mnemonic: mnemonic.into(),
        }
    }

    fn unimplemented(mnemonic: impl Into<Cow<'static, str>>) -> Self {
        Self {
            len: 0,
            cycles: 0,
            flow: Flow::Sequential,
            operation: Operation::Unimplemented,
            mnemonic: mnemonic.into(),
        }
    }

    fn jumps(mut self) -> Self {
        self.flow = Flow::Jump;
        self
    }

    fn branches(mut self, taken_cycles: u32) -> Self {
        self.flow = Flow::Branch { taken_cycles };
        self
    }

    #[inline]
    pub fn is_implemented(&self) -> bool {
        self.len != 0
    }
}

/// The 256-entry unprefixed opcode table.
///
/// Built once per process; the engine and the disassembler borrow it.
pub struct OpcodeTable {
    entries: Vec<Instruction>,
}

lazy_static! {
    static ref OPCODES: OpcodeTable = OpcodeTable::build();
}

impl OpcodeTable {
    /// The process-wide table.
    pub fn global() -> &'static OpcodeTable {
        &OPCODES
    }

    fn build() -> Self {
        Self {
            entries: (0..=u8::MAX).map(describe).collect(),
        }
    }

    #[inline]
    pub fn get(&self, opcode: u8) -> &Instruction {
        &self.entries[opcode as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Instruction)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(opcode, instr)| (opcode as u8, instr))
    }
}

impl std::fmt::Debug for OpcodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let implemented = self.entries.iter().filter(|i| i.is_implemented()).count();
        f.debug_struct("OpcodeTable")
            .field("entries", &self.entries.len())
            .field("implemented", &implemented)
            .finish()
    }
}

/// Descriptor for one opcode. Total: unknown opcodes fall through to the
/// unimplemented sentinel.
fn describe(opcode: u8) -> Instruction {
    // Standard opcode fields: xx yyy zzz, with yyy = pp q.
    let y = ((opcode >> 3) & 0x07) as usize;
    let z = (opcode & 0x07) as usize;
    let p = ((opcode >> 4) & 0x03) as usize;
    let cc = y & 0x03;

    match opcode {
        0x00 => Instruction::implied("NOP", 4, Cpu::exec_nop),

        0x01 | 0x11 | 0x21 | 0x31 => {
            Instruction::imm16(format!("LD {}, n16", RP[p]), 12, Cpu::exec_ld_rr_n16)
        }
        0x02 | 0x12 | 0x22 | 0x32 => {
            Instruction::implied(format!("LD {}, A", INDIRECT[p]), 8, Cpu::exec_ld_indirect_a)
        }
        0x0A | 0x1A | 0x2A | 0x3A => {
            Instruction::implied(format!("LD A, {}", INDIRECT[p]), 8, Cpu::exec_ld_a_indirect)
        }

        0x03 | 0x13 | 0x23 | 0x33 => {
            Instruction::implied(format!("INC {}", RP[p]), 8, Cpu::exec_inc16)
        }
        0x0B | 0x1B | 0x2B | 0x3B => {
            Instruction::implied(format!("DEC {}", RP[p]), 8, Cpu::exec_dec16)
        }

        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => Instruction::implied(
            format!("INC {}", R8[y]),
            if y == 6 { 12 } else { 4 },
            Cpu::exec_inc8,
        ),
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => Instruction::implied(
            format!("DEC {}", R8[y]),
            if y == 6 { 12 } else { 4 },
            Cpu::exec_dec8,
        ),
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => Instruction::imm8(
            format!("LD {}, n8", R8[y]),
            if y == 6 { 12 } else { 8 },
            Cpu::exec_ld_r_n8,
        ),

        0x07 => Instruction::implied("RLCA", 4, Cpu::exec_rotate_a),
        0x0F => Instruction::implied("RRCA", 4, Cpu::exec_rotate_a),
        0x17 => Instruction::implied("RLA", 4, Cpu::exec_rotate_a),
        0x1F => Instruction::implied("RRA", 4, Cpu::exec_rotate_a),

        0x08 => Instruction::imm16("LD (n16), SP", 20, Cpu::exec_ld_a16_sp),

        0x09 | 0x19 | 0x29 | 0x39 => {
            Instruction::implied(format!("ADD HL, {}", RP[p]), 8, Cpu::exec_add_hl_rr)
        }

        0x10 => Instruction::unimplemented("STOP"),

        0x18 => Instruction::imm8("JR n8", 12, Cpu::exec_jr).jumps(),
        0x20 | 0x28 | 0x30 | 0x38 => {
            Instruction::imm8(format!("JR {}, n8", CC[cc]), 8, Cpu::exec_jr_cc).branches(12)
        }

        0x27 => Instruction::implied("DAA", 4, Cpu::exec_daa),
        0x2F => Instruction::implied("CPL", 4, Cpu::exec_cpl),
        0x37 => Instruction::implied("SCF", 4, Cpu::exec_scf),
        0x3F => Instruction::implied("CCF", 4, Cpu::exec_ccf),

        0x76 => Instruction::unimplemented("HALT"),
        0x40..=0x7F => Instruction::implied(
            format!("LD {}, {}", R8[y], R8[z]),
            if y == 6 || z == 6 { 8 } else { 4 },
            Cpu::exec_ld_r_r,
        ),

        0x80..=0xBF => Instruction::implied(
            format!("{} {}", ALU[y], R8[z]),
            if z == 6 { 8 } else { 4 },
            Cpu::exec_alu_r,
        ),
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            Instruction::imm8(format!("{} n8", ALU[y]), 8, Cpu::exec_alu_n8)
        }

        0xC0 | 0xC8 | 0xD0 | 0xD8 => {
            Instruction::implied(format!("RET {}", CC[cc]), 8, Cpu::exec_ret_cc).branches(20)
        }
        0xC9 => Instruction::implied("RET", 16, Cpu::exec_ret).jumps(),
        0xD9 => Instruction::implied("RETI", 16, Cpu::exec_reti).jumps(),

        0xC1 | 0xD1 | 0xE1 | 0xF1 => {
            Instruction::implied(format!("POP {}", RP2[p]), 12, Cpu::exec_pop)
        }
        0xC5 | 0xD5 | 0xE5 | 0xF5 => {
            Instruction::implied(format!("PUSH {}", RP2[p]), 16, Cpu::exec_push)
        }

        0xC2 | 0xCA | 0xD2 | 0xDA => {
            Instruction::imm16(format!("JP {}, n16", CC[cc]), 12, Cpu::exec_jp_cc).branches(16)
        }
        0xC3 => Instruction::imm16("JP n16", 16, Cpu::exec_jp).jumps(),
        0xE9 => Instruction::implied("JP HL", 4, Cpu::exec_jp_hl).jumps(),

        0xC4 | 0xCC | 0xD4 | 0xDC => {
            Instruction::imm16(format!("CALL {}, n16", CC[cc]), 12, Cpu::exec_call_cc)
                .branches(24)
        }
        0xCD => Instruction::imm16("CALL n16", 24, Cpu::exec_call).jumps(),

        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => Instruction::implied(
            format!("RST 0x{:02X}", opcode & 0x38),
            16,
            Cpu::exec_rst,
        )
        .jumps(),

        0xCB => Instruction::unimplemented("PREFIX CB"),

        0xE0 => Instruction::imm8("LDH (n8), A", 12, Cpu::exec_ldh_a8),
        0xF0 => Instruction::imm8("LDH A, (n8)", 12, Cpu::exec_ldh_a8),
        0xE2 => Instruction::implied("LD (C), A", 8, Cpu::exec_ldh_c),
        0xF2 => Instruction::implied("LD A, (C)", 8, Cpu::exec_ldh_c),
        0xEA => Instruction::imm16("LD (n16), A", 16, Cpu::exec_ld_a16_a),
        0xFA => Instruction::imm16("LD A, (n16)", 16, Cpu::exec_ld_a16_a),

        0xE8 => Instruction::imm8("ADD SP, n8", 16, Cpu::exec_add_sp_e8),
        0xF8 => Instruction::imm8("LD HL, SP+n8", 12, Cpu::exec_ld_hl_sp_e8),
        0xF9 => Instruction::implied("LD SP, HL", 8, Cpu::exec_ld_sp_hl),

        0xF3 => Instruction::implied("DI", 4, Cpu::exec_di),
        0xFB => Instruction::implied("EI", 4, Cpu::exec_ei),

        // Opcode holes: D3, DB, DD, E3, E4, EB, EC, ED, F4, FC, FD.
        _ => Instruction::unimplemented(format!("DB 0x{opcode:02X}")),
    }
}
