use super::*;
use crate::error::CoreError;
use crate::memory::AddressSpace;

/// CPU at PC=0 with `program` loaded at the start of ROM.
fn setup(program: &[u8]) -> (Cpu, AddressSpace) {
    let mut mem = AddressSpace::new();
    mem.load_cartridge(program).unwrap();
    let mut cpu = Cpu::new();
    cpu.regs.sp = 0xFFFE;
    (cpu, mem)
}

fn step(cpu: &mut Cpu, mem: &mut AddressSpace) -> Executed {
    cpu.step(mem, OpcodeTable::global()).unwrap()
}

fn run(cpu: &mut Cpu, mem: &mut AddressSpace, count: usize) {
    for _ in 0..count {
        step(cpu, mem);
    }
}

#[test]
fn reset_matches_post_boot_state() {
    let mut cpu = Cpu::new();
    cpu.ime = true;
    cpu.reset();

    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.ime);
}

#[test]
fn table_lengths_follow_operation_shape() {
    let table = OpcodeTable::global();
    assert_eq!(table.iter().count(), 256);

    let mut unimplemented = Vec::new();
    for (opcode, instr) in table.iter() {
        let expected = match instr.operation {
            Operation::Implied(_) => 1,
            Operation::Imm8(_) => 2,
            Operation::Imm16(_) => 3,
            Operation::Unimplemented => {
                unimplemented.push(opcode);
                0
            }
        };
        assert_eq!(instr.len, expected, "opcode {opcode:#04x}");
        assert_eq!(instr.is_implemented(), expected != 0);
    }

    assert_eq!(
        unimplemented,
        [0x10, 0x76, 0xCB, 0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD]
    );
}

#[test]
fn branch_descriptors_cost_more_when_taken() {
    for (opcode, instr) in OpcodeTable::global().iter() {
        if let Flow::Branch { taken_cycles } = instr.flow {
            assert!(taken_cycles > instr.cycles, "opcode {opcode:#04x}");
        }
    }
}

#[test]
fn sequential_opcodes_advance_pc_by_their_length() {
    let table = OpcodeTable::global();
    for (opcode, instr) in table.iter() {
        if !instr.is_implemented() || instr.flow != Flow::Sequential {
            continue;
        }

        let mut mem = AddressSpace::new();
        mem.write8(0x0200, opcode);
        let mut cpu = Cpu::new();
        cpu.regs.pc = 0x0200;
        cpu.regs.sp = 0xD000;
        cpu.regs.set_hl(0xC000);

        let executed = cpu.step(&mut mem, table).unwrap();
        assert_eq!(executed.pc, 0x0200);
        assert_eq!(executed.opcode, opcode);
        assert_eq!(executed.cycles, instr.cycles, "opcode {opcode:#04x}");
        assert_eq!(
            cpu.regs.pc,
            0x0200 + instr.len as u16,
            "opcode {opcode:#04x} ({})",
            instr.mnemonic
        );
    }
}

#[test]
fn unimplemented_opcode_leaves_state_untouched() {
    let (mut cpu, mut mem) = setup(&[0xCB, 0x37]);
    cpu.regs.a = 0x12;
    let before = cpu.regs;

    let err = cpu.step(&mut mem, OpcodeTable::global()).unwrap_err();
    assert_eq!(err, CoreError::UnimplementedOpcode { opcode: 0xCB, pc: 0 });
    assert_eq!(cpu.regs, before);
}

#[test]
fn ld_rr_n16_reads_little_endian_operand() {
    let (mut cpu, mut mem) = setup(&[0x01, 0x34, 0x12, 0x31, 0xF0, 0xDF]);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.bc(), 0x1234);
    assert_eq!(cpu.regs.pc, 3);
    assert_eq!(executed.cycles, 12);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.sp, 0xDFF0);
    assert_eq!(cpu.regs.pc, 6);
}

#[test]
fn inc_then_dec_restores_every_register() {
    for y in 0..8u8 {
        let inc = 0x04 | (y << 3);
        let dec = 0x05 | (y << 3);
        let (mut cpu, mut mem) = setup(&[inc, dec]);
        cpu.regs.set_hl(0xC000);
        // Any value works; 0x3F crosses the low nibble on INC.
        cpu.write_reg8(&mut mem, y, 0x3F);
        let hl = cpu.regs.hl();

        step(&mut cpu, &mut mem);
        assert_eq!(cpu.read_reg8(&mem, y), 0x40, "INC {y}");
        assert!(cpu.regs.is_flag_set(Flags::HALF_CARRY));

        step(&mut cpu, &mut mem);
        assert_eq!(cpu.read_reg8(&mem, y), 0x3F, "DEC {y}");
        assert_eq!(cpu.regs.hl(), hl);
        assert_eq!(cpu.regs.pc, 2);
    }
}

#[test]
fn inc_dec_wrap_and_keep_carry() {
    let (mut cpu, mut mem) = setup(&[0x04, 0x05]);
    cpu.regs.b = 0xFF;
    cpu.regs.f = Flags::CARRY;

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.b, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.b, 0xFF);
    assert_eq!(cpu.regs.f, Flags::NEGATIVE | Flags::HALF_CARRY | Flags::CARRY);
}

#[test]
fn inc_hl_indirect_updates_memory() {
    let (mut cpu, mut mem) = setup(&[0x34]);
    cpu.regs.set_hl(0xC123);
    mem.write8(0xC123, 0x0F);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(mem.read8(0xC123), 0x10);
    assert_eq!(executed.cycles, 12);
}

#[test]
fn wide_inc_dec_wrap_without_touching_flags() {
    let (mut cpu, mut mem) = setup(&[0x03, 0x1B]);
    cpu.regs.set_bc(0xFFFF);
    cpu.regs.set_de(0x0000);
    cpu.regs.f = Flags::ZERO | Flags::CARRY;

    run(&mut cpu, &mut mem, 2);
    assert_eq!(cpu.regs.bc(), 0x0000);
    assert_eq!(cpu.regs.de(), 0xFFFF);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);
}

#[test]
fn push_then_pop_round_trips_through_the_stack() {
    let (mut cpu, mut mem) = setup(&[0xC5, 0xD1]);
    cpu.regs.set_bc(0x1234);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(executed.cycles, 16);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(mem.read8(0xFFFC), 0x34);
    assert_eq!(mem.read8(0xFFFD), 0x12);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(executed.cycles, 12);
    assert_eq!(cpu.regs.de(), 0x1234);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn pop_af_clears_low_nibble_of_f() {
    let (mut cpu, mut mem) = setup(&[0xF1]);
    cpu.regs.sp = 0xC000;
    mem.write16(0xC000, 0x12FF);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f.bits(), 0xF0);
    assert_eq!(cpu.regs.af(), 0x12F0);
}

#[test]
fn add_and_adc_set_flags() {
    // LD A,0x3A ; ADD A,0xC6
    let (mut cpu, mut mem) = setup(&[0x3E, 0x3A, 0xC6, 0xC6]);
    run(&mut cpu, &mut mem, 2);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY);

    // ADC A,B with carry in
    let (mut cpu, mut mem) = setup(&[0x88]);
    cpu.regs.a = 0xE1;
    cpu.regs.b = 0x0F;
    cpu.regs.f = Flags::CARRY;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0xF1);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY);
}

#[test]
fn sub_and_sbc_set_flags() {
    let (mut cpu, mut mem) = setup(&[0x90]);
    cpu.regs.a = 0x3E;
    cpu.regs.b = 0x3E;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::NEGATIVE);

    // SBC A,0x2A with carry in
    let (mut cpu, mut mem) = setup(&[0xDE, 0x2A]);
    cpu.regs.a = 0x3B;
    cpu.regs.f = Flags::CARRY;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x10);
    assert_eq!(cpu.regs.f, Flags::NEGATIVE);

    let (mut cpu, mut mem) = setup(&[0x96]);
    cpu.regs.a = 0x10;
    cpu.regs.set_hl(0xC000);
    mem.write8(0xC000, 0x20);
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0xF0);
    assert_eq!(cpu.regs.f, Flags::NEGATIVE | Flags::CARRY);
    assert_eq!(executed.cycles, 8);
}

#[test]
fn cp_sets_flags_without_changing_a() {
    let cases = [
        (0x2F, Flags::NEGATIVE | Flags::HALF_CARRY),
        (0x3C, Flags::ZERO | Flags::NEGATIVE),
        (0x40, Flags::NEGATIVE | Flags::CARRY),
    ];
    for (value, flags) in cases {
        let (mut cpu, mut mem) = setup(&[0xFE, value]);
        cpu.regs.a = 0x3C;
        step(&mut cpu, &mut mem);
        assert_eq!(cpu.regs.a, 0x3C);
        assert_eq!(cpu.regs.f, flags, "CP {value:#04x}");
        assert_eq!(cpu.regs.pc, 2);
    }
}

#[test]
fn cp_register_operand() {
    let (mut cpu, mut mem) = setup(&[0xB8, 0xB8]);
    cpu.regs.a = 0x10;
    cpu.regs.b = 0x10;
    step(&mut cpu, &mut mem);
    assert!(cpu.regs.is_flag_set(Flags::ZERO));
    assert!(!cpu.regs.is_flag_set(Flags::CARRY));

    cpu.regs.a = 0x05;
    step(&mut cpu, &mut mem);
    assert!(!cpu.regs.is_flag_set(Flags::ZERO));
    assert!(cpu.regs.is_flag_set(Flags::CARRY));
}

#[test]
fn dec_then_inc_wraps_back() {
    let (mut cpu, mut mem) = setup(&[0x1D, 0x1C]);
    cpu.regs.e = 0x00;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.e, 0xFF);
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.e, 0x00);
    assert!(cpu.regs.is_flag_set(Flags::ZERO));
}

#[test]
fn logic_ops_set_flags() {
    let (mut cpu, mut mem) = setup(&[0xE6, 0x3F]);
    cpu.regs.a = 0x5A;
    cpu.regs.f = Flags::CARRY;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x1A);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY);

    let (mut cpu, mut mem) = setup(&[0xAF]);
    cpu.regs.a = 0x5A;
    cpu.regs.f = Flags::all();
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO);

    let (mut cpu, mut mem) = setup(&[0xB1]);
    cpu.regs.a = 0x50;
    cpu.regs.c = 0x0A;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x5A);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn daa_adjusts_after_addition() {
    let (mut cpu, mut mem) = setup(&[0x27]);
    cpu.regs.a = 0x0F;
    cpu.regs.f = Flags::HALF_CARRY;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x15);
    assert!(!cpu.regs.is_flag_set(Flags::HALF_CARRY));

    // LD A,0x09 ; ADD A,0x08 ; DAA
    let (mut cpu, mut mem) = setup(&[0x3E, 0x09, 0xC6, 0x08, 0x27]);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.regs.a, 0x17);
    assert_eq!(cpu.regs.f, Flags::empty());

    // 0x99 + 0x01 = 100 in BCD
    let (mut cpu, mut mem) = setup(&[0x3E, 0x99, 0xC6, 0x01, 0x27]);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);
}

#[test]
fn daa_adjusts_after_subtraction() {
    // LD A,0x10 ; SUB 0x01 ; DAA
    let (mut cpu, mut mem) = setup(&[0x3E, 0x10, 0xD6, 0x01, 0x27]);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.regs.a, 0x09);
    assert_eq!(cpu.regs.f, Flags::NEGATIVE);
}

#[test]
fn accumulator_rotates_clear_zero() {
    let (mut cpu, mut mem) = setup(&[0x07]);
    cpu.regs.a = 0x85;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x0B);
    assert_eq!(cpu.regs.f, Flags::CARRY);

    let (mut cpu, mut mem) = setup(&[0x1F]);
    cpu.regs.a = 0x01;
    cpu.regs.f = Flags::CARRY;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x80);
    assert_eq!(cpu.regs.f, Flags::CARRY);

    let (mut cpu, mut mem) = setup(&[0x17]);
    cpu.regs.a = 0x80;
    cpu.regs.f = Flags::ZERO;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::CARRY);

    let (mut cpu, mut mem) = setup(&[0x0F]);
    cpu.regs.a = 0x02;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x01);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn cpl_scf_ccf() {
    let (mut cpu, mut mem) = setup(&[0x2F, 0x37, 0x3F]);
    cpu.regs.a = 0x35;
    cpu.regs.f = Flags::ZERO;

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0xCA);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::NEGATIVE | Flags::HALF_CARRY);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.f, Flags::ZERO);
}

#[test]
fn add_hl_rr_keeps_zero() {
    let (mut cpu, mut mem) = setup(&[0x09, 0x29]);
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_bc(0x0001);
    cpu.regs.f = Flags::ZERO | Flags::NEGATIVE;

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::HALF_CARRY);

    cpu.regs.set_hl(0x8000);
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);
}

#[test]
fn ld_r_r_moves_between_registers_and_hl() {
    // LD HL,0xC000 ; LD A,0x42 ; LD (HL),A ; LD B,(HL) ; LD C,B
    let (mut cpu, mut mem) = setup(&[0x21, 0x00, 0xC0, 0x3E, 0x42, 0x77, 0x46, 0x48]);
    run(&mut cpu, &mut mem, 2);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(mem.read8(0xC000), 0x42);
    assert_eq!(executed.cycles, 8);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.b, 0x42);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.c, 0x42);
    assert_eq!(executed.cycles, 4);
    assert_eq!(cpu.regs.pc, 8);
}

#[test]
fn hl_increment_and_decrement_forms() {
    // LD HL,0xC000 ; LD A,0x07 ; LD (HL+),A ; LD A,(HL-)
    let (mut cpu, mut mem) = setup(&[0x21, 0x00, 0xC0, 0x3E, 0x07, 0x22, 0x3A]);
    mem.write8(0xC001, 0x99);
    run(&mut cpu, &mut mem, 3);
    assert_eq!(mem.read8(0xC000), 0x07);
    assert_eq!(cpu.regs.hl(), 0xC001);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x99);
    assert_eq!(cpu.regs.hl(), 0xC000);
}

#[test]
fn indirect_bc_de_loads_and_stores() {
    let (mut cpu, mut mem) = setup(&[0x02, 0x1A]);
    cpu.regs.a = 0x5C;
    cpu.regs.set_bc(0xC010);
    cpu.regs.set_de(0xC020);
    mem.write8(0xC020, 0xA7);

    step(&mut cpu, &mut mem);
    assert_eq!(mem.read8(0xC010), 0x5C);
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0xA7);
}

#[test]
fn high_page_loads() {
    // LDH (0x80),A ; LD (C),A ; LDH A,(0x81)
    let (mut cpu, mut mem) = setup(&[0xE0, 0x80, 0xE2, 0xF0, 0x81]);
    cpu.regs.a = 0x42;
    cpu.regs.c = 0x10;
    mem.write8(0xFF81, 0x24);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(mem.read8(0xFF80), 0x42);
    assert_eq!(executed.cycles, 12);

    step(&mut cpu, &mut mem);
    assert_eq!(mem.read8(0xFF10), 0x42);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x24);
    assert_eq!(cpu.regs.pc, 5);
}

#[test]
fn absolute_loads_and_sp_store() {
    // LD (0xC000),SP ; LD (0xC010),A ; LD A,(0xC020)
    let (mut cpu, mut mem) = setup(&[0x08, 0x00, 0xC0, 0xEA, 0x10, 0xC0, 0xFA, 0x20, 0xC0]);
    cpu.regs.sp = 0xBEEF;
    cpu.regs.a = 0x11;
    mem.write8(0xC020, 0x22);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(mem.read8(0xC000), 0xEF);
    assert_eq!(mem.read8(0xC001), 0xBE);
    assert_eq!(executed.cycles, 20);

    step(&mut cpu, &mut mem);
    assert_eq!(mem.read8(0xC010), 0x11);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.a, 0x22);
}

#[test]
fn signed_sp_offsets() {
    let (mut cpu, mut mem) = setup(&[0xE8, 0x08]);
    cpu.regs.sp = 0xFFF8;
    cpu.regs.f = Flags::ZERO | Flags::NEGATIVE;
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.sp, 0x0000);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY | Flags::CARRY);
    assert_eq!(executed.cycles, 16);

    let (mut cpu, mut mem) = setup(&[0xF8, 0xFF, 0xF9]);
    cpu.regs.sp = 0x0000;
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.hl(), 0xFFFF);
    assert_eq!(cpu.regs.sp, 0x0000);
    assert_eq!(cpu.regs.f, Flags::empty());

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.sp, 0xFFFF);
}

#[test]
fn jr_uses_signed_displacement() {
    let mut mem = AddressSpace::new();
    // 0x0100: JR +5 ; 0x0107: JR -9
    mem.write8(0x0100, 0x18);
    mem.write8(0x0101, 0x05);
    mem.write8(0x0107, 0x18);
    mem.write8(0x0108, 0xF7);
    let mut cpu = Cpu::new();
    cpu.regs.pc = 0x0100;

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0107);
    assert_eq!(executed.cycles, 12);

    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0100);
}

#[test]
fn jr_to_itself_loops() {
    let (mut cpu, mut mem) = setup(&[0x00, 0x18, 0xFE]);
    run(&mut cpu, &mut mem, 2);
    assert_eq!(cpu.regs.pc, 0x0001);
    step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0001);
}

#[test]
fn conditional_jr_charges_taken_cost() {
    let (mut cpu, mut mem) = setup(&[0x28, 0x10]);
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0002);
    assert_eq!(executed.cycles, 8);

    let (mut cpu, mut mem) = setup(&[0x28, 0x10]);
    cpu.regs.f = Flags::ZERO;
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0012);
    assert_eq!(executed.cycles, 12);
}

#[test]
fn jp_forms() {
    let (mut cpu, mut mem) = setup(&[0xC3, 0x50, 0x01]);
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0150);
    assert_eq!(executed.cycles, 16);

    let (mut cpu, mut mem) = setup(&[0xDA, 0x50, 0x01]);
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0003);
    assert_eq!(executed.cycles, 12);

    let (mut cpu, mut mem) = setup(&[0xDA, 0x50, 0x01]);
    cpu.regs.f = Flags::CARRY;
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0150);
    assert_eq!(executed.cycles, 16);

    let (mut cpu, mut mem) = setup(&[0xE9]);
    cpu.regs.set_hl(0x4000);
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x4000);
    assert_eq!(executed.cycles, 4);
}

#[test]
fn call_and_ret_use_address_after_call() {
    let mut program = vec![0u8; 0x0201];
    program[..3].copy_from_slice(&[0xCD, 0x00, 0x02]);
    program[0x0200] = 0xC9;
    let (mut cpu, mut mem) = setup(&program);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(mem.read16(0xFFFC), 0x0003);
    assert_eq!(executed.cycles, 24);

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0003);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(executed.cycles, 16);
}

#[test]
fn conditional_ret_costs() {
    let (mut cpu, mut mem) = setup(&[0xC0]);
    cpu.regs.f = Flags::ZERO;
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0001);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(executed.cycles, 8);

    let (mut cpu, mut mem) = setup(&[0xC0]);
    cpu.regs.sp = 0xC000;
    mem.write16(0xC000, 0x1234);
    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.regs.sp, 0xC002);
    assert_eq!(executed.cycles, 20);
}

#[test]
fn rst_pushes_return_address() {
    let mut mem = AddressSpace::new();
    mem.write8(0x0150, 0xEF);
    let mut cpu = Cpu::new();
    cpu.regs.pc = 0x0150;
    cpu.regs.sp = 0xFFFE;

    let executed = step(&mut cpu, &mut mem);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(mem.read16(0xFFFC), 0x0151);
    assert_eq!(executed.cycles, 16);
}

#[test]
fn interrupt_master_enable_switches() {
    let (mut cpu, mut mem) = setup(&[0xFB, 0xF3, 0xD9]);
    step(&mut cpu, &mut mem);
    assert!(cpu.ime);
    step(&mut cpu, &mut mem);
    assert!(!cpu.ime);

    mem.write16(0xFFFC, 0x0040);
    cpu.regs.sp = 0xFFFC;
    let executed = step(&mut cpu, &mut mem);
    assert!(cpu.ime);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(executed.cycles, 16);
}
