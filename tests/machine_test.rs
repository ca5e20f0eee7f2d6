//! End-to-end programs run through the full ROM-driven machine: generated
//! tables, two-phase clock, register-file aliases, stack, I/O and LCD.

use nibbler::machine::{Machine, RunOutcome};
use nibbler::memory_map::*;
use nibbler::opcode as op;
use nibbler::{alu, control};
use std::sync::OnceLock;

fn roms() -> &'static (Vec<u8>, Vec<u8>, Vec<u8>) {
    static ROMS: OnceLock<(Vec<u8>, Vec<u8>, Vec<u8>)> = OnceLock::new();
    ROMS.get_or_init(|| {
        let (alu_low, alu_high) = alu::generate();
        (control::generate(), alu_low, alu_high)
    })
}

/// A machine reset and ready to run, with `program` at the load address.
fn boot(program: &[u8]) -> Machine {
    let (control_rom, alu_low, alu_high) = roms();
    let mut machine =
        Machine::new(control_rom.clone(), alu_low.clone(), alu_high.clone()).unwrap();
    machine.load_program(program).unwrap();
    machine.reset();
    machine
}

fn run_to_halt(machine: &mut Machine) {
    assert_eq!(machine.run(10_000), RunOutcome::Halted);
}

#[test]
fn ld_imm8_lands_in_the_register_file() {
    let mut m = boot(&[op::LD_A_IMM8, 0xAB, op::HALT]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 0xAB);
    assert_eq!(m.state().flags, 0, "a plain load must not touch the flags");
    // Boot jump plus the load retire before the halt step freezes the clock.
    assert_eq!(m.instructions_retired(), 2);
}

#[test]
fn add_register_to_register() {
    let mut m = boot(&[
        op::LD_A_IMM8, 5,
        op::LD_B_IMM8, 3,
        op::ADD_A_B,
        op::HALT,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 8);
    assert_eq!(m.reg_alias(ALIAS_B), 3);
    assert_eq!(m.state().flags, 0); // ZF, CF, OF, SF all clear
}

#[test]
fn inc_wraps_and_sets_zero() {
    let mut m = boot(&[op::LD_A_IMM8, 0xFF, op::INC_A, op::HALT]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 0);
    assert_eq!(m.state().flags, 0b0001, "ZF set, CF preserved clear");
}

#[test]
fn push_pop_round_trip() {
    let mut m = boot(&[
        op::LD_SP_IMM8, 0xFF,
        op::LD_A_IMM8, 0x42,
        op::PUSH_A,
        op::POP_B,
        op::HALT,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_B), 0x42);
    // Pre-increment push put the byte in the top RAM page...
    assert_eq!(m.mem_byte(0xFF00), 0x42);
    // ...and the pop's fused decrement restored the stack pointer.
    assert_eq!(m.reg_alias(ALIAS_SPL), 0xFF);
}

#[test]
fn indexed_stores_with_post_increment() {
    let mut m = boot(&[
        op::LD_I_IMM16, 0x00, 0x92,
        op::LD_A_IMM8, 0x11,
        op::LD_I_PTR_INC_A,
        op::LD_A_IMM8, 0x22,
        op::LD_I_PTR_A,
        op::HALT,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.mem_byte(0x9200), 0x11);
    assert_eq!(m.mem_byte(0x9201), 0x22);
    assert_eq!(m.reg_alias(ALIAS_IL), 0x01);
    assert_eq!(m.reg_alias(ALIAS_IH), 0x92);
}

#[test]
fn taken_conditional_jump() {
    // cmp equal sets ZF; jz skips the halt and loads 0x99.
    let mut m = boot(&[
        op::LD_A_IMM8, 3,
        op::CMP_A_IMM8, 3,
        op::JZ_IMM16, 0x08, 0x90,
        op::HALT,
        op::LD_A_IMM8, 0x99,
        op::HALT,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 0x99);
}

#[test]
fn not_taken_conditional_jump_skips_its_operand() {
    let mut m = boot(&[
        op::LD_A_IMM8, 3,
        op::CMP_A_IMM8, 3,
        op::JNZ_IMM16, 0x08, 0x90,
        op::HALT,
        op::LD_A_IMM8, 0x99,
        op::HALT,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 3);
}

#[test]
fn cmp_borrow_flags() {
    let mut m = boot(&[op::LD_A_IMM8, 2, op::CMP_A_IMM8, 3, op::HALT]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 2, "cmp must not write the register back");
    // 2 - 3 borrows and goes negative: CF and SF, no ZF, no OF.
    assert_eq!(m.state().flags, 0b1010);
}

#[test]
fn carry_chains_through_adc() {
    let mut m = boot(&[
        op::LD_A_IMM8, 0xFF,
        op::ADD_A_IMM8, 0x01, // A = 0, CF = 1
        op::ADC_A_IMM8, 0x00, // A = 1, CF folds in
        op::HALT,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 1);
    assert_eq!(m.state().flags, 0);
}

#[test]
fn register_moves() {
    let mut m = boot(&[op::LD_A_IMM8, 0x31, op::LD_B_A, op::LD_C_B, op::HALT]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_B), 0x31);
    assert_eq!(m.reg_alias(ALIAS_C), 0x31);
}

#[test]
fn jmp_through_an_index_register() {
    let mut m = boot(&[
        op::LD_I_IMM16, 0x05, 0x90,
        op::JMP_I,
        op::HALT,
        op::LD_A_IMM8, 0x44, // 0x9005
        op::HALT,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 0x44);
}

#[test]
fn sixteen_bit_store_and_load_pairs() {
    let mut m = boot(&[
        op::LD_A_IMM8, 0xAA,
        op::LD_B_IMM8, 0xBB,
        op::LD_I_IMM16, 0x00, 0x92,
        op::LD_I_PTR_AB,
        op::LD_A_IMM8, 0x00,
        op::LD_B_IMM8, 0x00,
        op::LD_AB_I_PTR,
        op::HALT,
    ]);
    run_to_halt(&mut m);
    // Low register first in memory.
    assert_eq!(m.mem_byte(0x9200), 0xBB);
    assert_eq!(m.mem_byte(0x9201), 0xAA);
    assert_eq!(m.reg_alias(ALIAS_A), 0xAA);
    assert_eq!(m.reg_alias(ALIAS_B), 0xBB);
}

#[test]
fn call_and_ret() {
    let mut m = boot(&[
        op::LD_SP_IMM8, 0x20,
        op::CALL_IMM16, 0x08, 0x90,
        op::LD_B_IMM8, 0x55, // runs after ret
        op::HALT,
        op::LD_A_IMM8, 0x77, // 0x9008: the subroutine
        op::RET,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 0x77);
    assert_eq!(m.reg_alias(ALIAS_B), 0x55);
    assert_eq!(m.reg_alias(ALIAS_SPL), 0x20, "ret must rewind the stack");
}

#[test]
fn stack_relative_load() {
    let mut m = boot(&[
        op::LD_SP_IMM8, 0x30,
        op::LD_A_IMM8, 0x66,
        op::PUSH_A,
        op::LD_A_IMM8, 0x00,
        op::LD_A_SP_IMM8_PTR, 0x00, // [sp-0]: top of stack
        op::HALT,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 0x66);
}

#[test]
fn out_latches_ports() {
    let mut m = boot(&[
        op::OUT_PORT0_IMM8 + 3, 0x5A,
        op::LD_A_IMM8, 0x77,
        op::OUT_PORT0_A + 4,
        op::HALT,
    ]);
    run_to_halt(&mut m);
    assert_eq!(m.io_port(3), 0x5A);
    assert_eq!(m.io_port(4), 0x77);
}

#[test]
fn in_reads_the_lcd_port() {
    // Idle LCD: not busy, address counter zero.
    let mut m = boot(&[op::IN_A_PORT0 + LCD_PORT, op::HALT]);
    run_to_halt(&mut m);
    assert_eq!(m.reg_alias(ALIAS_A), 0x00);
}

#[test]
#[should_panic(expected = "no reader wired")]
fn reading_an_unwired_port_aborts() {
    let mut m = boot(&[op::IN_A_PORT0 + 5, op::HALT]);
    m.run(100);
}

/// Strobe one byte to the LCD over the 4-bit interface: per nibble, lines
/// set up with E low, E raised, E dropped.
fn emit_lcd_byte(program: &mut Vec<u8>, rs: bool, byte: u8) {
    for nibble in [byte >> 4, byte & 0xF] {
        let lines = ((rs as u8) << 7) | nibble;
        for value in [lines, lines | 0x20, lines] {
            program.push(op::OUT_PORT0_IMM8 + LCD_PORT);
            program.push(value);
        }
    }
}

#[test]
fn lcd_shows_written_text() {
    let mut program = Vec::new();
    emit_lcd_byte(&mut program, false, 0x28); // function set: 4-bit, 2 lines
    emit_lcd_byte(&mut program, false, 0x0C); // display on
    emit_lcd_byte(&mut program, false, 0x01); // clear
    for &ch in b"Hi" {
        emit_lcd_byte(&mut program, true, ch);
    }
    emit_lcd_byte(&mut program, false, 0x80 | 0x40); // second row
    emit_lcd_byte(&mut program, true, b'!');
    program.push(op::HALT);

    let mut m = boot(&program);
    run_to_halt(&mut m);
    assert!(m.lcd.display_on());
    assert_eq!(m.lcd.visible_row(0), "Hi              ");
    assert_eq!(m.lcd.visible_row(1), "!               ");
}

#[test]
fn instruction_cap_stops_a_spinning_program() {
    // jmp back to itself, forever.
    let mut m = boot(&[op::JMP_IMM16, 0x00, 0x90]);
    assert_eq!(m.run(50), RunOutcome::InstructionCap);
    assert_eq!(m.instructions_retired(), 50);
}
