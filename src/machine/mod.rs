//! The cycle-accurate emulator: ROM tables driven through a two-phase
//! clock.
//!
//! A [`Machine`] owns everything the board owns -- the three lookup-table
//! ROMs, program ROM, RAM, the I/O port latches and the LCD -- plus the
//! [`State`] snapshot. All of it mutates only through the half-tick
//! functions in `tick.rs`; loaders run before the clock starts.

mod signals;
mod state;
mod tick;

pub use signals::{AluWord, ControlWord};
pub use state::State;

use crate::lcd::Lcd;
use crate::memory_map::*;
use crate::opcode;
use std::fs;
use std::path::Path;

/// Why [`Machine::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The HALT line froze the clock (explicit halt or an undefined
    /// opcode's trap).
    Halted,
    /// The instruction budget ran out first.
    InstructionCap,
}

pub struct Machine {
    control_rom: Vec<u8>,
    alu_low_rom: Vec<u8>,
    alu_high_rom: Vec<u8>,

    rom: Box<[u8; ROM_SIZE]>,
    ram: Box<[u8; RAM_SIZE]>,
    io_ports: [u8; IO_PORT_COUNT],
    pub lcd: Lcd,

    state: State,
    instructions_retired: u64,
}

impl Machine {
    /// Build a machine from in-memory ROM tables. Sizes are checked here so
    /// everything after load time can index without bounds worries.
    pub fn new(
        control_rom: Vec<u8>,
        alu_low_rom: Vec<u8>,
        alu_high_rom: Vec<u8>,
    ) -> Result<Machine, String> {
        check_rom_size("control", &control_rom, CONTROL_ROM_SIZE)?;
        check_rom_size("alu_low", &alu_low_rom, ALU_ROM_SIZE)?;
        check_rom_size("alu_high", &alu_high_rom, ALU_ROM_SIZE)?;

        let mut rom = Box::new([0u8; ROM_SIZE]);
        // The only thing the boot ROM does is jump into RAM where the
        // program image lives.
        rom[0] = opcode::JMP_IMM16;
        rom[1] = (PROGRAM_START & 0xFF) as u8;
        rom[2] = (PROGRAM_START >> 8) as u8;

        Ok(Machine {
            control_rom,
            alu_low_rom,
            alu_high_rom,
            rom,
            ram: Box::new([0u8; RAM_SIZE]),
            io_ports: [0; IO_PORT_COUNT],
            lcd: Lcd::new(),
            state: State::reset(),
            instructions_retired: 0,
        })
    }

    /// Build a machine from the three ROM files the generators write.
    pub fn from_rom_files(
        control: &Path,
        alu_low: &Path,
        alu_high: &Path,
    ) -> Result<Machine, String> {
        Machine::new(
            read_rom_file(control, CONTROL_ROM_SIZE)?,
            read_rom_file(alu_low, ALU_ROM_SIZE)?,
            read_rom_file(alu_high, ALU_ROM_SIZE)?,
        )
    }

    /// Copy a program image to its fixed spot in RAM.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), String> {
        if image.len() > MAX_PROGRAM_SIZE {
            return Err(format!(
                "program is {} bytes, the limit is {} ({} KiB RAM minus the {:#06x} offset)",
                image.len(),
                MAX_PROGRAM_SIZE,
                RAM_SIZE / 1024,
                PROGRAM_OFFSET
            ));
        }
        self.ram[PROGRAM_OFFSET as usize..PROGRAM_OFFSET as usize + image.len()]
            .copy_from_slice(image);
        log::debug!("program image loaded: {} bytes at {:#06x}", image.len(), PROGRAM_START);
        Ok(())
    }

    /// Reset the sequencer and prime it: one SETUP tick with S=0xF rolls
    /// the counter to 0 and starts the boot fetch. RAM and I/O latches are
    /// deliberately left alone, as on the board.
    pub fn reset(&mut self) {
        self.state = State::reset();
        self.instructions_retired = 0;
        self.force_half_tick();
    }

    /// Free-run until the machine halts or `max_instructions` have retired.
    pub fn run(&mut self, max_instructions: u64) -> RunOutcome {
        loop {
            if !self.half_tick() {
                return RunOutcome::Halted;
            }
            if self.state.exec_phase && self.instructions_retired >= max_instructions {
                return RunOutcome::InstructionCap;
            }
        }
    }

    // --- Read-only views ---

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn instructions_retired(&self) -> u64 {
        self.instructions_retired
    }

    pub fn io_port(&self, port: u8) -> u8 {
        self.io_ports[(port & 7) as usize]
    }

    /// A byte as the CPU would read it: bit 15 selects RAM over ROM.
    pub fn mem_byte(&self, addr: u16) -> u8 {
        let offset = (addr & MEM_OFFSET_MASK) as usize;
        if addr & 0x8000 != 0 {
            self.ram[offset]
        } else {
            self.rom[offset]
        }
    }

    /// One of the sixteen register-file bytes in the top RAM page.
    pub fn reg_alias(&self, alias: u8) -> u8 {
        self.mem_byte(REG_FILE_BASE | (alias & 0xF) as u16)
    }
}

fn check_rom_size(name: &str, data: &[u8], expected: usize) -> Result<(), String> {
    if data.len() != expected {
        return Err(format!(
            "{name} table is {} bytes, expected {expected}",
            data.len()
        ));
    }
    Ok(())
}

fn read_rom_file(path: &Path, expected: usize) -> Result<Vec<u8>, String> {
    let data =
        fs::read(path).map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
    if data.len() != expected {
        return Err(format!(
            "'{}' is {} bytes, expected {expected}",
            path.display(),
            data.len()
        ));
    }
    Ok(data)
}
