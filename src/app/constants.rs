// --- Clocking ---
pub const DEFAULT_CLOCK_HZ: u64 = 20;
pub const MIN_CLOCK_HZ: u64 = 1;
pub const MAX_CLOCK_HZ: u64 = 16_000_000;

// --- Run limits ---
// The emulator exits cleanly once this many instructions have retired, so a
// runaway program cannot wedge a scripted run.
pub const INSTRUCTION_CAP: u64 = 1_000_000;

// --- ROM table locations (as written by the generator binaries) ---
pub const CONTROL_ROM_PATH: &str = "bin/control.bin";
pub const ALU_LOW_ROM_PATH: &str = "bin/alu_low.bin";
pub const ALU_HIGH_ROM_PATH: &str = "bin/alu_high.bin";
