//! Emulation toolkit for a discrete-logic 8-bit CPU.
//!
//! The CPU's behavior lives entirely in three lookup-table ROMs: two 4-bit
//! ALU slices and a microcoded control sequencer. [`alu`] and [`control`]
//! pre-compute those tables; [`machine`] drives them through a two-phase
//! clock. [`opcode`] is the shared instruction registry and [`lcd`] models
//! the character display wired to I/O port 2.

pub mod alu;
pub mod control;
pub mod lcd;
pub mod machine;
pub mod memory_map;
pub mod opcode;
