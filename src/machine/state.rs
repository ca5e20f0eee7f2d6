//! The register/bus snapshot the half-tick function advances.

use super::signals::{AluWord, ControlWord};

/// Every latch and bus in the CPU, after some half-cycle. Plain data: the
/// dashboard reads it, the half-tick function is the only writer.
#[derive(Clone, Copy, Debug)]
pub struct State {
    /// Clock phase: false = SETUP, true = EXEC.
    pub exec_phase: bool,

    /// Step counter S (4 bits).
    pub step: u8,
    /// Opcode latch O.
    pub opcode: u8,
    /// Flag register F (4 bits: ZF, CF, OF, SF).
    pub flags: u8,
    /// ALU operand latches.
    pub ls: u8,
    pub rs: u8,
    /// Control latch C: bit 7 pulled high, bit 6 the ALU's IO-OE verdict,
    /// bits 5..0 the value the sequencer presented.
    pub c: u8,
    /// Memory address pair, also the program counter.
    pub ml: u8,
    pub mh: u8,
    /// Address mux select: false drives ML/MH, true drives the register
    /// file page indexed by the low nibble of C.
    pub sel_reg_file: bool,

    /// The control word of the step in flight.
    pub control_word: ControlWord,
    /// The last settled ALU output.
    pub alu_word: AluWord,

    pub address_bus: u16,
    pub data_bus: u8,
}

impl State {
    /// Power-on state: S parked at 0xF with EXEC "just finished", so the
    /// first SETUP tick rolls the counter to 0 and begins the first fetch.
    pub fn reset() -> State {
        State {
            exec_phase: true,
            step: 0xF,
            opcode: 0,
            flags: 0,
            ls: 0,
            rs: 0,
            c: 0,
            ml: 0,
            mh: 0,
            sel_reg_file: false,
            control_word: ControlWord(0),
            alu_word: AluWord(0),
            address_bus: 0,
            data_bus: 0,
        }
    }

    /// The clock-freeze line, decoded from the current control word.
    pub fn halted(&self) -> bool {
        self.control_word.halt()
    }

    /// C[6]: the latched IO output-enable, which makes the selected port
    /// drive the data bus.
    pub fn c_oe_io(&self) -> bool {
        self.c & 0x40 != 0
    }
}
