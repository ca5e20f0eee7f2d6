//! The two-phase half-cycle: everything the clock edges do.
//!
//! SETUP consumes the *previous* step's control word for the counter and
//! latch updates (those latches clock on the edge that ends a step), then
//! looks up the new step's word and resolves the data bus. EXEC performs
//! the loads the new word requests. The ALU word is re-settled every time
//! one of its inputs (C, LS, RS, or the carry flag) changes.

use super::Machine;
use super::signals::AluWord;
use crate::alu;
use crate::control::{self, Flags};
use crate::memory_map::*;

impl Machine {
    /// Advance one half-cycle. Returns false without touching anything when
    /// the HALT line has frozen the clock.
    pub fn half_tick(&mut self) -> bool {
        if self.state.control_word.halt() {
            return false;
        }
        self.force_half_tick();
        true
    }

    /// One half-cycle regardless of HALT: the manual clock pulse used to
    /// single-step a halted machine.
    pub fn force_half_tick(&mut self) {
        self.state.exec_phase = !self.state.exec_phase;
        if self.state.exec_phase {
            self.exec_phase();
        } else {
            self.setup_phase();
        }
    }

    fn setup_phase(&mut self) {
        let cw = self.state.control_word; // the step that just ended

        // Count S; a pending reset wins over the increment.
        self.state.step = (self.state.step + 1) & 0xF;
        if cw.ld_s() {
            self.state.step = 0;
        }

        // Latch C: the word's low six bits, the ALU's IO-OE verdict in
        // bit 6, bit 7 pulled high.
        if cw.ld_c() {
            self.state.c =
                0x80 | (self.state.alu_word.io_oe() as u8) << 6 | cw.c_value();
            self.settle_alu();
        }

        // Count ML/MH as one 16-bit counter. Counting is parked while C is
        // latching or ML is loading; the carry into MH is likewise blocked
        // while MH loads (push leans on this to split the pair).
        if !cw.ld_c() && cw.c0_or_ce_m() && !cw.ld_ml() {
            self.state.ml = self.state.ml.wrapping_add(1);
            if self.state.ml == 0 && !cw.ld_mh() {
                self.state.mh = self.state.mh.wrapping_add(1);
            }
        }

        if cw.ld_ml() {
            self.state.ml = self.state.data_bus;
        }
        if cw.ld_mh() {
            self.state.mh = self.state.data_bus;
        }
        if cw.tg_m_c() {
            self.state.sel_reg_file = !self.state.sel_reg_file;
        }

        // The new step's word. Looked up only after every latch above so a
        // register-file access already sees the freshly latched C.
        self.state.control_word = self.lookup_control();

        self.state.address_bus = if self.state.sel_reg_file {
            REG_FILE_BASE | (self.state.c & 0xF) as u16
        } else {
            (self.state.mh as u16) << 8 | self.state.ml as u16
        };

        self.drive_bus();
    }

    fn exec_phase(&mut self) {
        let cw = self.state.control_word;

        // F and LS latch on the same edge. F captures the flags of the byte
        // the ALU is driving -- computed from the operands as they were --
        // before LS takes its new value below.
        if cw.oe_alu() && cw.ld_ls() {
            self.state.flags = self.state.alu_word.flags().to_nibble();
            self.settle_alu();
        }

        if cw.ld_o() {
            self.state.opcode = self.state.data_bus;
        }
        if cw.ld_rs() {
            self.state.rs = self.state.data_bus;
            self.settle_alu();
        }
        if cw.ld_ls() {
            self.state.ls = self.state.data_bus;
            self.settle_alu();
        }

        // RAM write; ROM ignores the strobe.
        if cw.ld_mem(true) && self.state.address_bus & 0x8000 != 0 {
            self.ram[(self.state.address_bus & MEM_OFFSET_MASK) as usize] =
                self.state.data_bus;
        }

        if cw.ld_io() {
            let port = self.state.opcode & 7;
            self.io_ports[port as usize] = self.state.data_bus;
            if port == LCD_PORT {
                self.lcd.port_write(self.state.data_bus);
            }
        }

        self.lcd.tick();

        // A step that resets the counter is the end of an instruction.
        if cw.ld_s() {
            self.instructions_retired += 1;
        }
    }

    fn lookup_control(&self) -> super::ControlWord {
        let flags = Flags::from_nibble(self.state.flags);
        let low =
            self.control_rom[control::rom_address(self.state.opcode, self.state.step, flags, false)];
        let high =
            self.control_rom[control::rom_address(self.state.opcode, self.state.step, flags, true)];
        super::ControlWord((high as u16) << 8 | low as u16)
    }

    /// Resolve who drives the data bus this half-cycle. Exactly one source
    /// may; none at all leaves the pulled-up idle value.
    fn drive_bus(&mut self) {
        let cw = self.state.control_word;
        let mut drivers = 0u32;
        let mut value = None;

        if cw.oe_ml() {
            value = Some(self.state.ml);
            drivers += 1;
        }
        if cw.oe_mh() {
            value = Some(self.state.mh);
            drivers += 1;
        }
        if cw.oe_alu() {
            value = Some(self.state.alu_word.q());
            drivers += 1;
        }
        if cw.oe_mem() {
            value = Some(self.mem_byte(self.state.address_bus));
            drivers += 1;
        }
        if self.state.c_oe_io() {
            value = Some(self.read_io());
            drivers += 1;
        }

        assert!(
            drivers <= 1,
            "{drivers} devices driving the data bus at once (opcode 0x{:02X} step {})",
            self.state.opcode,
            self.state.step
        );

        self.state.data_bus = value.unwrap_or(0xFF); // bus is pulled up
    }

    fn read_io(&self) -> u8 {
        let port = self.state.opcode & 7;
        match port {
            LCD_PORT => self.lcd.port_read(),
            _ => panic!("read from I/O port {port}, which has no reader wired"),
        }
    }

    fn settle_alu(&mut self) {
        let carry_in = Flags::from_nibble(self.state.flags).carry;
        let op = self.state.c & 0x3F;
        match alu::settle(
            &self.alu_low_rom,
            &self.alu_high_rom,
            self.state.ls,
            self.state.rs,
            carry_in,
            op,
            self.state.alu_word.0,
        ) {
            Some(word) => self.state.alu_word = AluWord(word),
            None => panic!(
                "ALU failed to settle (op 0x{op:02X}, ls 0x{:02X}, rs 0x{:02X}, opcode 0x{:02X})",
                self.state.ls, self.state.rs, self.state.opcode
            ),
        }
    }
}
