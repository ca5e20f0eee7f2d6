//! Terminal panel showing every register, signal and port after each
//! half-cycle. Pure printing glue over the machine's state snapshot.

use nibbler::lcd::VISIBLE_ROWS;
use nibbler::machine::Machine;
use std::fmt::Write as _;
use std::io::{self, Write as _};

/// Repaint the whole panel. Buffered into one write so the terminal never
/// shows a half-drawn frame.
pub fn print_state(machine: &Machine) {
    let s = machine.state();
    let cw = s.control_word;
    let aw = s.alu_word;

    let mut out = String::with_capacity(1024);

    // Clear viewport and scrollback, cursor home. The order matters on some
    // terminals.
    out.push_str("\x1b[2J\x1b[3J\x1b[H");

    let _ = writeln!(
        out,
        "CLK   S   O   F   LS   RS   C   ML   MH (ic: {})",
        machine.instructions_retired()
    );
    let _ = writeln!(
        out,
        "  {}{:4}{:4x}{:4x}{:5x}{:5x}{:4x}{:5x}{:5x}\n",
        s.exec_phase as u8, s.step, s.opcode, s.flags, s.ls, s.rs, s.c, s.ml, s.mh
    );

    let _ = writeln!(out, "ZF   CF   OF   SF   SEL ~M/C   ~HALT");
    let _ = writeln!(
        out,
        "{:2}{:5}{:5}{:5}{:11}{:8}\n",
        b(s.flags & 0x1 != 0),
        b(s.flags & 0x2 != 0),
        b(s.flags & 0x4 != 0),
        b(s.flags & 0x8 != 0),
        b(s.sel_reg_file),
        b(!cw.halt())
    );

    let _ = writeln!(out, "ALU Q ZF   ALU Q CF   ALU Q OF   ALU Q SF   ALU Q IO OE   ALU Q");
    let _ = writeln!(
        out,
        "{:8}{:11}{:11}{:11}{:11}{:11x}\n",
        b(aw.zf()),
        b(aw.cf()),
        b(aw.of()),
        b(aw.sf()),
        b(aw.io_oe()),
        aw.q()
    );

    let _ = writeln!(out, "C0/CE M   C1/LD O   C2/LD S   C3/LD RS");
    let _ = writeln!(
        out,
        "{:7}{:10}{:10}{:11}\n",
        b(cw.c0_or_ce_m()),
        b(cw.c1_or_ld_o()),
        b(cw.c2_or_ld_s()),
        b(cw.c3_or_ld_rs())
    );

    let _ = writeln!(out, "C4/LD IO   C5 LS ALU Q/HALT C   C3..0   C5..0");
    let _ = writeln!(
        out,
        "{:8}{:21}{:8x}{:8x}\n",
        b(cw.c4_or_ld_io()),
        b(cw.c5_or_halt()),
        cw.c_value() & 0xF,
        cw.c_value()
    );

    let _ = writeln!(out, "~LD C   TOGGLE ~M/C   LD MEM   ~LD LS   ~LD ML   ~LD MH");
    let _ = writeln!(
        out,
        "{:5}{:14}{:9}{:9}{:9}{:9}\n",
        b(cw.ld_c_n()),
        b(cw.tg_m_c()),
        b(cw.ld_mem_level()),
        b(cw.ld_ls_n()),
        b(cw.ld_ml_n()),
        b(cw.ld_mh_n())
    );

    let _ = writeln!(out, "C ~LD MEM   ~LD O   ~LD S   ~LD RS   ~LD IO");
    let _ = writeln!(
        out,
        "{:9}{:8}{:8}{:9}{:9}\n",
        b(!cw.ld_mem(s.exec_phase)),
        b(!cw.ld_o()),
        b(!cw.ld_s()),
        b(!cw.ld_rs()),
        b(!cw.ld_io())
    );

    let _ = writeln!(out, "~OE ML   ~OE MH   ~OE ALU   ~OE MEM   OE IO");
    let _ = writeln!(
        out,
        "{:6}{:9}{:10}{:10}{:8}\n",
        b(cw.oe_ml_n()),
        b(cw.oe_mh_n()),
        b(cw.oe_alu_n()),
        b(cw.oe_mem_n()),
        b(s.c_oe_io())
    );

    let _ = writeln!(out, "IO PORT 0   IO PORT 1   IO PORT 2   IO PORT 3");
    let _ = writeln!(
        out,
        "{:9x}{:12x}{:12x}{:12x}\n",
        machine.io_port(0),
        machine.io_port(1),
        machine.io_port(2),
        machine.io_port(3)
    );

    let _ = writeln!(out, "IO PORT 4   IO PORT 5   IO PORT 6   IO PORT 7");
    let _ = writeln!(
        out,
        "{:9x}{:12x}{:12x}{:12x}\n",
        machine.io_port(4),
        machine.io_port(5),
        machine.io_port(6),
        machine.io_port(7)
    );

    let _ = writeln!(
        out,
        "LCD {}",
        if machine.lcd.display_on() { "(on)" } else { "(off)" }
    );
    for row in 0..VISIBLE_ROWS {
        let _ = writeln!(out, "|{}|", machine.lcd.visible_row(row));
    }

    let mut stdout = io::stdout();
    let _ = stdout.write_all(out.as_bytes());
    let _ = stdout.flush();
}

fn b(level: bool) -> u8 {
    level as u8
}
