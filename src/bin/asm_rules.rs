//! Emit a customasm `#ruledef` grammar for the instruction set, derived
//! from the opcode registry so the assembler can never drift from the
//! control ROM.

use nibbler::opcode::{self, Operand};
use std::fs::File;
use std::io::{self, BufWriter, Write};

const OUTPUT: &str = "nibbler_instructions.asm";

fn main() -> Result<(), String> {
    let file =
        File::create(OUTPUT).map_err(|e| format!("failed to create {OUTPUT}: {e}"))?;
    let mut out = BufWriter::new(file);
    write_rules(&mut out).map_err(|e| format!("failed to write {OUTPUT}: {e}"))?;
    println!("wrote {OUTPUT}");
    Ok(())
}

fn write_rules(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "; Generated from the opcode registry -- do not edit")?;
    writeln!(out)?;
    writeln!(out, "#bits 8")?;
    writeln!(out)?;
    writeln!(out, "#ruledef {{")?;

    for byte in 0..=255u8 {
        let descriptor = opcode::lookup(byte);
        if !descriptor.is_defined() {
            continue;
        }

        // The port families collapse to one parametric rule each; the port
        // number is the low three bits of the opcode byte.
        match descriptor.operand {
            Operand::Port | Operand::PortImm8 | Operand::PortA if byte & 7 != 0 => continue,
            _ => {}
        }

        // The stack-relative load stores its displacement negated so the
        // microcode can use a plain add on the address low byte.
        if byte == opcode::LD_A_SP_IMM8_PTR {
            writeln!(out, "    ld a, [sp-{{imm: i8}}] => (0x{byte:02x}) @ (-imm)`8")?;
            continue;
        }

        let (placeholder, suffix) = match descriptor.operand {
            Operand::None => ("", ")"),
            Operand::Imm8 => (" {imm: i8}", ") @ imm"),
            Operand::Imm16 => (" {imm: i16}", ") @ le(imm)"),
            Operand::Port => (" {port: u3}", " + port)`8"),
            Operand::PortImm8 => (" {port: u3}, {imm: i8}", " + port)`8 @ imm"),
            Operand::PortA => (" {port: u3}, a", " + port)`8"),
        };
        writeln!(
            out,
            "    {}{} => (0x{:02x}{}",
            descriptor.mnemonic, placeholder, byte, suffix
        )?;
    }

    writeln!(out, "}}")?;
    out.flush()
}
