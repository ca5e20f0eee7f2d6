//! Canonical instruction registry.
//!
//! Every other component keys off these byte encodings: the control ROM
//! generator selects microcode by opcode byte, the emulator latches the
//! byte into O, and the grammar emitter turns the descriptors into
//! assembler rules. Undefined bytes stay in the table as sentinel entries;
//! their microcode is the halt-after-fetch trap.

use lazy_static::lazy_static;

// --- Opcode encodings ---
pub const NOP: u8 = 0x00;

pub const LD_A_IMM8: u8 = 0x01;
pub const LD_B_IMM8: u8 = 0x02;
pub const LD_C_IMM8: u8 = 0x03;
pub const LD_D_IMM8: u8 = 0x04;

pub const LD_I_IMM16: u8 = 0x05;
pub const LD_J_IMM16: u8 = 0x06;

pub const LD_A_I_PTR: u8 = 0x07;
pub const LD_A_J_PTR: u8 = 0x08;
pub const LD_A_I_PTR_INC: u8 = 0x09;
pub const LD_A_J_PTR_INC: u8 = 0x0A;
pub const LD_I_PTR_A: u8 = 0x0B;
pub const LD_J_PTR_A: u8 = 0x0C;
pub const LD_I_PTR_INC_A: u8 = 0x0D;
pub const LD_J_PTR_INC_A: u8 = 0x0E;

pub const LD_I_PTR_AB: u8 = 0x0F;
pub const LD_I_PTR_CD: u8 = 0x10;
pub const LD_AB_I_PTR: u8 = 0x11;
pub const LD_J_PTR_CD: u8 = 0x12;
pub const LD_CD_I_PTR: u8 = 0x13;
pub const LD_CD_J_PTR: u8 = 0x14;

// Register-to-register moves: (opcode - 0x20) encodes dest in bits 3..2
// and source in bits 1..0. Self-moves (0x20, 0x25, 0x2A, 0x2F) are unused.
pub const LD_A_B: u8 = 0x21;
pub const LD_A_C: u8 = 0x22;
pub const LD_A_D: u8 = 0x23;
pub const LD_B_A: u8 = 0x24;
pub const LD_B_C: u8 = 0x26;
pub const LD_B_D: u8 = 0x27;
pub const LD_C_A: u8 = 0x28;
pub const LD_C_B: u8 = 0x29;
pub const LD_C_D: u8 = 0x2B;
pub const LD_D_A: u8 = 0x2C;
pub const LD_D_B: u8 = 0x2D;
pub const LD_D_C: u8 = 0x2E;

// Unary ALU on A: the low bits are the ALU operation selector itself.
pub const INC_A: u8 = 0x40;
pub const SHL_A: u8 = 0x41;
pub const SHR_A: u8 = 0x42;
pub const NOT_A: u8 = 0x43;
pub const DEC_A: u8 = 0x44;
pub const ROR_A: u8 = 0x45;

pub const ADD_A_B: u8 = 0x50;
pub const OR_A_B: u8 = 0x51;
pub const AND_A_B: u8 = 0x52;
pub const XOR_A_B: u8 = 0x53;
pub const ADC_A_B: u8 = 0x54;

pub const DEC_B: u8 = 0x60;
pub const DEC_C: u8 = 0x61;
pub const DEC_D: u8 = 0x62;
pub const INC_B: u8 = 0x63;
pub const INC_C: u8 = 0x64;
pub const INC_D: u8 = 0x65;
pub const ADD_D_B: u8 = 0x66;
pub const ADC_C_A: u8 = 0x67;

pub const ADC_D_IMM8: u8 = 0x68;
pub const ADD_A_IMM8: u8 = 0x6F;
pub const OR_A_IMM8: u8 = 0x70;
pub const AND_A_IMM8: u8 = 0x71;
pub const XOR_A_IMM8: u8 = 0x72;
pub const ADC_A_IMM8: u8 = 0x73;
pub const ADD_B_IMM8: u8 = 0x75;
pub const CMP_A_IMM8: u8 = 0x76;
pub const CMP_B_IMM8: u8 = 0x77;

// Port-indexed families. Each spans eight contiguous bytes and the low
// three bits of the opcode are the port number.
pub const OUT_PORT0_IMM8: u8 = 0x78; // ..0x7F
pub const IN_A_PORT0: u8 = 0x80; // ..0x87
pub const OUT_PORT0_A: u8 = 0x88; // ..0x8F

pub const JMP_I: u8 = 0x90;
pub const JMP_J: u8 = 0x91;
pub const JMP_IMM16: u8 = 0x92;
pub const JZ_IMM16: u8 = 0x93;
pub const JNZ_IMM16: u8 = 0x94;
pub const JC_IMM16: u8 = 0x95;
pub const JNC_IMM16: u8 = 0x96;
pub const JO_IMM16: u8 = 0x97;
pub const JNO_IMM16: u8 = 0x98;
pub const JS_IMM16: u8 = 0x99;
pub const JNS_IMM16: u8 = 0x9A;

pub const LD_SP_IMM8: u8 = 0xA0;
pub const PUSH_A: u8 = 0xA2;
pub const PUSH_B: u8 = 0xA3;
pub const PUSH_C: u8 = 0xA4;
pub const PUSH_D: u8 = 0xA5;
pub const PUSH_I: u8 = 0xA6;
pub const PUSH_J: u8 = 0xA7;
pub const POP_A: u8 = 0xA8;
pub const POP_B: u8 = 0xA9;
pub const POP_C: u8 = 0xAA;
pub const POP_D: u8 = 0xAB;
pub const POP_I: u8 = 0xAC;
pub const POP_J: u8 = 0xAD;

pub const CALL_IMM16: u8 = 0xB0;
pub const RET: u8 = 0xB1;
pub const LD_A_SP_IMM8_PTR: u8 = 0xB2;

pub const HALT: u8 = 0xFF;

/// Operand bytes that follow an opcode in the instruction stream, plus the
/// port-family shapes where the port number is folded into the opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    None,
    Imm8,
    Imm16,
    Port,
    PortImm8,
    PortA,
}

impl Operand {
    /// Instruction length in bytes, opcode included.
    pub fn encoded_len(self) -> u8 {
        match self {
            Operand::None | Operand::Port | Operand::PortA => 1,
            Operand::Imm8 | Operand::PortImm8 => 2,
            Operand::Imm16 => 3,
        }
    }
}

/// One registry entry: assembler-facing mnemonic plus operand shape.
#[derive(Clone)]
pub struct Descriptor {
    pub mnemonic: &'static str,
    pub operand: Operand,
}

impl Descriptor {
    pub const fn new(mnemonic: &'static str, operand: Operand) -> Self {
        Descriptor { mnemonic, operand }
    }

    /// Entry for a reserved byte. The control ROM traps these with a halt
    /// after the fetch step.
    pub const fn undefined() -> Self {
        Descriptor {
            mnemonic: "???",
            operand: Operand::None,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.mnemonic != "???"
    }
}

lazy_static! {
    /// The full byte-to-descriptor map. Indices not assigned below keep the
    /// `undefined()` sentinel.
    pub static ref OPCODES: [Descriptor; 256] = {
        let mut table: [Descriptor; 256] = std::array::from_fn(|_| Descriptor::undefined());

        {
            let mut def = |byte: u8, mnemonic: &'static str, operand: Operand| {
                table[byte as usize] = Descriptor::new(mnemonic, operand);
            };

            def(NOP, "nop", Operand::None);

            def(LD_A_IMM8, "ld a,", Operand::Imm8);
            def(LD_B_IMM8, "ld b,", Operand::Imm8);
            def(LD_C_IMM8, "ld c,", Operand::Imm8);
            def(LD_D_IMM8, "ld d,", Operand::Imm8);
            def(LD_I_IMM16, "ld i,", Operand::Imm16);
            def(LD_J_IMM16, "ld j,", Operand::Imm16);

            def(LD_A_I_PTR, "ld a, [i]", Operand::None);
            def(LD_A_J_PTR, "ld a, [j]", Operand::None);
            def(LD_A_I_PTR_INC, "ld a, [i++]", Operand::None);
            def(LD_A_J_PTR_INC, "ld a, [j++]", Operand::None);
            def(LD_I_PTR_A, "ld [i], a", Operand::None);
            def(LD_J_PTR_A, "ld [j], a", Operand::None);
            def(LD_I_PTR_INC_A, "ld [i++], a", Operand::None);
            def(LD_J_PTR_INC_A, "ld [j++], a", Operand::None);
            def(LD_I_PTR_AB, "ld [i], ab", Operand::None);
            def(LD_I_PTR_CD, "ld [i], cd", Operand::None);
            def(LD_AB_I_PTR, "ld ab, [i]", Operand::None);
            def(LD_J_PTR_CD, "ld [j], cd", Operand::None);
            def(LD_CD_I_PTR, "ld cd, [i]", Operand::None);
            def(LD_CD_J_PTR, "ld cd, [j]", Operand::None);

            def(LD_A_B, "ld a, b", Operand::None);
            def(LD_A_C, "ld a, c", Operand::None);
            def(LD_A_D, "ld a, d", Operand::None);
            def(LD_B_A, "ld b, a", Operand::None);
            def(LD_B_C, "ld b, c", Operand::None);
            def(LD_B_D, "ld b, d", Operand::None);
            def(LD_C_A, "ld c, a", Operand::None);
            def(LD_C_B, "ld c, b", Operand::None);
            def(LD_C_D, "ld c, d", Operand::None);
            def(LD_D_A, "ld d, a", Operand::None);
            def(LD_D_B, "ld d, b", Operand::None);
            def(LD_D_C, "ld d, c", Operand::None);

            def(INC_A, "inc a", Operand::None);
            def(SHL_A, "shl a", Operand::None);
            def(SHR_A, "shr a", Operand::None);
            def(NOT_A, "not a", Operand::None);
            def(DEC_A, "dec a", Operand::None);
            def(ROR_A, "ror a", Operand::None);

            def(ADD_A_B, "add a, b", Operand::None);
            def(OR_A_B, "or a, b", Operand::None);
            def(AND_A_B, "and a, b", Operand::None);
            def(XOR_A_B, "xor a, b", Operand::None);
            def(ADC_A_B, "adc a, b", Operand::None);

            def(DEC_B, "dec b", Operand::None);
            def(DEC_C, "dec c", Operand::None);
            def(DEC_D, "dec d", Operand::None);
            def(INC_B, "inc b", Operand::None);
            def(INC_C, "inc c", Operand::None);
            def(INC_D, "inc d", Operand::None);
            def(ADD_D_B, "add d, b", Operand::None);
            def(ADC_C_A, "adc c, a", Operand::None);

            def(ADC_D_IMM8, "adc d,", Operand::Imm8);
            def(ADD_A_IMM8, "add a,", Operand::Imm8);
            def(OR_A_IMM8, "or a,", Operand::Imm8);
            def(AND_A_IMM8, "and a,", Operand::Imm8);
            def(XOR_A_IMM8, "xor a,", Operand::Imm8);
            def(ADC_A_IMM8, "adc a,", Operand::Imm8);
            def(ADD_B_IMM8, "add b,", Operand::Imm8);
            def(CMP_A_IMM8, "cmp a,", Operand::Imm8);
            def(CMP_B_IMM8, "cmp b,", Operand::Imm8);

            for port in 0..8u8 {
                def(OUT_PORT0_IMM8 + port, "out", Operand::PortImm8);
                def(IN_A_PORT0 + port, "in a,", Operand::Port);
                def(OUT_PORT0_A + port, "out", Operand::PortA);
            }

            def(JMP_I, "jmp i", Operand::None);
            def(JMP_J, "jmp j", Operand::None);
            def(JMP_IMM16, "jmp", Operand::Imm16);
            def(JZ_IMM16, "jz", Operand::Imm16);
            def(JNZ_IMM16, "jnz", Operand::Imm16);
            def(JC_IMM16, "jc", Operand::Imm16);
            def(JNC_IMM16, "jnc", Operand::Imm16);
            def(JO_IMM16, "jo", Operand::Imm16);
            def(JNO_IMM16, "jno", Operand::Imm16);
            def(JS_IMM16, "js", Operand::Imm16);
            def(JNS_IMM16, "jns", Operand::Imm16);

            def(LD_SP_IMM8, "ld sp,", Operand::Imm8);
            def(PUSH_A, "push a", Operand::None);
            def(PUSH_B, "push b", Operand::None);
            def(PUSH_C, "push c", Operand::None);
            def(PUSH_D, "push d", Operand::None);
            def(PUSH_I, "push i", Operand::None);
            def(PUSH_J, "push j", Operand::None);
            def(POP_A, "pop a", Operand::None);
            def(POP_B, "pop b", Operand::None);
            def(POP_C, "pop c", Operand::None);
            def(POP_D, "pop d", Operand::None);
            def(POP_I, "pop i", Operand::None);
            def(POP_J, "pop j", Operand::None);

            def(CALL_IMM16, "call", Operand::Imm16);
            def(RET, "ret", Operand::None);
            def(LD_A_SP_IMM8_PTR, "ld a, [sp-{imm:i8}]", Operand::Imm8);

            def(HALT, "halt", Operand::None);
        }

        table
    };
}

/// Look up the descriptor for an opcode byte.
pub fn lookup(byte: u8) -> &'static Descriptor {
    &OPCODES[byte as usize]
}

/// Reverse lookup: the encoding carrying this descriptor. Port families
/// resolve to their base member (port 0); the port number itself lives in
/// the low bits of the byte.
pub fn encode(mnemonic: &str, operand: Operand) -> Option<u8> {
    (0u8..=255).find(|&byte| {
        let descriptor = lookup(byte);
        descriptor.is_defined()
            && descriptor.mnemonic == mnemonic
            && descriptor.operand == operand
    })
}
