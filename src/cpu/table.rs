/*!
table.rs - Opcode decode table.

Purpose
=======
Maps every opcode byte to `{ operation, addressing mode, base cycles }`.
The mapping is a single exhaustive `match` over `u8`, evaluated at compile
time into the 256-entry `OPCODE_TABLE`; dispatch is then a plain array
index followed by a `match` on `Operation`.

Coverage
========
- Every documented NMOS 6502 opcode except BRK ($00). Software break is
  not part of this core, so $00 decodes to `None` like any other hole.
- Unofficial NOP variants that only consume operand bytes and cycles.

Cycles are the static base counts. Page-cross and taken-branch penalties are
not modelled.
*/

use crate::cpu::addressing::AddressingMode;
use crate::cpu::addressing::AddressingMode::{
    Absolute, AbsoluteX, AbsoluteY, Accumulator, Immediate, Implied, Indirect, IndirectX,
    IndirectY, Relative, ZeroPage, ZeroPageX, ZeroPageY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // Load / store
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    // Register transfers
    Tax,
    Tay,
    Txa,
    Tya,
    Tsx,
    Txs,
    // Increment / decrement
    Inc,
    Dec,
    Inx,
    Iny,
    Dex,
    Dey,
    // Logical
    And,
    Ora,
    Eor,
    Bit,
    // Arithmetic
    Adc,
    Sbc,
    // Compare
    Cmp,
    Cpx,
    Cpy,
    // Shift / rotate
    Asl,
    Lsr,
    Rol,
    Ror,
    // Branches
    Bpl,
    Bmi,
    Bvc,
    Bvs,
    Bcc,
    Bcs,
    Bne,
    Beq,
    // Stack
    Pha,
    Php,
    Pla,
    Plp,
    // Control transfer
    Jmp,
    Jsr,
    Rts,
    Rti,
    // Flags
    Clc,
    Sec,
    Cli,
    Sei,
    Clv,
    Cld,
    Sed,
    // No-ops
    Nop,
    /// Unofficial opcode that only consumes its operand bytes and cycles.
    IllegalNop,
}

impl Operation {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Operation::Lda => "LDA",
            Operation::Ldx => "LDX",
            Operation::Ldy => "LDY",
            Operation::Sta => "STA",
            Operation::Stx => "STX",
            Operation::Sty => "STY",
            Operation::Tax => "TAX",
            Operation::Tay => "TAY",
            Operation::Txa => "TXA",
            Operation::Tya => "TYA",
            Operation::Tsx => "TSX",
            Operation::Txs => "TXS",
            Operation::Inc => "INC",
            Operation::Dec => "DEC",
            Operation::Inx => "INX",
            Operation::Iny => "INY",
            Operation::Dex => "DEX",
            Operation::Dey => "DEY",
            Operation::And => "AND",
            Operation::Ora => "ORA",
            Operation::Eor => "EOR",
            Operation::Bit => "BIT",
            Operation::Adc => "ADC",
            Operation::Sbc => "SBC",
            Operation::Cmp => "CMP",
            Operation::Cpx => "CPX",
            Operation::Cpy => "CPY",
            Operation::Asl => "ASL",
            Operation::Lsr => "LSR",
            Operation::Rol => "ROL",
            Operation::Ror => "ROR",
            Operation::Bpl => "BPL",
            Operation::Bmi => "BMI",
            Operation::Bvc => "BVC",
            Operation::Bvs => "BVS",
            Operation::Bcc => "BCC",
            Operation::Bcs => "BCS",
            Operation::Bne => "BNE",
            Operation::Beq => "BEQ",
            Operation::Pha => "PHA",
            Operation::Php => "PHP",
            Operation::Pla => "PLA",
            Operation::Plp => "PLP",
            Operation::Jmp => "JMP",
            Operation::Jsr => "JSR",
            Operation::Rts => "RTS",
            Operation::Rti => "RTI",
            Operation::Clc => "CLC",
            Operation::Sec => "SEC",
            Operation::Cli => "CLI",
            Operation::Sei => "SEI",
            Operation::Clv => "CLV",
            Operation::Cld => "CLD",
            Operation::Sed => "SED",
            Operation::Nop | Operation::IllegalNop => "NOP",
        }
    }
}

/// One decoded table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Operation,
    pub mode: AddressingMode,
    pub cycles: u8,
}

const fn ins(op: Operation, mode: AddressingMode, cycles: u8) -> Option<Instruction> {
    Some(Instruction { op, mode, cycles })
}

/// Decode a single opcode byte.
pub const fn decode(opcode: u8) -> Option<Instruction> {
    use Operation::*;
    match opcode {
        // LDA
        0xA9 => ins(Lda, Immediate, 2),
        0xA5 => ins(Lda, ZeroPage, 3),
        0xB5 => ins(Lda, ZeroPageX, 4),
        0xAD => ins(Lda, Absolute, 4),
        0xBD => ins(Lda, AbsoluteX, 4),
        0xB9 => ins(Lda, AbsoluteY, 4),
        0xA1 => ins(Lda, IndirectX, 6),
        0xB1 => ins(Lda, IndirectY, 5),
        // LDX
        0xA2 => ins(Ldx, Immediate, 2),
        0xA6 => ins(Ldx, ZeroPage, 3),
        0xB6 => ins(Ldx, ZeroPageY, 4),
        0xAE => ins(Ldx, Absolute, 4),
        0xBE => ins(Ldx, AbsoluteY, 4),
        // LDY
        0xA0 => ins(Ldy, Immediate, 2),
        0xA4 => ins(Ldy, ZeroPage, 3),
        0xB4 => ins(Ldy, ZeroPageX, 4),
        0xAC => ins(Ldy, Absolute, 4),
        0xBC => ins(Ldy, AbsoluteX, 4),
        // STA
        0x85 => ins(Sta, ZeroPage, 3),
        0x95 => ins(Sta, ZeroPageX, 4),
        0x8D => ins(Sta, Absolute, 4),
        0x9D => ins(Sta, AbsoluteX, 5),
        0x99 => ins(Sta, AbsoluteY, 5),
        0x81 => ins(Sta, IndirectX, 6),
        0x91 => ins(Sta, IndirectY, 6),
        // STX / STY
        0x86 => ins(Stx, ZeroPage, 3),
        0x96 => ins(Stx, ZeroPageY, 4),
        0x8E => ins(Stx, Absolute, 4),
        0x84 => ins(Sty, ZeroPage, 3),
        0x94 => ins(Sty, ZeroPageX, 4),
        0x8C => ins(Sty, Absolute, 4),

        // Transfers
        0xAA => ins(Tax, Implied, 2),
        0xA8 => ins(Tay, Implied, 2),
        0x8A => ins(Txa, Implied, 2),
        0x98 => ins(Tya, Implied, 2),
        0xBA => ins(Tsx, Implied, 2),
        0x9A => ins(Txs, Implied, 2),

        // Stack
        0x48 => ins(Pha, Implied, 3),
        0x08 => ins(Php, Implied, 3),
        0x68 => ins(Pla, Implied, 4),
        0x28 => ins(Plp, Implied, 4),

        // Register increment / decrement
        0xE8 => ins(Inx, Implied, 2),
        0xC8 => ins(Iny, Implied, 2),
        0xCA => ins(Dex, Implied, 2),
        0x88 => ins(Dey, Implied, 2),

        // Memory increment / decrement
        0xE6 => ins(Inc, ZeroPage, 5),
        0xF6 => ins(Inc, ZeroPageX, 6),
        0xEE => ins(Inc, Absolute, 6),
        0xFE => ins(Inc, AbsoluteX, 7),
        0xC6 => ins(Dec, ZeroPage, 5),
        0xD6 => ins(Dec, ZeroPageX, 6),
        0xCE => ins(Dec, Absolute, 6),
        0xDE => ins(Dec, AbsoluteX, 7),

        // AND
        0x29 => ins(And, Immediate, 2),
        0x25 => ins(And, ZeroPage, 3),
        0x35 => ins(And, ZeroPageX, 4),
        0x2D => ins(And, Absolute, 4),
        0x3D => ins(And, AbsoluteX, 4),
        0x39 => ins(And, AbsoluteY, 4),
        0x21 => ins(And, IndirectX, 6),
        0x31 => ins(And, IndirectY, 5),
        // ORA
        0x09 => ins(Ora, Immediate, 2),
        0x05 => ins(Ora, ZeroPage, 3),
        0x15 => ins(Ora, ZeroPageX, 4),
        0x0D => ins(Ora, Absolute, 4),
        0x1D => ins(Ora, AbsoluteX, 4),
        0x19 => ins(Ora, AbsoluteY, 4),
        0x01 => ins(Ora, IndirectX, 6),
        0x11 => ins(Ora, IndirectY, 5),
        // EOR
        0x49 => ins(Eor, Immediate, 2),
        0x45 => ins(Eor, ZeroPage, 3),
        0x55 => ins(Eor, ZeroPageX, 4),
        0x4D => ins(Eor, Absolute, 4),
        0x5D => ins(Eor, AbsoluteX, 4),
        0x59 => ins(Eor, AbsoluteY, 4),
        0x41 => ins(Eor, IndirectX, 6),
        0x51 => ins(Eor, IndirectY, 5),
        // BIT
        0x24 => ins(Bit, ZeroPage, 3),
        0x2C => ins(Bit, Absolute, 4),

        // ADC
        0x69 => ins(Adc, Immediate, 2),
        0x65 => ins(Adc, ZeroPage, 3),
        0x75 => ins(Adc, ZeroPageX, 4),
        0x6D => ins(Adc, Absolute, 4),
        0x7D => ins(Adc, AbsoluteX, 4),
        0x79 => ins(Adc, AbsoluteY, 4),
        0x61 => ins(Adc, IndirectX, 6),
        0x71 => ins(Adc, IndirectY, 5),
        // SBC
        0xE9 => ins(Sbc, Immediate, 2),
        0xE5 => ins(Sbc, ZeroPage, 3),
        0xF5 => ins(Sbc, ZeroPageX, 4),
        0xED => ins(Sbc, Absolute, 4),
        0xFD => ins(Sbc, AbsoluteX, 4),
        0xF9 => ins(Sbc, AbsoluteY, 4),
        0xE1 => ins(Sbc, IndirectX, 6),
        0xF1 => ins(Sbc, IndirectY, 5),

        // CMP
        0xC9 => ins(Cmp, Immediate, 2),
        0xC5 => ins(Cmp, ZeroPage, 3),
        0xD5 => ins(Cmp, ZeroPageX, 4),
        0xCD => ins(Cmp, Absolute, 4),
        0xDD => ins(Cmp, AbsoluteX, 4),
        0xD9 => ins(Cmp, AbsoluteY, 4),
        0xC1 => ins(Cmp, IndirectX, 6),
        0xD1 => ins(Cmp, IndirectY, 5),
        // CPX / CPY
        0xE0 => ins(Cpx, Immediate, 2),
        0xE4 => ins(Cpx, ZeroPage, 3),
        0xEC => ins(Cpx, Absolute, 4),
        0xC0 => ins(Cpy, Immediate, 2),
        0xC4 => ins(Cpy, ZeroPage, 3),
        0xCC => ins(Cpy, Absolute, 4),

        // ASL
        0x0A => ins(Asl, Accumulator, 2),
        0x06 => ins(Asl, ZeroPage, 5),
        0x16 => ins(Asl, ZeroPageX, 6),
        0x0E => ins(Asl, Absolute, 6),
        0x1E => ins(Asl, AbsoluteX, 7),
        // LSR
        0x4A => ins(Lsr, Accumulator, 2),
        0x46 => ins(Lsr, ZeroPage, 5),
        0x56 => ins(Lsr, ZeroPageX, 6),
        0x4E => ins(Lsr, Absolute, 6),
        0x5E => ins(Lsr, AbsoluteX, 7),
        // ROL
        0x2A => ins(Rol, Accumulator, 2),
        0x26 => ins(Rol, ZeroPage, 5),
        0x36 => ins(Rol, ZeroPageX, 6),
        0x2E => ins(Rol, Absolute, 6),
        0x3E => ins(Rol, AbsoluteX, 7),
        // ROR
        0x6A => ins(Ror, Accumulator, 2),
        0x66 => ins(Ror, ZeroPage, 5),
        0x76 => ins(Ror, ZeroPageX, 6),
        0x6E => ins(Ror, Absolute, 6),
        0x7E => ins(Ror, AbsoluteX, 7),

        // Branches
        0x10 => ins(Bpl, Relative, 2),
        0x30 => ins(Bmi, Relative, 2),
        0x50 => ins(Bvc, Relative, 2),
        0x70 => ins(Bvs, Relative, 2),
        0x90 => ins(Bcc, Relative, 2),
        0xB0 => ins(Bcs, Relative, 2),
        0xD0 => ins(Bne, Relative, 2),
        0xF0 => ins(Beq, Relative, 2),

        // Jumps / subroutines / returns
        0x4C => ins(Jmp, Absolute, 3),
        0x6C => ins(Jmp, Indirect, 5),
        0x20 => ins(Jsr, Absolute, 6),
        0x60 => ins(Rts, Implied, 6),
        0x40 => ins(Rti, Implied, 6),

        // Flags
        0x18 => ins(Clc, Implied, 2),
        0x38 => ins(Sec, Implied, 2),
        0x58 => ins(Cli, Implied, 2),
        0x78 => ins(Sei, Implied, 2),
        0xB8 => ins(Clv, Implied, 2),
        0xD8 => ins(Cld, Implied, 2),
        0xF8 => ins(Sed, Implied, 2),

        0xEA => ins(Nop, Implied, 2),

        // Unofficial NOPs
        0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA => ins(IllegalNop, Implied, 2),
        0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 => ins(IllegalNop, Immediate, 2),
        0x04 | 0x44 | 0x64 => ins(IllegalNop, ZeroPage, 3),
        0x14 | 0x34 | 0x54 | 0x74 | 0xD4 | 0xF4 => ins(IllegalNop, ZeroPageX, 4),
        0x0C => ins(IllegalNop, Absolute, 4),
        0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => ins(IllegalNop, AbsoluteX, 4),

        _ => None,
    }
}

/// Pre-decoded 256-entry table built from `decode` at compile time.
pub static OPCODE_TABLE: [Option<Instruction>; 256] = {
    let mut t: [Option<Instruction>; 256] = [None; 256];
    let mut i = 0;
    while i < 256 {
        t[i] = decode(i as u8);
        i += 1;
    }
    t
};

/// Table lookup.
#[inline]
pub fn lookup(opcode: u8) -> Option<Instruction> {
    OPCODE_TABLE[opcode as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_decode_everywhere() {
        for op in 0..=255u8 {
            assert_eq!(lookup(op), decode(op), "opcode {op:#04X}");
        }
    }

    #[test]
    fn documented_count_without_brk() {
        let documented = OPCODE_TABLE
            .iter()
            .flatten()
            .filter(|i| i.op != Operation::IllegalNop)
            .count();
        // 151 documented opcodes, minus BRK.
        assert_eq!(documented, 150);
    }

    #[test]
    fn brk_and_holes_are_undecoded() {
        assert!(lookup(0x00).is_none());
        assert!(lookup(0x02).is_none());
        assert!(lookup(0xFF).is_none());
    }

    #[test]
    fn cycles_basic_examples() {
        assert_eq!(lookup(0xA9).map(|i| i.cycles), Some(2));
        assert_eq!(lookup(0x9D).map(|i| i.cycles), Some(5));
        assert_eq!(lookup(0x4C).map(|i| i.cycles), Some(3));
        assert_eq!(lookup(0x6C).map(|i| i.cycles), Some(5));
        assert_eq!(lookup(0xFE).map(|i| i.cycles), Some(7));
    }

    #[test]
    fn stores_never_use_immediate() {
        for ins in OPCODE_TABLE.iter().flatten() {
            if matches!(ins.op, Operation::Sta | Operation::Stx | Operation::Sty) {
                assert_ne!(ins.mode, AddressingMode::Immediate);
            }
        }
    }

    #[test]
    fn illegal_nops_are_present() {
        let i = lookup(0x04).unwrap();
        assert_eq!(i.op, Operation::IllegalNop);
        assert_eq!(i.mode, AddressingMode::ZeroPage);
        assert_eq!(i.op.mnemonic(), "NOP");
    }
}
