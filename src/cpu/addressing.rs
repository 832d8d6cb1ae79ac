/*!
addressing.rs - 6502 addressing modes and operand resolution.

Overview
========
Every decoded instruction carries an `AddressingMode`. Handlers never do
their own operand arithmetic; they ask the mode to `read` or `write` the
operand and, once the operation is done, the dispatcher advances PC by the
mode's fixed `pc_step`.

Caller Assumptions
==================
- The opcode byte has already been consumed: PC points at the first operand
  byte when any helper here is invoked.
- Helpers in this module never advance PC. Branches are the one family that
  moves PC past its operand itself (see `dispatch::branches`).

Wrap Policies
=============
- Zero-page indexed: the index sum wraps modulo 256 and never leaves page 0.
- Absolute indexed: the 16-bit sum is used as-is and may cross a page.
- (Indirect,X): pointer = (operand + X) mod 256; the two pointer bytes are
  fetched from page 0 with the high-byte fetch wrapping $FF -> $00.
- (Indirect),Y: pointer = operand (no X); the fetched base plus Y may cross
  a page and is not wrapped.
- Relative: the operand byte is a two's-complement displacement.
- JMP (indirect): a pointer whose low byte is $FF fetches its high byte from
  the start of the same page.

No page-cross cycle penalty is modelled here; timing comes from the static
per-opcode cycle table.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::error::CpuError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand (transfers, stack, flags, returns).
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP ($nnnn) only.
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

/// Where an operand lives once the mode has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Accumulator,
    /// A bus address (for Immediate this is the address of the operand byte).
    Address(u16),
    Displacement(i8),
}

impl AddressingMode {
    /// Post-execution PC advance (bytes of operand following the opcode).
    pub const fn pc_step(self) -> u16 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator | AddressingMode::Relative => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }

    /// Resolve the operand location without touching PC or the operand itself.
    pub fn resolve<C: CpuRegs>(self, cpu: &C, bus: &mut Bus) -> Operand {
        let pc = cpu.pc();
        match self {
            AddressingMode::Implied => Operand::None,
            AddressingMode::Accumulator => Operand::Accumulator,
            AddressingMode::Immediate => Operand::Address(pc),
            AddressingMode::ZeroPage => Operand::Address(bus.read8(pc) as u16),
            AddressingMode::ZeroPageX => Operand::Address(zero_page_indexed(bus, pc, cpu.x())),
            AddressingMode::ZeroPageY => Operand::Address(zero_page_indexed(bus, pc, cpu.y())),
            AddressingMode::Absolute => Operand::Address(bus.read16(pc)),
            AddressingMode::AbsoluteX => {
                Operand::Address(bus.read16(pc).wrapping_add(cpu.x() as u16))
            }
            AddressingMode::AbsoluteY => {
                Operand::Address(bus.read16(pc).wrapping_add(cpu.y() as u16))
            }
            AddressingMode::Indirect => {
                let ptr = bus.read16(pc);
                Operand::Address(read_word_indirect_bug(bus, ptr))
            }
            AddressingMode::IndirectX => {
                let zp = bus.read8(pc).wrapping_add(cpu.x());
                Operand::Address(read_word_zp(bus, zp))
            }
            AddressingMode::IndirectY => {
                let zp = bus.read8(pc);
                Operand::Address(read_word_zp(bus, zp).wrapping_add(cpu.y() as u16))
            }
            AddressingMode::Relative => Operand::Displacement(bus.read_i8(pc)),
        }
    }

    /// Effective address for memory modes; `None` for register/implied/relative.
    pub fn effective_address<C: CpuRegs>(self, cpu: &C, bus: &mut Bus) -> Option<u16> {
        match self.resolve(cpu, bus) {
            Operand::Address(addr) => Some(addr),
            _ => None,
        }
    }

    /// Read the operand value.
    ///
    /// Relative yields the raw displacement byte. Implied has no operand.
    pub fn read<C: CpuRegs>(self, cpu: &C, bus: &mut Bus) -> Result<u8, CpuError> {
        match self.resolve(cpu, bus) {
            Operand::Accumulator => Ok(cpu.a()),
            Operand::Address(addr) => Ok(bus.read8(addr)),
            Operand::Displacement(d) => Ok(d as u8),
            Operand::None => Err(CpuError::IllegalAddressingOperation { mode: self }),
        }
    }

    /// Store `value` into the operand location.
    ///
    /// Only Accumulator and the memory modes have storage; everything else
    /// (Immediate, Relative, Implied, Indirect) is a programming error.
    pub fn write<C: CpuRegs>(self, cpu: &mut C, bus: &mut Bus, value: u8) -> Result<(), CpuError> {
        match self {
            AddressingMode::Implied
            | AddressingMode::Immediate
            | AddressingMode::Relative
            | AddressingMode::Indirect => Err(CpuError::IllegalAddressingOperation { mode: self }),
            AddressingMode::Accumulator => {
                cpu.set_a(value);
                Ok(())
            }
            _ => match self.resolve(cpu, bus) {
                Operand::Address(addr) => {
                    bus.write8(addr, value);
                    Ok(())
                }
                _ => Err(CpuError::IllegalAddressingOperation { mode: self }),
            },
        }
    }
}

#[inline]
fn zero_page_indexed(bus: &mut Bus, pc: u16, index: u8) -> u16 {
    bus.read8(pc).wrapping_add(index) as u16
}

/// Little-endian pointer from zero page; the high-byte fetch stays in page 0.
#[inline]
pub(crate) fn read_word_zp(bus: &mut Bus, base: u8) -> u16 {
    // page 0 is always work RAM, so no register side effects can apply
    bus.ram().zero_page_word(base)
}

/// JMP (indirect) hardware defect: a pointer at $xxFF takes its high byte
/// from $xx00 rather than the next page.
#[inline]
pub(crate) fn read_word_indirect_bug(bus: &mut Bus, addr: u16) -> u16 {
    let lo = bus.read8(addr) as u16;
    let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
    let hi = bus.read8(hi_addr) as u16;
    (hi << 8) | lo
}
