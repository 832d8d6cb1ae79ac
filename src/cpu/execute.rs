/*!
execute.rs - Instruction semantic helpers (ALU, flags, stack, shifts).

Purpose
=======
Side-effect logic shared by every dispatch family. Helpers are generic over
`CpuRegs` and take the `Bus` explicitly when they touch memory; none of them
advance PC or know about cycle counts.

Arithmetic
==========
ADC/SBC and the compare family all run through `add_with_carry`, which adds
two bytes one bit at a time. The carry into bit 7 and the carry out of bit 7
fall out of the loop directly, and signed overflow is their XOR. Subtraction
is addition of the one's complement with the current carry as carry-in;
compare is the same subtraction with carry-in forced to 1 and the result
thrown away. Decimal mode is never consulted.

Stack
=====
Page 1 ($0100-$01FF), SP post-decremented on push and pre-incremented on
pull, both wrapping within the page. Words go high byte first.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{BREAK, CARRY, NEGATIVE, OVERFLOW, UNUSED, ZERO};

const STACK_PAGE: u16 = 0x0100;

// ---------------------------------------------------------------------------
// Bit-serial adder
// ---------------------------------------------------------------------------

/// Output of one 8-bit bit-serial addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluSum {
    pub value: u8,
    pub carry: bool,
    pub overflow: bool,
}

/// Add `a + b + carry_in` one bit at a time, LSB first.
pub fn add_with_carry(a: u8, b: u8, carry_in: bool) -> AluSum {
    let mut value = 0u8;
    let mut carry = carry_in;
    let mut carry_into_msb = false;
    for bit in 0..8 {
        if bit == 7 {
            carry_into_msb = carry;
        }
        let x = (a >> bit) & 1 != 0;
        let y = (b >> bit) & 1 != 0;
        if x ^ y ^ carry {
            value |= 1 << bit;
        }
        carry = (x && y) || (carry && (x ^ y));
    }
    AluSum {
        value,
        carry,
        overflow: carry_into_msb ^ carry,
    }
}

/// `a - b - !carry_in` as addition of the complement.
#[inline]
pub fn subtract_with_borrow(a: u8, b: u8, carry_in: bool) -> AluSum {
    add_with_carry(a, !b, carry_in)
}

// ---------------------------------------------------------------------------
// Arithmetic / compare
// ---------------------------------------------------------------------------

pub(crate) fn adc<C: CpuRegs>(cpu: &mut C, v: u8) {
    let sum = add_with_carry(cpu.a(), v, cpu.is_flag_set(CARRY));
    cpu.update_carry(sum.carry);
    cpu.update_overflow(sum.overflow);
    cpu.set_a(sum.value);
    cpu.update_zn(sum.value);
}

pub(crate) fn sbc<C: CpuRegs>(cpu: &mut C, v: u8) {
    let diff = subtract_with_borrow(cpu.a(), v, cpu.is_flag_set(CARRY));
    cpu.update_carry(diff.carry);
    cpu.update_overflow(diff.overflow);
    cpu.set_a(diff.value);
    cpu.update_zn(diff.value);
}

/// `reg - v` with carry-in 1; registers untouched, V untouched.
pub(crate) fn compare<C: CpuRegs>(cpu: &mut C, reg: u8, v: u8) {
    let diff = subtract_with_borrow(reg, v, true);
    cpu.update_carry(diff.carry);
    cpu.update_zn(diff.value);
}

// ---------------------------------------------------------------------------
// Logical
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn and<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() & v;
    cpu.set_a(r);
    cpu.update_zn(r);
}

#[inline]
pub(crate) fn ora<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() | v;
    cpu.set_a(r);
    cpu.update_zn(r);
}

#[inline]
pub(crate) fn eor<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() ^ v;
    cpu.set_a(r);
    cpu.update_zn(r);
}

/// Z from `A & v`; N and V copied from bits 7 and 6 of the operand.
#[inline]
pub(crate) fn bit<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    cpu.assign_flag(ZERO, (a & v) == 0);
    cpu.assign_flag(NEGATIVE, (v & 0x80) != 0);
    cpu.assign_flag(OVERFLOW, (v & 0x40) != 0);
}

// ---------------------------------------------------------------------------
// Shifts / rotates (value in, value out; flags updated)
// ---------------------------------------------------------------------------

pub(crate) fn asl<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    cpu.update_carry(v & 0x80 != 0);
    let r = v << 1;
    cpu.update_zn(r);
    r
}

pub(crate) fn lsr<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    cpu.update_carry(v & 0x01 != 0);
    let r = v >> 1;
    cpu.update_zn(r);
    r
}

pub(crate) fn rol<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = cpu.is_flag_set(CARRY) as u8;
    cpu.update_carry(v & 0x80 != 0);
    let r = (v << 1) | carry_in;
    cpu.update_zn(r);
    r
}

pub(crate) fn ror<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = if cpu.is_flag_set(CARRY) { 0x80 } else { 0 };
    cpu.update_carry(v & 0x01 != 0);
    let r = (v >> 1) | carry_in;
    cpu.update_zn(r);
    r
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn push<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u8) {
    let sp = cpu.sp();
    bus.write8(STACK_PAGE | sp as u16, v);
    cpu.set_sp(sp.wrapping_sub(1));
}

#[inline]
pub(crate) fn pop<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u8 {
    let sp = cpu.sp().wrapping_add(1);
    cpu.set_sp(sp);
    bus.read8(STACK_PAGE | sp as u16)
}

#[inline]
pub(crate) fn push_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u16) {
    push(cpu, bus, (v >> 8) as u8);
    push(cpu, bus, (v & 0xFF) as u8);
}

#[inline]
pub(crate) fn pop_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    let lo = pop(cpu, bus) as u16;
    let hi = pop(cpu, bus) as u16;
    (hi << 8) | lo
}

/// Push P: bit 5 always set, bit 4 set for software pushes only.
pub(crate) fn push_status<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, software: bool) {
    let v = cpu.compose_status_for_push(software);
    push(cpu, bus, v);
}

/// Pull P: bit 4 does not exist in the live register, bit 5 reads back as 1.
pub(crate) fn pull_status<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let v = pop(cpu, bus);
    cpu.set_status((v | UNUSED) & !BREAK);
}
