/*!
state.rs - 6502 register file (registers + status flags).

Overview
========
`CpuState` is the single owner of every architecturally visible register.
It excludes:
  - Bus / memory logic
  - Instruction decode / dispatch
  - Cycle accounting and interrupt edge detection
Those live in the dispatch, interrupt and core modules.

All 8-bit arithmetic on registers wraps modulo 256; the program counter
wraps modulo 65536.

Status Register Bit Layout
==========================
Bit: 7 6 5 4 3 2 1 0
     N V 1 B D I Z C
Where:
  N = NEGATIVE
  V = OVERFLOW
  1 = UNUSED (forced to 1 whenever the status byte is pushed)
  B = BREAK (only exists on the stack copy; PHP pushes it set, NMI clear)
  D = DECIMAL (stored and toggled, never consulted by ADC/SBC)
  I = IRQ_DISABLE
  Z = ZERO
  C = CARRY
*/

use crate::bus::Bus;

/// Processor status flag bit masks.
pub const CARRY: u8 = 0b0000_0001;
pub const ZERO: u8 = 0b0000_0010;
pub const IRQ_DISABLE: u8 = 0b0000_0100;
pub const DECIMAL: u8 = 0b0000_1000;
pub const BREAK: u8 = 0b0001_0000;
pub const UNUSED: u8 = 0b0010_0000;
pub const OVERFLOW: u8 = 0b0100_0000;
pub const NEGATIVE: u8 = 0b1000_0000;

/// Reset vector location.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Register file for the 6502 CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
}

impl Default for CpuState {
    fn default() -> Self {
        // Power-up: SP=0xFD, interrupts disabled, bit 5 set.
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0x0000,
            status: IRQ_DISABLE | UNUSED,
        }
    }
}

impl CpuState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore power-up registers and load PC from the reset vector.
    pub fn reset(&mut self, bus: &mut Bus) {
        *self = Self::default();
        self.pc = bus.read16(RESET_VECTOR);
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------
    #[inline]
    pub fn a(&self) -> u8 {
        self.a
    }
    #[inline]
    pub fn x(&self) -> u8 {
        self.x
    }
    #[inline]
    pub fn y(&self) -> u8 {
        self.y
    }
    #[inline]
    pub fn sp(&self) -> u8 {
        self.sp
    }
    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    pub fn status(&self) -> u8 {
        self.status
    }

    #[inline]
    pub fn set_a(&mut self, v: u8) {
        self.a = v;
    }
    #[inline]
    pub fn set_x(&mut self, v: u8) {
        self.x = v;
    }
    #[inline]
    pub fn set_y(&mut self, v: u8) {
        self.y = v;
    }
    #[inline]
    pub fn set_sp(&mut self, v: u8) {
        self.sp = v;
    }
    #[inline]
    pub fn set_pc(&mut self, v: u16) {
        self.pc = v;
    }
    #[inline]
    pub fn set_status(&mut self, v: u8) {
        self.status = v;
    }

    /// Advance PC by `delta` (wrapping at 16 bits).
    #[inline]
    pub fn advance_pc(&mut self, delta: u16) {
        self.pc = self.pc.wrapping_add(delta);
    }

    // ---------------------------------------------------------------------
    // Flags
    // ---------------------------------------------------------------------

    #[inline]
    pub fn is_flag_set(&self, mask: u8) -> bool {
        (self.status & mask) != 0
    }

    #[inline]
    pub fn assign_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.status |= mask;
        } else {
            self.status &= !mask;
        }
    }

    /// Set ZERO iff `result == 0` and NEGATIVE iff bit 7 of `result` is set.
    #[inline]
    pub fn update_zn(&mut self, result: u8) {
        self.assign_flag(ZERO, result == 0);
        self.assign_flag(NEGATIVE, (result & 0x80) != 0);
    }

    pub fn carry(&self) -> bool {
        self.is_flag_set(CARRY)
    }
    pub fn zero(&self) -> bool {
        self.is_flag_set(ZERO)
    }
    pub fn interrupt_disable(&self) -> bool {
        self.is_flag_set(IRQ_DISABLE)
    }
    pub fn decimal(&self) -> bool {
        self.is_flag_set(DECIMAL)
    }
    pub fn overflow(&self) -> bool {
        self.is_flag_set(OVERFLOW)
    }
    pub fn negative(&self) -> bool {
        self.is_flag_set(NEGATIVE)
    }

    pub fn set_carry(&mut self, on: bool) {
        self.assign_flag(CARRY, on);
    }
    pub fn set_zero(&mut self, on: bool) {
        self.assign_flag(ZERO, on);
    }
    pub fn set_interrupt_disable(&mut self, on: bool) {
        self.assign_flag(IRQ_DISABLE, on);
    }
    pub fn set_decimal(&mut self, on: bool) {
        self.assign_flag(DECIMAL, on);
    }
    pub fn set_overflow(&mut self, on: bool) {
        self.assign_flag(OVERFLOW, on);
    }
    pub fn set_negative(&mut self, on: bool) {
        self.assign_flag(NEGATIVE, on);
    }

    /// Status byte as written to the stack.
    ///
    /// Bit 5 is always forced on. Bit 4 is on for software pushes (PHP) and
    /// off for the hardware NMI sequence.
    pub fn compose_status_for_push(&self, software: bool) -> u8 {
        let v = self.status | UNUSED;
        if software { v | BREAK } else { v & !BREAK }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;
    use crate::test_utils::build_nrom_with_prg;

    #[test]
    fn default_power_up() {
        let s = CpuState::new();
        assert_eq!(s.a(), 0);
        assert_eq!(s.x(), 0);
        assert_eq!(s.y(), 0);
        assert_eq!(s.sp(), 0xFD);
        assert!(s.interrupt_disable());
        assert!(s.is_flag_set(UNUSED));
    }

    #[test]
    fn reset_sets_pc_from_vector() {
        let rom = build_nrom_with_prg(&[0xEA], Some((0xC123, 0x8000)));
        let mut bus = Bus::new();
        bus.attach_cartridge(Cartridge::from_ines_bytes(&rom).expect("parse"));
        let mut s = CpuState::new();
        s.set_a(0x55);
        s.reset(&mut bus);
        assert_eq!(s.pc(), 0xC123);
        assert_eq!(s.a(), 0);
    }

    #[test]
    fn named_flag_accessors_round_trip() {
        let mut s = CpuState::new();
        s.set_status(0);
        s.set_carry(true);
        s.set_overflow(true);
        assert_eq!(s.status(), CARRY | OVERFLOW);
        s.set_carry(false);
        s.set_decimal(true);
        s.set_negative(true);
        s.set_zero(true);
        assert!(s.decimal() && s.negative() && s.zero() && s.overflow());
        assert!(!s.carry());
        s.set_interrupt_disable(true);
        assert!(s.interrupt_disable());
    }

    #[test]
    fn update_zn_behavior() {
        let mut s = CpuState::new();
        s.update_zn(0x00);
        assert!(s.zero());
        assert!(!s.negative());
        s.update_zn(0x80);
        assert!(!s.zero());
        assert!(s.negative());
        s.update_zn(0x7F);
        assert!(!s.zero());
        assert!(!s.negative());
    }

    #[test]
    fn pc_advance_wraps() {
        let mut s = CpuState::new();
        s.set_pc(0xFFFF);
        s.advance_pc(1);
        assert_eq!(s.pc(), 0x0000);
        s.advance_pc(2);
        assert_eq!(s.pc(), 0x0002);
    }

    #[test]
    fn pushed_status_forces_bit5_and_controls_bit4() {
        let mut s = CpuState::new();
        s.set_status(CARRY);
        assert_eq!(s.compose_status_for_push(true), CARRY | UNUSED | BREAK);
        assert_eq!(s.compose_status_for_push(false), CARRY | UNUSED);
    }
}
