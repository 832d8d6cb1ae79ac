//! Property-based tests for CPU invariants, run through the public API with
//! the program placed in work RAM.

use nescore::cpu::table::lookup;
use nescore::cpu::{CARRY, NEGATIVE, OVERFLOW, ZERO};
use nescore::{Bus, Cpu, CpuError};
use proptest::prelude::*;

const ORIGIN: u16 = 0x0400;

/// Load `program` at $0400 and point the CPU at it.
fn setup(program: &[u8]) -> (Cpu, Bus) {
    let mut bus = Bus::new();
    for (i, b) in program.iter().enumerate() {
        bus.write8(ORIGIN + i as u16, *b);
    }
    let mut cpu = Cpu::new();
    cpu.set_pc(ORIGIN);
    (cpu, bus)
}

fn run(cpu: &mut Cpu, bus: &mut Bus, instructions: usize) {
    cpu.run(bus, instructions).expect("program runs");
}

proptest! {
    #[test]
    fn lda_sets_zero_and_negative_from_value(v in any::<u8>()) {
        let (mut cpu, mut bus) = setup(&[0xA9, v]);
        run(&mut cpu, &mut bus, 1);
        prop_assert_eq!(cpu.status() & ZERO != 0, v == 0);
        prop_assert_eq!(cpu.status() & NEGATIVE != 0, v & 0x80 != 0);
    }

    #[test]
    fn adc_matches_modular_sum(a in any::<u8>(), b in any::<u8>(), c in any::<bool>()) {
        // LDA #a; CLC/SEC; ADC #b
        let carry_op = if c { 0x38 } else { 0x18 };
        let (mut cpu, mut bus) = setup(&[0xA9, a, carry_op, 0x69, b]);
        run(&mut cpu, &mut bus, 3);

        let wide = a as u16 + b as u16 + c as u16;
        let result = wide as u8;
        prop_assert_eq!(cpu.a(), result);
        prop_assert_eq!(cpu.status() & CARRY != 0, wide > 0xFF);
        let same_sign = (a ^ b) & 0x80 == 0;
        let flipped = (a ^ result) & 0x80 != 0;
        prop_assert_eq!(cpu.status() & OVERFLOW != 0, same_sign && flipped);
    }

    #[test]
    fn sbc_matches_modular_difference(a in any::<u8>(), b in any::<u8>(), c in any::<bool>()) {
        let carry_op = if c { 0x38 } else { 0x18 };
        let (mut cpu, mut bus) = setup(&[0xA9, a, carry_op, 0xE9, b]);
        run(&mut cpu, &mut bus, 3);

        let borrow = !c as i16;
        let diff = a as i16 - b as i16 - borrow;
        prop_assert_eq!(cpu.a(), diff as u8);
        prop_assert_eq!(cpu.status() & CARRY != 0, diff >= 0);
    }

    #[test]
    fn cmp_carry_iff_register_ge_memory(r in any::<u8>(), m in any::<u8>()) {
        // LDA #r; CMP #m
        let (mut cpu, mut bus) = setup(&[0xA9, r, 0xC9, m]);
        run(&mut cpu, &mut bus, 2);
        prop_assert_eq!(cpu.a(), r);
        prop_assert_eq!(cpu.status() & CARRY != 0, r >= m);
        prop_assert_eq!(cpu.status() & ZERO != 0, r == m);
        prop_assert_eq!(cpu.status() & NEGATIVE != 0, r.wrapping_sub(m) & 0x80 != 0);
    }

    #[test]
    fn zero_page_x_stays_in_page_zero(zp in any::<u8>(), x in any::<u8>(), v in 1u8..) {
        // LDX #x; LDA zp,X
        let (mut cpu, mut bus) = setup(&[0xA2, x, 0xB5, zp]);
        let target = zp.wrapping_add(x) as u16;
        bus.write8(target, v);
        run(&mut cpu, &mut bus, 2);
        prop_assert_eq!(cpu.a(), v);
    }

    #[test]
    fn absolute_x_crosses_pages_without_wrapping(base in 0x0200u16..0x06F0, x in any::<u8>()) {
        // LDX #x; LDA base,X
        let [lo, hi] = base.to_le_bytes();
        let (mut cpu, mut bus) = setup(&[0xA2, x, 0xBD, lo, hi]);
        let target = base + x as u16;
        prop_assume!(!(ORIGIN..ORIGIN + 5).contains(&target));
        bus.write8(target, 0x5A);
        run(&mut cpu, &mut bus, 2);
        prop_assert_eq!(cpu.a(), 0x5A);
    }

    #[test]
    fn every_opcode_decodes_or_reports_itself(op in any::<u8>()) {
        let (mut cpu, mut bus) = setup(&[op, 0x00, 0x00]);
        match (lookup(op), cpu.step_instruction(&mut bus)) {
            (Some(ins), Ok(cycles)) => prop_assert_eq!(cycles, ins.cycles as u32),
            (None, Err(e)) => prop_assert_eq!(
                e,
                CpuError::UnimplementedOpcode { opcode: op, pc: ORIGIN, instruction_count: 0 }
            ),
            (decoded, result) => prop_assert!(false, "{op:#04X}: {decoded:?} vs {result:?}"),
        }
    }
}

#[test]
fn zero_page_x_wrap_example() {
    // operand $FF + X=2 -> $01, never $0101
    let (mut cpu, mut bus) = setup(&[0xA2, 0x02, 0xB5, 0xFF]);
    bus.write8(0x0001, 0x11);
    bus.write8(0x0101, 0x22);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a(), 0x11);
}

#[test]
fn absolute_x_page_cross_example() {
    // $02FF + X=1 -> $0300
    let (mut cpu, mut bus) = setup(&[0xA2, 0x01, 0xBD, 0xFF, 0x02]);
    bus.write8(0x0300, 0x33);
    bus.write8(0x0200, 0x44);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a(), 0x33);
}

#[test]
fn compare_zero_against_one_clears_carry() {
    let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xC9, 0x01]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.status() & CARRY, 0);
    assert_ne!(cpu.status() & NEGATIVE, 0);
}
