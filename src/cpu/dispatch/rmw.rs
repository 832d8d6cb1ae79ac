/*!
rmw.rs - Read-modify-write family (ASL LSR ROL ROR INC DEC).

The operand location is resolved once; the value is read, transformed and
written back to the same place (the accumulator for the `Accumulator` forms,
otherwise the effective address).
*/

use crate::bus::Bus;
use crate::cpu::addressing::{AddressingMode, Operand};
use crate::cpu::execute::{asl, lsr, rol, ror};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Instruction, Operation};
use crate::error::CpuError;

fn inc<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let r = v.wrapping_add(1);
    cpu.update_zn(r);
    r
}

fn dec<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let r = v.wrapping_sub(1);
    cpu.update_zn(r);
    r
}

pub(super) fn handle<C: CpuRegs>(
    ins: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, CpuError> {
    let transform: fn(&mut C, u8) -> u8 = match ins.op {
        Operation::Asl => asl,
        Operation::Lsr => lsr,
        Operation::Rol => rol,
        Operation::Ror => ror,
        Operation::Inc => inc,
        Operation::Dec => dec,
        _ => return Ok(false),
    };
    modify(cpu, bus, ins.mode, transform)?;
    Ok(true)
}

fn modify<C: CpuRegs>(
    cpu: &mut C,
    bus: &mut Bus,
    mode: AddressingMode,
    transform: fn(&mut C, u8) -> u8,
) -> Result<(), CpuError> {
    match mode.resolve(cpu, bus) {
        Operand::Accumulator => {
            let old = cpu.a();
            let new = transform(cpu, old);
            cpu.set_a(new);
            Ok(())
        }
        Operand::Address(addr) if mode != AddressingMode::Immediate => {
            let old = bus.read8(addr);
            let new = transform(cpu, old);
            bus.write8(addr, new);
            Ok(())
        }
        _ => Err(CpuError::IllegalAddressingOperation { mode }),
    }
}
