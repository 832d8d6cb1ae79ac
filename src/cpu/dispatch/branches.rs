/*!
branches.rs - Relative branches (BPL BMI BVC BVS BCC BCS BNE BEQ).

The displacement byte is always consumed first: PC moves past it whether or
not the branch is taken, and only then is the signed displacement added when
the condition holds. The mode's `pc_step` is 0 for Relative, so the
dispatcher adds nothing afterwards.

No taken/page-cross cycle adjustment is made; timing comes from the static
table.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, NEGATIVE, OVERFLOW, ZERO};
use crate::cpu::table::{Instruction, Operation};
use crate::error::CpuError;

pub(super) fn handle<C: CpuRegs>(
    ins: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, CpuError> {
    let taken = match ins.op {
        Operation::Bpl => !cpu.is_flag_set(NEGATIVE),
        Operation::Bmi => cpu.is_flag_set(NEGATIVE),
        Operation::Bvc => !cpu.is_flag_set(OVERFLOW),
        Operation::Bvs => cpu.is_flag_set(OVERFLOW),
        Operation::Bcc => !cpu.is_flag_set(CARRY),
        Operation::Bcs => cpu.is_flag_set(CARRY),
        Operation::Bne => !cpu.is_flag_set(ZERO),
        Operation::Beq => cpu.is_flag_set(ZERO),
        _ => return Ok(false),
    };
    branch(cpu, bus, taken);
    Ok(true)
}

fn branch<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, taken: bool) {
    let offset = bus.read_i8(cpu.pc());
    cpu.advance_pc(1);
    if taken {
        let target = cpu.pc().wrapping_add(offset as i16 as u16);
        cpu.set_pc(target);
    }
}
