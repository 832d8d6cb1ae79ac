/*!
compare.rs - CMP / CPX / CPY.

`register - memory` through the shared bit-serial subtractor; C set iff
register >= memory, Z/N from the discarded difference, V untouched.
*/

use crate::bus::Bus;
use crate::cpu::execute::compare;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Instruction, Operation};
use crate::error::CpuError;

pub(super) fn handle<C: CpuRegs>(
    ins: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, CpuError> {
    let reg = match ins.op {
        Operation::Cmp => cpu.a(),
        Operation::Cpx => cpu.x(),
        Operation::Cpy => cpu.y(),
        _ => return Ok(false),
    };
    let v = ins.mode.read(cpu, bus)?;
    compare(cpu, reg, v);
    Ok(true)
}
