/*!
logical.rs - AND / ORA / EOR / BIT.
*/

use crate::bus::Bus;
use crate::cpu::execute::{and, bit, eor, ora};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Instruction, Operation};
use crate::error::CpuError;

pub(super) fn handle<C: CpuRegs>(
    ins: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, CpuError> {
    let apply: fn(&mut C, u8) = match ins.op {
        Operation::And => and,
        Operation::Ora => ora,
        Operation::Eor => eor,
        Operation::Bit => bit,
        _ => return Ok(false),
    };
    let v = ins.mode.read(cpu, bus)?;
    apply(cpu, v);
    Ok(true)
}
