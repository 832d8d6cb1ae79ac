/*!
control_flow.rs - JMP / JSR / RTS / RTI.

These set PC directly; the dispatcher does not apply the mode's PC step
afterwards.

JSR pushes the address of its last operand byte (high byte first) and RTS
adds one to the pulled address. RTI pulls status and then PC and uses the
pulled PC unchanged. BRK is not part of this core and never reaches here.
*/

use crate::bus::Bus;
use crate::cpu::addressing::AddressingMode;
use crate::cpu::execute::{pop_word, pull_status, push_word};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Instruction, Operation};
use crate::error::CpuError;

pub(super) fn handle<C: CpuRegs>(
    ins: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, CpuError> {
    match ins.op {
        Operation::Jmp => op_jmp(cpu, bus, ins.mode)?,
        Operation::Jsr => op_jsr(cpu, bus),
        Operation::Rts => op_rts(cpu, bus),
        Operation::Rti => op_rti(cpu, bus),
        _ => return Ok(false),
    }
    Ok(true)
}

/// Absolute or indirect; the indirect form carries the page-wrap defect.
fn op_jmp<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, mode: AddressingMode) -> Result<(), CpuError> {
    let target = mode
        .effective_address(cpu, bus)
        .ok_or(CpuError::IllegalAddressingOperation { mode })?;
    cpu.set_pc(target);
    Ok(())
}

fn op_jsr<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let target = bus.read16(cpu.pc());
    let ret = cpu.pc().wrapping_add(1);
    push_word(cpu, bus, ret);
    cpu.set_pc(target);
}

fn op_rts<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let ret = pop_word(cpu, bus);
    cpu.set_pc(ret.wrapping_add(1));
}

fn op_rti<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    pull_status(cpu, bus);
    let pc = pop_word(cpu, bus);
    cpu.set_pc(pc);
}
