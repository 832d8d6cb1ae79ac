/*!
dispatch - Executes one decoded instruction.

Overview
========
`execute` receives an `Instruction` already looked up in the opcode table
(opcode byte consumed, PC on the first operand byte) and offers it to each
family handler in turn. The first family that recognizes the operation runs
it; the dispatcher then advances PC by the addressing mode's fixed step
unless the operation transfers control.

Families
========
```text
    load_store   LDA LDX LDY STA STX STY
    arithmetic   ADC SBC INX INY DEX DEY
    logical      AND ORA EOR BIT
    compare      CMP CPX CPY
    rmw          ASL LSR ROL ROR INC DEC
    branches     BPL BMI BVC BVS BCC BCS BNE BEQ
    control_flow JMP JSR RTS RTI
    misc         transfers, stack, flag set/clear, NOPs
```

Return Contract
===============
`Ok(true)` when a family ran the instruction, `Ok(false)` if nothing claimed
it (the caller reports this as an unimplemented opcode), `Err` when an
addressing helper refused the access.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Instruction, Operation};
use crate::error::CpuError;

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

type Handler<C> = fn(Instruction, &mut C, &mut Bus) -> Result<bool, CpuError>;

/// Run one decoded instruction and apply the post-execution PC step.
pub(crate) fn execute<C: CpuRegs>(
    ins: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, CpuError> {
    let families: [Handler<C>; 8] = [
        load_store::handle,
        arithmetic::handle,
        logical::handle,
        compare::handle,
        rmw::handle,
        branches::handle,
        control_flow::handle,
        misc::handle,
    ];

    for handle in families {
        if handle(ins, cpu, bus)? {
            if !transfers_control(ins.op) {
                cpu.advance_pc(ins.mode.pc_step());
            }
            return Ok(true);
        }
    }
    Ok(false)
}

/// Operations that leave PC exactly where they put it.
const fn transfers_control(op: Operation) -> bool {
    matches!(
        op,
        Operation::Jmp | Operation::Jsr | Operation::Rts | Operation::Rti
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::CpuState;
    use crate::cpu::table::{OPCODE_TABLE, lookup};

    #[test]
    fn every_table_entry_is_claimed_by_a_family() {
        for (opcode, entry) in OPCODE_TABLE.iter().enumerate() {
            let Some(ins) = entry else { continue };
            // Fresh RAM-only bus; PC in RAM so operand fetches are harmless.
            let mut bus = Bus::new();
            let mut cpu = CpuState::new();
            cpu.pc = 0x0400;
            let claimed = execute(*ins, &mut cpu, &mut bus);
            assert_eq!(claimed, Ok(true), "opcode {opcode:#04X} not handled");
        }
    }

    #[test]
    fn pc_step_applied_for_non_transfer_ops() {
        let mut bus = Bus::new();
        let mut cpu = CpuState::new();
        cpu.pc = 0x0400;
        // LDA $1234 (absolute): two operand bytes.
        bus.write8(0x0400, 0x34);
        bus.write8(0x0401, 0x02);
        let ins = lookup(0xAD).unwrap();
        assert_eq!(execute(ins, &mut cpu, &mut bus), Ok(true));
        assert_eq!(cpu.pc, 0x0402);
    }

    #[test]
    fn jmp_does_not_get_extra_step() {
        let mut bus = Bus::new();
        let mut cpu = CpuState::new();
        cpu.pc = 0x0400;
        bus.write8(0x0400, 0x00);
        bus.write8(0x0401, 0x05);
        let ins = lookup(0x4C).unwrap();
        assert_eq!(execute(ins, &mut cpu, &mut bus), Ok(true));
        assert_eq!(cpu.pc, 0x0500);
    }
}
