/*!
misc.rs - Transfers, stack, flag set/clear and no-ops.

```text
    Transfers : TAX TAY TXA TYA TSX TXS  (TXS alone leaves flags alone)
    Stack     : PHA PHP PLA PLP
    Flags     : CLC SEC CLI SEI CLV CLD SED
    No-ops    : NOP and the unofficial NOP forms
```

PHP pushes P with bits 4 and 5 set; PLP drops bit 4 and forces bit 5.
Unofficial NOPs only consume their operand bytes (through the dispatcher's PC
step) and their table cycles; they never read the operand location.
*/

use crate::bus::Bus;
use crate::cpu::execute::{pop, pull_status, push, push_status};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, DECIMAL, IRQ_DISABLE, OVERFLOW};
use crate::cpu::table::{Instruction, Operation};
use crate::error::CpuError;

pub(super) fn handle<C: CpuRegs>(
    ins: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, CpuError> {
    match ins.op {
        // Transfers
        Operation::Tax => {
            let v = cpu.a();
            cpu.set_x(v);
            cpu.update_zn(v);
        }
        Operation::Tay => {
            let v = cpu.a();
            cpu.set_y(v);
            cpu.update_zn(v);
        }
        Operation::Txa => {
            let v = cpu.x();
            cpu.set_a(v);
            cpu.update_zn(v);
        }
        Operation::Tya => {
            let v = cpu.y();
            cpu.set_a(v);
            cpu.update_zn(v);
        }
        Operation::Tsx => {
            let v = cpu.sp();
            cpu.set_x(v);
            cpu.update_zn(v);
        }
        Operation::Txs => {
            let v = cpu.x();
            cpu.set_sp(v);
        }

        // Stack
        Operation::Pha => {
            let a = cpu.a();
            push(cpu, bus, a);
        }
        Operation::Php => push_status(cpu, bus, true),
        Operation::Pla => {
            let v = pop(cpu, bus);
            cpu.set_a(v);
            cpu.update_zn(v);
        }
        Operation::Plp => pull_status(cpu, bus),

        // Flags
        Operation::Clc => cpu.assign_flag(CARRY, false),
        Operation::Sec => cpu.assign_flag(CARRY, true),
        Operation::Cli => cpu.assign_flag(IRQ_DISABLE, false),
        Operation::Sei => cpu.assign_flag(IRQ_DISABLE, true),
        Operation::Clv => cpu.assign_flag(OVERFLOW, false),
        Operation::Cld => cpu.assign_flag(DECIMAL, false),
        Operation::Sed => cpu.assign_flag(DECIMAL, true),

        Operation::Nop | Operation::IllegalNop => {}

        _ => return Ok(false),
    }
    Ok(true)
}
