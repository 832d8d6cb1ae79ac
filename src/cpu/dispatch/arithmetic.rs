/*!
arithmetic.rs - ADC / SBC and register increment / decrement.

ADC and SBC go through the bit-serial adder in `execute`; decimal mode is
ignored. INX/INY/DEX/DEY wrap modulo 256 and set Z/N.
*/

use crate::bus::Bus;
use crate::cpu::execute::{adc, sbc};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Instruction, Operation};
use crate::error::CpuError;

pub(super) fn handle<C: CpuRegs>(
    ins: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, CpuError> {
    match ins.op {
        Operation::Adc => {
            let v = ins.mode.read(cpu, bus)?;
            adc(cpu, v);
        }
        Operation::Sbc => {
            let v = ins.mode.read(cpu, bus)?;
            sbc(cpu, v);
        }
        Operation::Inx => {
            let r = cpu.x().wrapping_add(1);
            cpu.set_x(r);
            cpu.update_zn(r);
        }
        Operation::Iny => {
            let r = cpu.y().wrapping_add(1);
            cpu.set_y(r);
            cpu.update_zn(r);
        }
        Operation::Dex => {
            let r = cpu.x().wrapping_sub(1);
            cpu.set_x(r);
            cpu.update_zn(r);
        }
        Operation::Dey => {
            let r = cpu.y().wrapping_sub(1);
            cpu.set_y(r);
            cpu.update_zn(r);
        }
        _ => return Ok(false),
    }
    Ok(true)
}
