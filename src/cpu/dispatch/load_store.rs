/*!
load_store.rs - Load / store family.

Loads set Z/N from the loaded value; stores touch no flags. All operand
arithmetic is delegated to the addressing mode.

```text
    LDA: A9 A5 B5 AD BD B9 A1 B1
    LDX: A2 A6 B6 AE BE
    LDY: A0 A4 B4 AC BC
    STA: 85 95 8D 9D 99 81 91
    STX: 86 96 8E
    STY: 84 94 8C
```
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Instruction, Operation};
use crate::error::CpuError;

pub(super) fn handle<C: CpuRegs>(
    ins: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, CpuError> {
    let mode = ins.mode;
    match ins.op {
        Operation::Lda => {
            let v = mode.read(cpu, bus)?;
            cpu.set_a(v);
            cpu.update_zn(v);
        }
        Operation::Ldx => {
            let v = mode.read(cpu, bus)?;
            cpu.set_x(v);
            cpu.update_zn(v);
        }
        Operation::Ldy => {
            let v = mode.read(cpu, bus)?;
            cpu.set_y(v);
            cpu.update_zn(v);
        }
        Operation::Sta => {
            let v = cpu.a();
            mode.write(cpu, bus, v)?;
        }
        Operation::Stx => {
            let v = cpu.x();
            mode.write(cpu, bus, v)?;
        }
        Operation::Sty => {
            let v = cpu.y();
            mode.write(cpu, bus, v)?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::bus::Bus;
    use crate::cartridge::Cartridge;
    use crate::cpu::core::Cpu;
    use crate::test_utils::build_nrom_with_prg;

    fn setup(prg: &[u8]) -> (Cpu, Bus) {
        let rom = build_nrom_with_prg(prg, None);
        let cart = Cartridge::from_ines_bytes(&rom).expect("parse");
        let mut bus = Bus::new();
        bus.attach_cartridge(cart);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn lda_immediate_sets_flags() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xA9, 0x80]);
        cpu.step_instruction(&mut bus).unwrap();
        assert_eq!(cpu.a(), 0);
        assert!(cpu.state().zero());
        cpu.step_instruction(&mut bus).unwrap();
        assert_eq!(cpu.a(), 0x80);
        assert!(cpu.state().negative());
        assert_eq!(cpu.pc(), 0x8004);
    }

    #[test]
    fn ldx_zero_page_y_wraps() {
        // LDX $F0,Y with Y=0x20 reads $0010.
        let (mut cpu, mut bus) = setup(&[0xB6, 0xF0]);
        cpu.set_y(0x20);
        bus.write8(0x0010, 0x5A);
        cpu.step_instruction(&mut bus).unwrap();
        assert_eq!(cpu.x(), 0x5A);
        assert_eq!(cpu.pc(), 0x8002);
    }

    #[test]
    fn sta_absolute_x_crosses_page() {
        // STA $02FF,X with X=1 stores to $0300.
        let (mut cpu, mut bus) = setup(&[0x9D, 0xFF, 0x02]);
        cpu.set_a(0x77);
        cpu.set_x(0x01);
        cpu.step_instruction(&mut bus).unwrap();
        assert_eq!(bus.read8(0x0300), 0x77);
        assert_eq!(cpu.pc(), 0x8003);
    }

    #[test]
    fn stores_leave_flags_alone() {
        let (mut cpu, mut bus) = setup(&[0x86, 0x20, 0x84, 0x21]);
        cpu.set_x(0x00);
        cpu.set_y(0x90);
        let before = cpu.status();
        cpu.step_instruction(&mut bus).unwrap();
        cpu.step_instruction(&mut bus).unwrap();
        assert_eq!(cpu.status(), before);
        assert_eq!(bus.read8(0x0020), 0x00);
        assert_eq!(bus.read8(0x0021), 0x90);
    }

    #[test]
    fn lda_indirect_y_through_zero_page_pointer() {
        let (mut cpu, mut bus) = setup(&[0xB1, 0x40]);
        bus.write8(0x0040, 0x00);
        bus.write8(0x0041, 0x03);
        bus.write8(0x0305, 0xC3);
        cpu.set_y(0x05);
        cpu.step_instruction(&mut bus).unwrap();
        assert_eq!(cpu.a(), 0xC3);
    }
}
