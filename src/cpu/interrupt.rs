/*!
interrupt.rs - Non-maskable interrupt sequencing.

Only one interrupt source exists in this core: the NMI line, a level signal
equal to `PPUCTRL bit 7 AND PPUSTATUS bit 7`. The CPU samples it once per
instruction boundary and `NmiEdgeDetector` turns the samples into a single
trigger per low-to-high transition. Holding the line high never re-triggers.

Service sequence (7 cycles):
  1. push PC (high byte, then low byte)
  2. push P with bit 4 clear and bit 5 set
  3. set I
  4. PC <- word at $FFFA
*/

use crate::bus::Bus;
use crate::cpu::execute::{push_status, push_word};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::IRQ_DISABLE;

pub const NMI_VECTOR: u16 = 0xFFFA;

/// Cycles consumed by the service sequence.
pub const NMI_CYCLES: u32 = 7;

/// Rising-edge detector over the sampled NMI line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NmiEdgeDetector {
    previous: bool,
}

impl NmiEdgeDetector {
    pub const fn new() -> Self {
        Self { previous: false }
    }

    /// Feed one sample; true exactly on a low-to-high transition.
    pub fn sample(&mut self, line: bool) -> bool {
        let rising = line && !self.previous;
        self.previous = line;
        rising
    }

    pub fn reset(&mut self) {
        self.previous = false;
    }
}

/// Divert control flow through the NMI vector.
pub(crate) fn service_nmi<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let pc = cpu.pc();
    push_word(cpu, bus, pc);
    push_status(cpu, bus, false);
    cpu.assign_flag(IRQ_DISABLE, true);
    let vector = bus.read16(NMI_VECTOR);
    cpu.set_pc(vector);
    log::debug!("NMI: {pc:#06X} -> {vector:#06X}");
}
