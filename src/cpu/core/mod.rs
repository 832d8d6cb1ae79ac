/*!
core::Cpu - 6502 CPU facade: register file plus cycle accounting.

Overview
========
`Cpu` owns the `CpuState`, the NMI edge detector, a remaining-cycle counter
and a running instruction count. It is stepped once per CPU cycle by the
master clock:

- Mid-instruction (`remaining_cycles > 0`): the step only decrements the
  counter.
- At an instruction boundary: the NMI line is sampled. A rising edge runs
  the interrupt sequence in place of an instruction. Otherwise one
  instruction is fetched, decoded and executed.
- Either way the counter is then reloaded with the table cycles (or the
  interrupt's 7) plus any DMA stall the bus armed, minus the cycle this
  step itself accounts for.

Errors
======
An opcode with no table entry yields `CpuError::UnimplementedOpcode` with the
opcode, its address and the number of instructions retired so far. The CPU
is left with PC past the bad opcode; callers are expected to stop.
*/

use crate::bus::Bus;
use crate::cpu::dispatch;
use crate::cpu::interrupt::{NMI_CYCLES, NmiEdgeDetector, service_nmi};
use crate::cpu::state::CpuState;
use crate::cpu::table::lookup;
use crate::error::CpuError;

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    state: CpuState,
    remaining_cycles: u32,
    instruction_count: u64,
    nmi: NmiEdgeDetector,
}

impl Cpu {
    /// Construct a new CPU with power-up defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Immutable view of the register file.
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Mutable register file access (tests, debuggers).
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Power-up registers, PC from $FFFC, and cleared bookkeeping.
    pub fn reset(&mut self, bus: &mut Bus) {
        self.state.reset(bus);
        self.remaining_cycles = 0;
        self.instruction_count = 0;
        self.nmi.reset();
    }

    pub fn remaining_cycles(&self) -> u32 {
        self.remaining_cycles
    }

    /// Instructions retired since the last reset.
    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    // ---------------------------------------------------------------------
    // Register accessors
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> u8 {
        self.state.status
    }

    pub fn set_a(&mut self, v: u8) {
        self.state.a = v;
    }
    pub fn set_x(&mut self, v: u8) {
        self.state.x = v;
    }
    pub fn set_y(&mut self, v: u8) {
        self.state.y = v;
    }
    pub fn set_sp(&mut self, v: u8) {
        self.state.sp = v;
    }
    pub fn set_pc(&mut self, v: u16) {
        self.state.pc = v;
    }
    pub fn set_status(&mut self, v: u8) {
        self.state.status = v;
    }

    // ---------------------------------------------------------------------
    // Stepping
    // ---------------------------------------------------------------------

    /// Advance by one CPU cycle.
    pub fn step(&mut self, bus: &mut Bus) -> Result<(), CpuError> {
        if self.remaining_cycles > 0 {
            self.remaining_cycles -= 1;
            return Ok(());
        }
        let used = self.begin_instruction(bus)?;
        self.remaining_cycles = used.saturating_sub(1);
        Ok(())
    }

    /// Run the next instruction (or NMI entry) immediately, dropping any
    /// unfinished cycles of the previous one. Returns the cycles it costs.
    pub fn step_instruction(&mut self, bus: &mut Bus) -> Result<u32, CpuError> {
        self.remaining_cycles = 0;
        self.begin_instruction(bus)
    }

    /// Run up to `max_instructions` whole instructions.
    pub fn run(&mut self, bus: &mut Bus, max_instructions: usize) -> Result<(), CpuError> {
        for _ in 0..max_instructions {
            self.step_instruction(bus)?;
        }
        Ok(())
    }

    fn begin_instruction(&mut self, bus: &mut Bus) -> Result<u32, CpuError> {
        if self.nmi.sample(bus.nmi_line()) {
            service_nmi(&mut self.state, bus);
            return Ok(NMI_CYCLES + bus.take_extra_cycles());
        }

        let pc = self.state.pc;
        let opcode = bus.read8(pc);
        self.state.advance_pc(1);

        let unimplemented = CpuError::UnimplementedOpcode {
            opcode,
            pc,
            instruction_count: self.instruction_count,
        };
        let ins = lookup(opcode).ok_or(unimplemented)?;
        log::trace!("{pc:04X}  {opcode:02X}  {}", ins.op.mnemonic());

        if !dispatch::execute(ins, &mut self.state, bus)? {
            return Err(unimplemented);
        }
        self.instruction_count += 1;
        Ok(ins.cycles as u32 + bus.take_extra_cycles())
    }
}
