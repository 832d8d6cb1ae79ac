/*!
cpu - 6502 processor core.

```text
    state.rs      - Register file (`CpuState`) and status flag masks.
    regs.rs       - `CpuRegs`: register/flag trait the engine is generic over.
    addressing.rs - Addressing modes, operand resolution, PC step.
    table.rs      - 256-entry opcode table: operation, mode, base cycles.
    execute.rs    - Bit-serial adder, compare, shifts, stack helpers.
    dispatch/     - Per-family instruction executors.
    interrupt.rs  - NMI edge detector and service sequence.
    core/         - `Cpu` facade: cycle accounting and stepping.
```

Usage:
```rust,ignore
use nescore::cpu::Cpu;

let mut cpu = Cpu::new();
cpu.reset(&mut bus);
cpu.step(&mut bus)?;
```
*/

pub mod addressing;
pub mod core;
pub mod dispatch;
pub mod execute;
pub mod interrupt;
pub mod regs;
pub mod state;
pub mod table;

pub use crate::cpu::addressing::AddressingMode;
pub use crate::cpu::core::Cpu;
pub use crate::cpu::regs::CpuRegs;
pub use crate::cpu::state::{
    BREAK, CARRY, CpuState, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, UNUSED, ZERO,
};
pub use crate::cpu::table::{Instruction, Operation};
