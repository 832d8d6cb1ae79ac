/*!
Error types shared across the emulator core.

Taxonomy
- `CpuError`: fatal conditions raised while executing an instruction. Either
  the opcode has no decode entry, or a handler tried to store through an
  addressing mode that has no storage location. CPU and bus state are not
  recoverable once one of these is raised mid-instruction.
- `CartridgeError`: malformed cartridge images rejected by the loader.
- `ClockError`: what the master clock surfaces to its caller after stopping.

An unsupported mapper number is deliberately not an error: the loader warns
and installs an unmapped cartridge so the session can still start.
*/

use thiserror::Error;

use crate::cpu::addressing::AddressingMode;

/// Fatal CPU conditions. The clock stops on the first one it sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error(
        "unimplemented opcode {opcode:#04X} at {pc:#06X} after {instruction_count} instructions"
    )]
    UnimplementedOpcode {
        opcode: u8,
        pc: u16,
        instruction_count: u64,
    },

    #[error("illegal write through {mode:?} addressing")]
    IllegalAddressingOperation { mode: AddressingMode },
}

/// Reasons a cartridge image can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    #[error("image is {0} bytes; a 16-byte header is required")]
    TooShort(usize),

    #[error("bad header tag {0:?} (expected \"NES\")")]
    BadTag([u8; 3]),

    #[error("unknown format discriminant {0:#04X}")]
    UnknownFormat(u8),

    #[error("{section} truncated: expected {expected} bytes, found {actual}")]
    Truncated {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Conditions surfaced by the master clock's batch-execution boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error(transparent)]
    Cpu(#[from] CpuError),

    #[error("clock is stopped; reset it before running again")]
    Stopped,
}
