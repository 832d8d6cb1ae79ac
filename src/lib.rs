#![doc = r#"
nescore library crate: a 6502 CPU and memory-bus core for NES-style hardware.

Modules:
- apu: audio unit stub that services the register bank's reload handshakes
- bus: Bus owning the CPU address space, plus the master clock
- cartridge: iNES loader and cartridge metadata; constructs a Mapper
- controller: standard controller shift register
- cpu: 6502 CPU core (facade + state + decode table + dispatch + interrupt)
- error: error enums for the CPU, cartridge loader and clock
- mapper: Mapper trait, NROM (mapper 0) and the unmapped fallback
- mappers: bank-switching boards (MMC1)
- peripheral: VideoUnit/AudioUnit traits the clock drives
- ppu: timing-only video unit raising vblank

Logging goes through the `log` facade; install a logger in the application
to see it.

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod mapper;
pub mod mappers;
pub mod peripheral;
pub mod ppu;

pub use apu::ReloadServicingApu;
pub use bus::{Bus, ClockConfig, MasterClock, Pacer};
pub use cartridge::Cartridge;
pub use controller::{Button, Controller};
pub use cpu::core::Cpu;
pub use error::{CartridgeError, ClockError, CpuError};
pub use ppu::TimingPpu;

#[cfg(test)]
pub mod test_utils;
