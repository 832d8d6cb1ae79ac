/*!
interfaces: typed views borrowed out of the `Bus` for one step.

- `PpuView`: what the video unit may touch. The PPU register state (status
  bits, OAM, scroll, pattern bases) plus the full PPU address space through
  `VramPort`.
- `ApuView`: what the audio unit may touch. Per-channel register reads and
  the two reload handshakes.
- `CpuMemoryView`: side-effect-free CPU reads used as the OAM DMA source.

Each view borrows only the bus fields it needs, so the clock can hand one to
a peripheral while still owning the bus.
*/

use crate::bus::apu_registers::ApuRegisterBank;
use crate::bus::dma::CpuMemory;
use crate::bus::ppu_registers::PpuRegisters;
use crate::bus::ppu_space::{PpuAddressSpace, VideoMemory, VramPort};
use crate::bus::ram::Ram;
use crate::cartridge::Cartridge;

/// Video-unit view of the bus.
pub struct PpuView<'a> {
    regs: &'a mut PpuRegisters,
    vram: VramPort<'a>,
}

impl<'a> PpuView<'a> {
    pub fn from_parts(
        regs: &'a mut PpuRegisters,
        space: &'a mut PpuAddressSpace,
        cartridge: Option<&'a mut Cartridge>,
    ) -> Self {
        Self {
            regs,
            vram: VramPort::new(space, cartridge),
        }
    }

    pub fn registers(&self) -> &PpuRegisters {
        self.regs
    }

    pub fn registers_mut(&mut self) -> &mut PpuRegisters {
        self.regs
    }

    pub fn set_vblank(&mut self, on: bool) {
        self.regs.set_vblank(on);
    }

    pub fn oam(&self) -> &[u8] {
        self.regs.oam()
    }

    /// Read the PPU address space ($0000-$3FFF) without side effects.
    pub fn vram_read(&self, addr: u16) -> u8 {
        self.vram.peek(addr)
    }

    pub fn vram_write(&mut self, addr: u16, value: u8) {
        self.vram.write(addr, value);
    }

    /// Pattern-table byte from the background window selected by PPUCTRL.
    pub fn background_pattern(&self, offset: u16) -> u8 {
        self.vram
            .peek(self.regs.background_pattern_base() | (offset & 0x0FFF))
    }

    /// Pattern-table byte from the sprite window selected by PPUCTRL.
    pub fn sprite_pattern(&self, offset: u16) -> u8 {
        self.vram
            .peek(self.regs.sprite_pattern_base() | (offset & 0x0FFF))
    }
}

/// Audio-unit view of the bus.
pub struct ApuView<'a> {
    bank: &'a mut ApuRegisterBank,
}

impl<'a> ApuView<'a> {
    pub fn new(bank: &'a mut ApuRegisterBank) -> Self {
        Self { bank }
    }

    pub fn registers(&self) -> &ApuRegisterBank {
        self.bank
    }

    pub fn pulse1(&self) -> &[u8] {
        self.bank.pulse1()
    }

    pub fn pulse2(&self) -> &[u8] {
        self.bank.pulse2()
    }

    pub fn triangle(&self) -> &[u8] {
        self.bank.triangle()
    }

    pub fn noise(&self) -> &[u8] {
        self.bank.noise()
    }

    pub fn dmc(&self) -> &[u8] {
        self.bank.dmc()
    }

    pub fn status(&self) -> u8 {
        self.bank.status()
    }

    pub fn take_linear_reload(&mut self) -> Option<u8> {
        self.bank.take_linear_reload()
    }

    pub fn take_noise_reload(&mut self) -> Option<u8> {
        self.bank.take_noise_reload()
    }
}

/// RAM and cartridge reads with no register side effects.
pub(in crate::bus) struct CpuMemoryView<'a> {
    ram: &'a Ram,
    cartridge: Option<&'a mut Cartridge>,
}

impl<'a> CpuMemoryView<'a> {
    pub(in crate::bus) fn from_parts(ram: &'a Ram, cartridge: Option<&'a mut Cartridge>) -> Self {
        Self { ram, cartridge }
    }
}

impl CpuMemory for CpuMemoryView<'_> {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram.read(addr),
            0x4020..=0xFFFF => self.cartridge.as_deref_mut().map_or(0, |c| c.cpu_read(addr)),
            // Register windows read as 0 during DMA.
            _ => 0,
        }
    }
}
