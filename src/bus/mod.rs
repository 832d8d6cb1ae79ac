#![doc = r#"
Bus: sole owner of the CPU address space.

CPU memory map
| Range         | Target |
|---------------|--------|
| $0000-$1FFF   | 2 KiB internal RAM, mirrored every $0800 |
| $2000-$3FFF   | PPU registers, mirrored every 8 bytes |
| $4000-$4013   | APU register bank |
| $4014         | OAM DMA trigger (write); reads 0 |
| $4015         | APU status/enable |
| $4016         | controller strobe (write) / controller 1 (read) |
| $4017         | APU frame counter (write) / controller 2 (read) |
| $4018-$401F   | unused, reads 0 |
| $4020-$FFFF   | cartridge mapper (PRG-RAM, PRG-ROM, bank registers) |

With no cartridge attached, cartridge space reads 0 and writes are dropped.

Submodules
- ram: work RAM.
- ppu_registers: $2000-$3FFF register semantics and OAM.
- ppu_space: nametable/palette RAM and mirroring rules.
- apu_registers: $4000-$4017 bank with reload handshakes.
- dma: OAM DMA copy and the one-shot stall counter.
- interfaces: typed views handed to peripherals.
- clock: master clock and real-time pacing.
"#]

pub mod apu_registers;
pub mod clock;
pub mod dma;
pub mod interfaces;
pub mod ppu_registers;
pub mod ppu_space;
pub mod ram;

pub use apu_registers::{ApuRegisterBank, ReloadRequest};
pub use clock::{ClockConfig, MasterClock, Pacer};
pub use dma::{ExtraCycles, OAM_DMA_STALL_CYCLES};
pub use interfaces::{ApuView, PpuView};
pub use ppu_registers::PpuRegisters;
pub use ppu_space::{PpuAddressSpace, VideoMemory, VramPort};
pub use ram::Ram;

use crate::cartridge::Cartridge;
use crate::controller::Controller;
use interfaces::CpuMemoryView;

#[derive(Default)]
pub struct Bus {
    ram: Ram,
    ppu_regs: PpuRegisters,
    vram: PpuAddressSpace,
    apu: ApuRegisterBank,
    controllers: [Controller; 2],
    cartridge: Option<Cartridge>,
    extra_cycles: ExtraCycles,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cartridge, replacing any previous one.
    pub fn attach_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
    }

    pub fn detach_cartridge(&mut self) -> Option<Cartridge> {
        self.cartridge.take()
    }

    /// Power-cycle everything except the inserted cartridge's ROM.
    pub fn reset(&mut self) {
        self.ram.reset();
        self.ppu_regs.reset();
        self.vram.reset();
        self.apu.reset();
        self.controllers = Default::default();
        self.extra_cycles = ExtraCycles::default();
        if let Some(cart) = self.cartridge.as_mut() {
            cart.reset();
        }
    }

    // ---------------------------------------------------------------------
    // CPU-visible access
    // ---------------------------------------------------------------------

    pub fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram.read(addr),
            0x2000..=0x3FFF => {
                let mut port = VramPort::new(&mut self.vram, self.cartridge.as_mut());
                self.ppu_regs.read(addr, &mut port)
            }
            0x4000..=0x4013 | 0x4015 => self.apu.read(addr),
            0x4016 => self.controllers[0].read(),
            0x4017 => self.controllers[1].read(),
            0x4014 | 0x4018..=0x401F => 0,
            0x4020..=0xFFFF => self.cartridge.as_mut().map_or(0, |c| c.cpu_read(addr)),
        }
    }

    /// Little-endian word; each byte is decoded independently.
    pub fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr) as u16;
        let hi = self.read8(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Byte reinterpreted as two's-complement (branch displacements).
    pub fn read_i8(&mut self, addr: u16) -> i8 {
        self.read8(addr) as i8
    }

    pub fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram.write(addr, value),
            0x2000..=0x3FFF => {
                let mut port = VramPort::new(&mut self.vram, self.cartridge.as_mut());
                self.ppu_regs.write(addr, value, &mut port);
            }
            dma::OAM_DMA_REG => self.oam_dma(value),
            0x4016 => {
                for c in &mut self.controllers {
                    c.write_strobe(value);
                }
            }
            0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write(addr, value),
            0x4018..=0x401F => {}
            0x4020..=0xFFFF => {
                if let Some(cart) = self.cartridge.as_mut() {
                    cart.cpu_write(addr, value);
                }
            }
        }
    }

    fn oam_dma(&mut self, page: u8) {
        let mut source = CpuMemoryView::from_parts(&self.ram, self.cartridge.as_mut());
        dma::copy_page(&mut source, &mut self.ppu_regs, page);
        self.extra_cycles.arm(OAM_DMA_STALL_CYCLES);
        log::debug!("OAM DMA from page {page:#04X}");
    }

    // ---------------------------------------------------------------------
    // CPU cycle accounting and interrupt line
    // ---------------------------------------------------------------------

    /// NMI level: PPUCTRL enable bit AND PPUSTATUS vblank bit.
    pub fn nmi_line(&self) -> bool {
        self.ppu_regs.nmi_enabled() && self.ppu_regs.vblank()
    }

    /// Read and clear the pending DMA stall.
    pub fn take_extra_cycles(&mut self) -> u32 {
        self.extra_cycles.take()
    }

    pub fn pending_extra_cycles(&self) -> u32 {
        self.extra_cycles.peek()
    }

    // ---------------------------------------------------------------------
    // Peripheral views
    // ---------------------------------------------------------------------

    pub fn ppu_view(&mut self) -> PpuView<'_> {
        PpuView::from_parts(&mut self.ppu_regs, &mut self.vram, self.cartridge.as_mut())
    }

    pub fn apu_view(&mut self) -> ApuView<'_> {
        ApuView::new(&mut self.apu)
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn cartridge_mut(&mut self) -> Option<&mut Cartridge> {
        self.cartridge.as_mut()
    }

    /// Controller on port `index` (0 = $4016, 1 = $4017). Out-of-range
    /// indices select port 2.
    pub fn controller_mut(&mut self, index: usize) -> &mut Controller {
        &mut self.controllers[index.min(1)]
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn ppu_registers(&self) -> &PpuRegisters {
        &self.ppu_regs
    }

    pub fn ppu_registers_mut(&mut self) -> &mut PpuRegisters {
        &mut self.ppu_regs
    }

    pub fn ppu_space(&self) -> &PpuAddressSpace {
        &self.vram
    }

    pub fn apu_registers(&self) -> &ApuRegisterBank {
        &self.apu
    }

    pub fn apu_registers_mut(&mut self) -> &mut ApuRegisterBank {
        &mut self.apu
    }
}
