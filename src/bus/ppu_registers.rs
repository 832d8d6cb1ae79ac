#![doc = r#"
PPU register window ($2000-$3FFF, eight registers mirrored every 8 bytes).

| Reg   | Name      | CPU access | Behaviour |
|-------|-----------|------------|-----------|
| $2000 | PPUCTRL   | write      | NMI enable (7), sprite/background pattern base (3/4), VRAM increment (2) |
| $2001 | PPUMASK   | write      | stored for the video unit |
| $2002 | PPUSTATUS | read       | returns status, then clears vblank and the shared write toggle |
| $2003 | OAMADDR   | write      | OAM cursor |
| $2004 | OAMDATA   | read/write | OAM byte at the cursor; writes advance the cursor |
| $2005 | PPUSCROLL | write x2   | X then Y, sharing the $2006 toggle |
| $2006 | PPUADDR   | write x2   | high then low byte of the 14-bit VRAM address |
| $2007 | PPUDATA   | read/write | buffered read / direct write, then VRAM address += 1 or 32 |

Reads of write-only registers return the open-bus latch: the last value
driven through the window in either direction.

PPUDATA reads below $3F00 return the buffer and then refill it from the
current address. Palette reads return immediately while the buffer is filled
from the nametable byte underneath ($3Fxx - $1000).
"#]

use crate::bus::dma::OamWriter;
use crate::bus::ppu_space::VideoMemory;

pub const CTRL_NMI_ENABLE: u8 = 0x80;
pub const CTRL_BG_PATTERN_HI: u8 = 0x10;
pub const CTRL_SPRITE_PATTERN_HI: u8 = 0x08;
pub const CTRL_INCREMENT_32: u8 = 0x04;

pub const STATUS_VBLANK: u8 = 0x80;
pub const STATUS_SPRITE_ZERO_HIT: u8 = 0x40;
pub const STATUS_SPRITE_OVERFLOW: u8 = 0x20;

pub const OAM_SIZE: usize = 256;

#[inline]
pub fn mirror_ppu_reg(addr: u16) -> u16 {
    0x2000 | (addr & 0x0007)
}

/// Bus-owned PPU state shared between the CPU window and the video unit.
#[derive(Clone, Debug)]
pub struct PpuRegisters {
    ctrl: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,
    oam: [u8; OAM_SIZE],
    vram_addr: u16,
    write_toggle: bool,
    scroll_x: u8,
    scroll_y: u8,
    read_buffer: u8,
    open_bus: u8,
}

impl Default for PpuRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl PpuRegisters {
    pub fn new() -> Self {
        Self {
            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            oam: [0; OAM_SIZE],
            vram_addr: 0,
            write_toggle: false,
            scroll_x: 0,
            scroll_y: 0,
            read_buffer: 0,
            open_bus: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// CPU read from $2000-$3FFF.
    pub fn read(&mut self, addr: u16, vram: &mut impl VideoMemory) -> u8 {
        let value = match mirror_ppu_reg(addr) {
            0x2002 => {
                let v = (self.status & 0xE0) | (self.open_bus & 0x1F);
                self.status &= !STATUS_VBLANK;
                self.write_toggle = false;
                v
            }
            0x2004 => self.oam[self.oam_addr as usize],
            0x2007 => self.read_data(vram),
            // Write-only $2000/$2001/$2003/$2005/$2006 reject the read: they
            // leave every register untouched and return the open-bus latch.
            _ => return self.open_bus,
        };
        self.open_bus = value;
        value
    }

    /// CPU write to $2000-$3FFF.
    pub fn write(&mut self, addr: u16, value: u8, vram: &mut impl VideoMemory) {
        self.open_bus = value;
        match mirror_ppu_reg(addr) {
            0x2000 => self.ctrl = value,
            0x2001 => self.mask = value,
            0x2003 => self.oam_addr = value,
            0x2004 => self.write_oam_data(value),
            0x2005 => {
                if self.write_toggle {
                    self.scroll_y = value;
                } else {
                    self.scroll_x = value;
                }
                self.write_toggle = !self.write_toggle;
            }
            0x2006 => {
                if self.write_toggle {
                    self.vram_addr = (self.vram_addr & 0xFF00) | value as u16;
                } else {
                    self.vram_addr = (self.vram_addr & 0x00FF) | (((value & 0x3F) as u16) << 8);
                }
                self.write_toggle = !self.write_toggle;
            }
            0x2007 => {
                vram.write(self.vram_addr & 0x3FFF, value);
                self.increment_vram_addr();
            }
            // $2002 is read-only.
            _ => {}
        }
    }

    fn read_data(&mut self, vram: &mut impl VideoMemory) -> u8 {
        let addr = self.vram_addr & 0x3FFF;
        let out = if addr >= 0x3F00 {
            self.read_buffer = vram.read(addr - 0x1000);
            vram.read(addr)
        } else {
            let buffered = self.read_buffer;
            self.read_buffer = vram.read(addr);
            buffered
        };
        self.increment_vram_addr();
        out
    }

    #[inline]
    fn increment_vram_addr(&mut self) {
        self.vram_addr = self.vram_addr.wrapping_add(self.vram_increment()) & 0x3FFF;
    }

    // ---------------------------------------------------------------------
    // Video-unit side
    // ---------------------------------------------------------------------

    pub fn set_vblank(&mut self, on: bool) {
        self.set_status_bit(STATUS_VBLANK, on);
    }

    pub fn set_sprite_zero_hit(&mut self, on: bool) {
        self.set_status_bit(STATUS_SPRITE_ZERO_HIT, on);
    }

    pub fn set_sprite_overflow(&mut self, on: bool) {
        self.set_status_bit(STATUS_SPRITE_OVERFLOW, on);
    }

    #[inline]
    fn set_status_bit(&mut self, mask: u8, on: bool) {
        if on {
            self.status |= mask;
        } else {
            self.status &= !mask;
        }
    }

    pub fn vblank(&self) -> bool {
        self.status & STATUS_VBLANK != 0
    }

    pub fn nmi_enabled(&self) -> bool {
        self.ctrl & CTRL_NMI_ENABLE != 0
    }

    pub fn vram_increment(&self) -> u16 {
        if self.ctrl & CTRL_INCREMENT_32 != 0 { 32 } else { 1 }
    }

    /// Pattern-table window ($0000 or $1000) used for background tiles.
    pub fn background_pattern_base(&self) -> u16 {
        if self.ctrl & CTRL_BG_PATTERN_HI != 0 { 0x1000 } else { 0x0000 }
    }

    /// Pattern-table window ($0000 or $1000) used for 8x8 sprites.
    pub fn sprite_pattern_base(&self) -> u16 {
        if self.ctrl & CTRL_SPRITE_PATTERN_HI != 0 { 0x1000 } else { 0x0000 }
    }

    pub fn ctrl(&self) -> u8 {
        self.ctrl
    }
    pub fn mask(&self) -> u8 {
        self.mask
    }
    pub fn status(&self) -> u8 {
        self.status
    }
    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }
    pub fn vram_addr(&self) -> u16 {
        self.vram_addr
    }
    pub fn write_toggle(&self) -> bool {
        self.write_toggle
    }
    pub fn scroll(&self) -> (u8, u8) {
        (self.scroll_x, self.scroll_y)
    }
    pub fn read_buffer(&self) -> u8 {
        self.read_buffer
    }
    pub fn open_bus(&self) -> u8 {
        self.open_bus
    }

    pub fn oam(&self) -> &[u8; OAM_SIZE] {
        &self.oam
    }

    pub fn oam_mut(&mut self) -> &mut [u8; OAM_SIZE] {
        &mut self.oam
    }
}

impl OamWriter for PpuRegisters {
    /// Store at OAMADDR and advance it.
    #[inline]
    fn write_oam_data(&mut self, value: u8) {
        self.oam[self.oam_addr as usize] = value;
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }
}
