#![doc = r#"
PPU address space: nametable and palette RAM plus the mapping rules that
turn a 14-bit PPU address into a backing byte.

Layout
- $0000-$1FFF: pattern tables, owned by the cartridge (CHR-ROM/RAM through
  the mapper).
- $2000-$2FFF: four logical 1 KiB nametables folded onto 2 KiB of VRAM by the
  active mirroring. $3000-$3EFF mirrors $2000-$2EFF.
- $3F00-$3FFF: 32 bytes of palette RAM repeated every 32 bytes, with
  $3F10/$3F14/$3F18/$3F1C aliasing $3F00/$3F04/$3F08/$3F0C.

Mirroring
- A mapper that drives mirroring at runtime overrides the header, except on
  four-screen boards. Four-screen is approximated as vertical since only
  2 KiB of VRAM is present.
"#]

use crate::cartridge::{Cartridge, Mirroring};
use crate::mapper::MapperMirroring;

pub const NAMETABLE_RAM_SIZE: usize = 0x0800;
pub const PALETTE_RAM_SIZE: usize = 32;

/// Byte-level access to the PPU address space ($0000-$3FFF).
///
/// The register window uses this for $2007; video units use it for fetches.
pub trait VideoMemory {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
}

/// Palette RAM index (0..=31) for an address in $3F00-$3FFF.
pub fn map_palette_addr(addr: u16) -> usize {
    let mut idx = addr.wrapping_sub(0x3F00) as usize & 0x1F;
    if idx >= 16 && idx & 0x03 == 0 {
        idx -= 16;
    }
    idx
}

/// VRAM index (0..=0x7FF) for a nametable address in $2000-$3EFF.
///
/// - Horizontal: tables 0,1 share bank 0; tables 2,3 share bank 1.
/// - Vertical: tables 0,2 share bank 0; tables 1,3 share bank 1.
/// - Single-screen: every table lands in the chosen bank.
pub fn map_nametable_addr(addr: u16, header: Mirroring, dynamic: Option<MapperMirroring>) -> usize {
    let a = addr.wrapping_sub(0x2000) & 0x0FFF;
    let table = a / 0x0400;
    let offset = (a % 0x0400) as usize;

    let effective = match header {
        Mirroring::FourScreen => MapperMirroring::Vertical,
        Mirroring::Vertical => dynamic.unwrap_or(MapperMirroring::Vertical),
        Mirroring::Horizontal => dynamic.unwrap_or(MapperMirroring::Horizontal),
    };

    let bank = match effective {
        MapperMirroring::SingleScreenLower => 0,
        MapperMirroring::SingleScreenUpper => 1,
        MapperMirroring::Vertical => table & 1,
        MapperMirroring::Horizontal => table >> 1,
    };

    bank as usize * 0x0400 + offset
}

/// Nametable and palette RAM.
pub struct PpuAddressSpace {
    nametables: [u8; NAMETABLE_RAM_SIZE],
    palette: [u8; PALETTE_RAM_SIZE],
}

impl Default for PpuAddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl PpuAddressSpace {
    pub fn new() -> Self {
        Self {
            nametables: [0; NAMETABLE_RAM_SIZE],
            palette: [0; PALETTE_RAM_SIZE],
        }
    }

    pub fn reset(&mut self) {
        self.nametables.fill(0);
        self.palette.fill(0);
    }

    pub fn nametables(&self) -> &[u8] {
        &self.nametables
    }

    pub fn palette(&self) -> &[u8] {
        &self.palette
    }

    /// Read $2000-$3FFF. Pattern addresses read 0; they belong to the cartridge.
    pub fn read(&self, addr: u16, header: Mirroring, dynamic: Option<MapperMirroring>) -> u8 {
        match addr & 0x3FFF {
            a @ 0x2000..=0x3EFF => self.nametables[map_nametable_addr(a, header, dynamic)],
            a @ 0x3F00..=0x3FFF => self.palette[map_palette_addr(a)],
            _ => 0,
        }
    }

    pub fn write(
        &mut self,
        addr: u16,
        value: u8,
        header: Mirroring,
        dynamic: Option<MapperMirroring>,
    ) {
        match addr & 0x3FFF {
            a @ 0x2000..=0x3EFF => self.nametables[map_nametable_addr(a, header, dynamic)] = value,
            a @ 0x3F00..=0x3FFF => self.palette[map_palette_addr(a)] = value,
            _ => {}
        }
    }
}

/// The full PPU address space for one access: VRAM plus the cartridge's
/// pattern tables and mirroring control. Borrowed out of the bus.
pub struct VramPort<'a> {
    space: &'a mut PpuAddressSpace,
    cartridge: Option<&'a mut Cartridge>,
}

impl<'a> VramPort<'a> {
    pub fn new(space: &'a mut PpuAddressSpace, cartridge: Option<&'a mut Cartridge>) -> Self {
        Self { space, cartridge }
    }

    fn mirroring(&self) -> (Mirroring, Option<MapperMirroring>) {
        match self.cartridge.as_deref() {
            Some(cart) => (cart.mirroring(), cart.mapper_mirroring()),
            None => (Mirroring::Horizontal, None),
        }
    }

    /// Read without side effects.
    pub fn peek(&self, addr: u16) -> u8 {
        let a = addr & 0x3FFF;
        if a < 0x2000 {
            return self.cartridge.as_deref().map_or(0, |c| c.ppu_read(a));
        }
        let (header, dynamic) = self.mirroring();
        self.space.read(a, header, dynamic)
    }
}

impl VideoMemory for VramPort<'_> {
    fn read(&mut self, addr: u16) -> u8 {
        self.peek(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        let a = addr & 0x3FFF;
        if a < 0x2000 {
            if let Some(cart) = self.cartridge.as_deref_mut() {
                cart.ppu_write(a, value);
            }
            return;
        }
        let (header, dynamic) = self.mirroring();
        self.space.write(a, value, header, dynamic);
    }
}
