/*!
Mapper subsystem: trait definition, NROM (mapper 0) and the unmapped fallback.

Purpose:
- Decouple CPU/PPU address mapping from the `Cartridge` so banked boards can
  be added without touching the bus.
- The bus forwards CPU $4020..=$FFFF to `cpu_read`/`cpu_write` and PPU
  $0000..=$1FFF (pattern tables) to `ppu_read`/`ppu_write`.

Implementations here:
- `Nrom`: fixed mapping. 16 KiB PRG appears at both $8000 and $C000; 32 KiB
  PRG fills $8000..=$FFFF directly. 8 KiB PRG-RAM at $6000..=$7FFF.
- `Unmapped`: installed for mapper numbers with no implementation. Every
  cartridge read returns 0 and writes are dropped.
*/

/// Nametable layouts a mapper may select at runtime. When a mapper returns
/// `Some(..)` from `current_mirroring`, it overrides the header mirroring
/// (except for four-screen boards).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MapperMirroring {
    SingleScreenLower,
    SingleScreenUpper,
    Vertical,
    Horizontal,
}

/// Common interface all cartridge mappers implement.
///
/// All addresses are full CPU or PPU addresses (unmasked).
pub trait Mapper {
    /// iNES mapper number.
    fn mapper_id(&self) -> u16;

    /// CPU-visible read at $4020..=$FFFF.
    fn cpu_read(&mut self, addr: u16) -> u8;

    /// CPU-visible write at $4020..=$FFFF (bank-switch control lives here).
    fn cpu_write(&mut self, addr: u16, value: u8);

    /// PPU-visible read at $0000..=$1FFF.
    fn ppu_read(&self, addr: u16) -> u8;

    /// PPU-visible write at $0000..=$1FFF (only CHR-RAM boards store it).
    fn ppu_write(&mut self, addr: u16, value: u8);

    /// Power-on mapper state.
    fn reset(&mut self) {}

    fn current_mirroring(&self) -> Option<MapperMirroring> {
        None
    }
}

pub const PRG_BANK_16K: usize = 16 * 1024;
pub const CHR_BANK_8K: usize = 8 * 1024;
pub const PRG_RAM_8K: usize = 8 * 1024;

/// NROM (mapper 0).
#[derive(Clone, Debug)]
pub struct Nrom {
    prg_rom: Vec<u8>,
    prg_ram: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
}

impl Nrom {
    /// - `prg_rom`: 16 KiB or 32 KiB of program ROM
    /// - `chr`: CHR-ROM bytes, or a zeroed CHR-RAM buffer if `chr_is_ram`
    /// - `prg_ram_size`: bytes of PRG-RAM at $6000 (0 disables it)
    pub fn new(prg_rom: Vec<u8>, chr: Vec<u8>, chr_is_ram: bool, prg_ram_size: usize) -> Self {
        Self {
            prg_rom,
            prg_ram: vec![0; prg_ram_size],
            chr,
            chr_is_ram,
        }
    }

    #[inline]
    fn prg_rom_read(&self, addr: u16) -> u8 {
        if self.prg_rom.is_empty() {
            return 0;
        }
        // A single 16 KiB bank answers at both halves of the window.
        let rel = (addr as usize).wrapping_sub(0x8000) & 0x7FFF;
        self.prg_rom[rel % self.prg_rom.len()]
    }

    #[inline]
    fn prg_ram_index(&self, addr: u16) -> Option<usize> {
        if self.prg_ram.is_empty() {
            return None;
        }
        Some((addr as usize - 0x6000) % self.prg_ram.len())
    }

    /// True for the 16 KiB (mirrored) layout.
    pub fn is_nrom_128(&self) -> bool {
        self.prg_rom.len() == PRG_BANK_16K
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }
}

impl Mapper for Nrom {
    #[inline]
    fn mapper_id(&self) -> u16 {
        0
    }

    fn cpu_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram_index(addr).map_or(0, |i| self.prg_ram[i]),
            0x8000..=0xFFFF => self.prg_rom_read(addr),
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        // No registers; ROM writes are ignored.
        if !(0x6000..=0x7FFF).contains(&addr) {
            return;
        }
        if let Some(i) = self.prg_ram_index(addr) {
            self.prg_ram[i] = value;
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        if self.chr.is_empty() {
            return 0;
        }
        self.chr[(addr as usize & 0x1FFF) % self.chr.len()]
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        if !self.chr_is_ram || self.chr.is_empty() {
            return;
        }
        let idx = (addr as usize & 0x1FFF) % self.chr.len();
        self.chr[idx] = value;
    }
}

/// Stand-in for an unsupported mapper number.
#[derive(Clone, Debug)]
pub struct Unmapped {
    mapper_id: u16,
}

impl Unmapped {
    pub fn new(mapper_id: u16) -> Self {
        Self { mapper_id }
    }
}

impl Mapper for Unmapped {
    fn mapper_id(&self) -> u16 {
        self.mapper_id
    }

    fn cpu_read(&mut self, _addr: u16) -> u8 {
        0
    }

    fn cpu_write(&mut self, _addr: u16, _value: u8) {}

    fn ppu_read(&self, _addr: u16) -> u8 {
        0
    }

    fn ppu_write(&mut self, _addr: u16, _value: u8) {}
}
