//! MMC1 (mapper 1).
//!
//! Two layers:
//! - `Mmc1Registers`: the serial shift-register protocol. Writes to
//!   $8000..=$FFFF feed one bit at a time into a 5-bit register whose empty
//!   state is the sentinel `0x10`. When the sentinel's marker bit reaches bit
//!   0, the next write completes the value and latches it into the register
//!   selected by address bits 13-14 (control, CHR bank 0, CHR bank 1, PRG
//!   bank). A write with bit 7 set aborts the sequence and forces PRG mode 3.
//! - `Mmc1`: the cartridge read path. It consults the latched registers to
//!   pick the active PRG/CHR windows and the nametable mirroring.
//!
//! PRG modes (control bits 2-3):
//!   0, 1: 32 KiB at $8000, low bit of the bank number ignored
//!   2:    first bank fixed at $8000, switchable bank at $C000
//!   3:    switchable bank at $8000, last bank fixed at $C000 (power-on)
//! CHR mode (control bit 4): 0 = one 8 KiB bank, 1 = two 4 KiB banks.
//!
//! Not modelled: PRG-RAM enable bit, SUROM/SOROM-style outer banks,
//! ignoring writes on consecutive cycles.

use crate::mapper::{Mapper, MapperMirroring};

/// Empty shift register: the marker bit has five shifts to travel.
pub const SHIFT_EMPTY: u8 = 0x10;

const CONTROL_POWER_ON: u8 = 0x0C;

/// Register chosen by address bits 13-14 when a serial write completes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mmc1Target {
    Control,
    ChrBank0,
    ChrBank1,
    PrgBank,
}

impl Mmc1Target {
    #[inline]
    fn from_addr(addr: u16) -> Self {
        match (addr >> 13) & 0x03 {
            0 => Mmc1Target::Control,
            1 => Mmc1Target::ChrBank0,
            2 => Mmc1Target::ChrBank1,
            _ => Mmc1Target::PrgBank,
        }
    }
}

/// Serial shift-register state machine and the four latched registers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mmc1Registers {
    shift: u8,
    control: u8,
    chr_bank0: u8,
    chr_bank1: u8,
    prg_bank: u8,
}

impl Default for Mmc1Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Mmc1Registers {
    pub fn new() -> Self {
        Self {
            shift: SHIFT_EMPTY,
            control: CONTROL_POWER_ON,
            chr_bank0: 0,
            chr_bank1: 0,
            prg_bank: 0,
        }
    }

    /// Feed one CPU write at $8000..=$FFFF. Returns the register latched by
    /// this write, if any.
    pub fn write(&mut self, addr: u16, value: u8) -> Option<Mmc1Target> {
        if value & 0x80 != 0 {
            self.shift = SHIFT_EMPTY;
            self.control |= CONTROL_POWER_ON;
            return None;
        }

        let complete = self.shift & 0x01 != 0;
        self.shift = (self.shift >> 1) | ((value & 0x01) << 4);
        if !complete {
            return None;
        }

        let latched = self.shift & 0x1F;
        let target = Mmc1Target::from_addr(addr);
        match target {
            Mmc1Target::Control => self.control = latched,
            Mmc1Target::ChrBank0 => self.chr_bank0 = latched,
            Mmc1Target::ChrBank1 => self.chr_bank1 = latched,
            Mmc1Target::PrgBank => self.prg_bank = latched,
        }
        self.shift = SHIFT_EMPTY;
        log::debug!("MMC1 latch {target:?} = {latched:#04X}");
        Some(target)
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }
    pub fn control(&self) -> u8 {
        self.control
    }
    pub fn chr_bank0(&self) -> u8 {
        self.chr_bank0
    }
    pub fn chr_bank1(&self) -> u8 {
        self.chr_bank1
    }
    pub fn prg_bank(&self) -> u8 {
        self.prg_bank
    }

    #[inline]
    pub fn prg_mode(&self) -> u8 {
        (self.control >> 2) & 0x03
    }

    #[inline]
    pub fn chr_4k_mode(&self) -> bool {
        self.control & 0x10 != 0
    }

    pub fn mirroring(&self) -> MapperMirroring {
        match self.control & 0x03 {
            0 => MapperMirroring::SingleScreenLower,
            1 => MapperMirroring::SingleScreenUpper,
            2 => MapperMirroring::Vertical,
            _ => MapperMirroring::Horizontal,
        }
    }
}

/// MMC1 cartridge: ROM/RAM storage plus the banked read path.
#[derive(Clone, Debug)]
pub struct Mmc1 {
    regs: Mmc1Registers,
    prg_rom: Vec<u8>,
    prg_ram: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
}

impl Mmc1 {
    pub fn new(prg_rom: Vec<u8>, prg_ram: Vec<u8>, chr: Vec<u8>, chr_is_ram: bool) -> Self {
        Self {
            regs: Mmc1Registers::new(),
            prg_rom,
            prg_ram,
            chr,
            chr_is_ram,
        }
    }

    pub fn registers(&self) -> &Mmc1Registers {
        &self.regs
    }

    #[inline]
    fn prg_bank_count(&self) -> usize {
        (self.prg_rom.len() / 0x4000).max(1)
    }

    /// 16 KiB bank indices currently mapped at $8000 and $C000.
    pub fn prg_banks(&self) -> (usize, usize) {
        let count = self.prg_bank_count();
        let bank = (self.regs.prg_bank() & 0x0F) as usize;
        match self.regs.prg_mode() {
            0 | 1 => {
                let lo = (bank & !1) % count;
                (lo, (lo + 1) % count)
            }
            2 => (0, bank % count),
            _ => (bank % count, count - 1),
        }
    }

    /// Byte offsets of the 4 KiB CHR windows at $0000 and $1000.
    pub fn chr_windows(&self) -> (usize, usize) {
        let count = (self.chr.len() / 0x1000).max(1);
        if self.regs.chr_4k_mode() {
            let b0 = self.regs.chr_bank0() as usize % count;
            let b1 = self.regs.chr_bank1() as usize % count;
            (b0 * 0x1000, b1 * 0x1000)
        } else {
            let b = (self.regs.chr_bank0() as usize & !1) % count;
            (b * 0x1000, ((b + 1) % count) * 0x1000)
        }
    }

    fn chr_index(&self, addr: u16) -> Option<usize> {
        if self.chr.is_empty() {
            return None;
        }
        let (w0, w1) = self.chr_windows();
        let a = addr as usize & 0x1FFF;
        let base = if a < 0x1000 { w0 } else { w1 };
        Some((base + (a & 0x0FFF)) % self.chr.len())
    }

    fn prg_ram_index(&self, addr: u16) -> Option<usize> {
        if self.prg_ram.is_empty() {
            return None;
        }
        Some((addr as usize - 0x6000) % self.prg_ram.len())
    }
}

impl Mapper for Mmc1 {
    fn mapper_id(&self) -> u16 {
        1
    }

    fn cpu_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram_index(addr).map_or(0, |i| self.prg_ram[i]),
            0x8000..=0xFFFF => {
                if self.prg_rom.is_empty() {
                    return 0;
                }
                let (lo, hi) = self.prg_banks();
                let bank = if addr < 0xC000 { lo } else { hi };
                let ofs = addr as usize & 0x3FFF;
                self.prg_rom[(bank * 0x4000 + ofs) % self.prg_rom.len()]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x6000..=0x7FFF => {
                if let Some(i) = self.prg_ram_index(addr) {
                    self.prg_ram[i] = value;
                }
            }
            0x8000..=0xFFFF => {
                self.regs.write(addr, value);
            }
            _ => {}
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        self.chr_index(addr).map_or(0, |i| self.chr[i])
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        if !self.chr_is_ram {
            return;
        }
        if let Some(i) = self.chr_index(addr) {
            self.chr[i] = value;
        }
    }

    fn reset(&mut self) {
        self.regs = Mmc1Registers::new();
    }

    fn current_mirroring(&self) -> Option<MapperMirroring> {
        Some(self.regs.mirroring())
    }
}
