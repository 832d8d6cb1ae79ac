/*!
OAM DMA and the one-shot stall counter.

Model
- A CPU write of `page` to $4014 copies the 256 bytes at `page << 8` into OAM
  through OAMDATA (so the copy starts at the current OAMADDR and wraps).
- The copy happens at once; its cost is charged to the CPU as a 513-cycle
  stall added to the cycle count of the instruction that did the write.
- The stall lives in `ExtraCycles` until the CPU's cycle accounting takes it.
  Taking clears it, so a stall is charged exactly once. Arming again before it
  is taken replaces the pending value rather than adding to it.

Source reads go through `CpuMemory`, which reads RAM and cartridge space
without touching register side effects.
*/

pub const OAM_DMA_REG: u16 = 0x4014;
pub const OAM_DMA_STALL_CYCLES: u32 = 513;

/// CPU-space reads used as the DMA source.
pub trait CpuMemory {
    fn cpu_read(&mut self, addr: u16) -> u8;
}

/// Destination for DMA bytes; equivalent to a write to $2004.
pub trait OamWriter {
    fn write_oam_data(&mut self, value: u8);
}

/// Copy one 256-byte page into OAM.
pub fn copy_page<M: CpuMemory, W: OamWriter>(mem: &mut M, oam: &mut W, page: u8) {
    let base = (page as u16) << 8;
    for i in 0..=0xFFu16 {
        let v = mem.cpu_read(base | i);
        oam.write_oam_data(v);
    }
}

/// Pending stall cycles, read-and-cleared at instruction boundaries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtraCycles(u32);

impl ExtraCycles {
    #[inline]
    pub fn arm(&mut self, cycles: u32) {
        self.0 = cycles;
    }

    #[inline]
    pub fn peek(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.0)
    }
}
