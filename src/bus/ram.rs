/*!
Work RAM behind $0000-$1FFF.

The 2 KiB array backs three CPU-visible roles:
- page 0: zero-page operands and the 16-bit pointers of the two indirect
  modes, whose high-byte fetch wraps from $FF back to $00
- page 1: the hardware stack (`PHA`/`PHP`, `JSR`, NMI entry)
- any page: the source of an OAM DMA triggered with a page number below $20

Every address in the window is reduced with `& 0x07FF`, so the three upper
mirrors alias the same bytes.
*/

/// Bytes of internal RAM.
pub const CPU_RAM_SIZE: usize = 0x0800;
const PAGE: usize = 0x100;

pub struct Ram {
    data: [u8; CPU_RAM_SIZE],
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Ram {
    pub fn new() -> Self {
        Self {
            data: [0; CPU_RAM_SIZE],
        }
    }

    /// Power-cycle contents to zero.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.data[Self::mirror_index(addr)]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.data[Self::mirror_index(addr)] = value;
    }

    /// Little-endian word at `base` in page 0; `base = $FF` pairs with $00.
    #[inline]
    pub fn zero_page_word(&self, base: u8) -> u16 {
        let lo = self.data[base as usize];
        let hi = self.data[base.wrapping_add(1) as usize];
        u16::from_le_bytes([lo, hi])
    }

    /// One 256-byte page, with `page` taken through the mirror.
    pub fn page(&self, page: u8) -> &[u8] {
        let start = ((page as usize) * PAGE) & (CPU_RAM_SIZE - 1);
        &self.data[start..start + PAGE]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Backing index for a CPU address in $0000-$1FFF.
    #[inline]
    pub fn mirror_index(addr: u16) -> usize {
        (addr as usize) & (CPU_RAM_SIZE - 1)
    }
}
