/*!
Timing-only video unit.

Walks the NTSC raster (341 dots x 262 scanlines) one dot per master tick and
drives the status bits the CPU side can observe:
- scanline 241, dot 1: set vblank (with PPUCTRL bit 7 this raises the NMI line)
- pre-render scanline 261, dot 1: clear vblank, sprite-zero hit and overflow;
  the frame is marked complete

No pixels are produced. Odd-frame dot skipping is not modelled.
*/

use crate::bus::PpuView;
use crate::peripheral::VideoUnit;

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;
pub const VBLANK_SCANLINE: u16 = 241;
pub const PRE_RENDER_SCANLINE: u16 = 261;

#[derive(Debug, Default, Clone)]
pub struct TimingPpu {
    dot: u16,
    scanline: u16,
    frame: u64,
    frame_complete: bool,
}

impl TimingPpu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    /// Frames completed since reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    /// Read and clear the frame-complete flag.
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }
}

impl VideoUnit for TimingPpu {
    fn step(&mut self, mut bus: PpuView<'_>) {
        if self.dot == 1 {
            match self.scanline {
                VBLANK_SCANLINE => bus.set_vblank(true),
                PRE_RENDER_SCANLINE => {
                    let regs = bus.registers_mut();
                    regs.set_vblank(false);
                    regs.set_sprite_zero_hit(false);
                    regs.set_sprite_overflow(false);
                    self.frame_complete = true;
                    self.frame += 1;
                }
                _ => {}
            }
        }

        self.dot += 1;
        if self.dot == DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline == SCANLINES_PER_FRAME {
                self.scanline = 0;
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
