/*!
Peripheral seams: the video and audio units the master clock drives.

Both are external collaborators. The clock hands each one a view borrowed
from the bus for the length of a single step; neither keeps a reference to
bus state between steps.

- `VideoUnit::step` runs once per master tick (one PPU dot).
- `AudioUnit::step` runs once per CPU cycle (every third master tick).
*/

use crate::bus::{ApuView, PpuView};

pub trait VideoUnit {
    fn step(&mut self, bus: PpuView<'_>);

    fn reset(&mut self) {}
}

pub trait AudioUnit {
    fn step(&mut self, bus: ApuView<'_>);

    fn reset(&mut self) {}
}

/// Video unit that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVideo;

impl VideoUnit for NullVideo {
    fn step(&mut self, _bus: PpuView<'_>) {}
}

/// Audio unit that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioUnit for NullAudio {
    fn step(&mut self, _bus: ApuView<'_>) {}
}
