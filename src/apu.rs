/*!
Audio unit stub that services the register bank's reload handshakes.

Each CPU cycle it takes both pending reload requests:
- triangle ($400B write): reloads the linear counter from $4008 bits 0-6 and
  the length counter from the written byte's top five bits
- noise ($400F write): reloads the noise length counter from the written
  byte's top five bits

No sound is synthesised. The counters are exposed so the handshake can be
observed.
*/

use crate::bus::ApuView;
use crate::peripheral::AudioUnit;

/// Length-counter load values indexed by bits 3-7 of the length register.
pub const LENGTH_TABLE: [u8; 32] = [
    10, 254, 20, 2, 40, 4, 80, 6, 160, 8, 60, 10, 14, 12, 26, 14, 12, 16, 24, 18, 48, 20, 96, 22,
    192, 24, 72, 26, 16, 28, 32, 30,
];

#[inline]
fn length_for(reg: u8) -> u8 {
    LENGTH_TABLE[(reg >> 3) as usize]
}

#[derive(Debug, Default, Clone)]
pub struct ReloadServicingApu {
    linear_counter: u8,
    triangle_length: u8,
    noise_length: u8,
    linear_reloads: u64,
    noise_reloads: u64,
}

impl ReloadServicingApu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linear_counter(&self) -> u8 {
        self.linear_counter
    }

    pub fn triangle_length(&self) -> u8 {
        self.triangle_length
    }

    pub fn noise_length(&self) -> u8 {
        self.noise_length
    }

    /// Requests serviced since reset: (linear, noise).
    pub fn serviced(&self) -> (u64, u64) {
        (self.linear_reloads, self.noise_reloads)
    }
}

impl AudioUnit for ReloadServicingApu {
    fn step(&mut self, mut bus: ApuView<'_>) {
        if let Some(value) = bus.take_linear_reload() {
            self.linear_counter = bus.triangle()[0] & 0x7F;
            self.triangle_length = length_for(value);
            self.linear_reloads += 1;
        }
        if let Some(value) = bus.take_noise_reload() {
            self.noise_length = length_for(value);
            self.noise_reloads += 1;
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
