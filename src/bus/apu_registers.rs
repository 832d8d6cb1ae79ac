/*!
APU register bank ($4000-$4017 subset).

Addressing overview (CPU):
- $4000-$4003: pulse 1
- $4004-$4007: pulse 2
- $4008-$400B: triangle ($4009 unused)
- $400C-$400F: noise ($400D unused)
- $4010-$4013: DMC
- $4015:       channel enable (write) / status (read)
- $4017:       frame counter (write only; reads belong to controller 2)

$4014 (OAM DMA) and $4016 (controller strobe) sit inside this range but are
routed elsewhere by the bus.

Reload handshakes
- Writing $400B (triangle length/high period) raises the linear-counter
  reload request.
- Writing $400F (noise length) raises the noise length-counter reload request.
Each request carries the byte that raised it and stays pending until the
audio unit takes it. Taking it clears it; a second take yields `None`.
*/

pub const APU_REG_BASE: u16 = 0x4000;
pub const APU_REG_COUNT: usize = 0x18;

pub const TRIANGLE_LENGTH_REG: u16 = 0x400B;
pub const NOISE_LENGTH_REG: u16 = 0x400F;
pub const STATUS_REG: u16 = 0x4015;
pub const FRAME_COUNTER_REG: u16 = 0x4017;

/// One-shot request raised by a register write and acknowledged by `take`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReloadRequest(Option<u8>);

impl ReloadRequest {
    #[inline]
    pub fn raise(&mut self, value: u8) {
        self.0 = Some(value);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }

    /// Acknowledge and clear the request.
    #[inline]
    pub fn take(&mut self) -> Option<u8> {
        self.0.take()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ApuRegisterBank {
    regs: [u8; APU_REG_COUNT],
    linear_reload: ReloadRequest,
    noise_reload: ReloadRequest,
}

impl ApuRegisterBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    fn index(addr: u16) -> usize {
        (addr.wrapping_sub(APU_REG_BASE) as usize) % APU_REG_COUNT
    }

    /// Stored byte for a register address in $4000-$4017.
    pub fn read(&self, addr: u16) -> u8 {
        self.regs[Self::index(addr)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.regs[Self::index(addr)] = value;
        match addr {
            TRIANGLE_LENGTH_REG => self.linear_reload.raise(value),
            NOISE_LENGTH_REG => self.noise_reload.raise(value),
            _ => {}
        }
    }

    pub fn pulse1(&self) -> &[u8] {
        &self.regs[0x00..0x04]
    }

    pub fn pulse2(&self) -> &[u8] {
        &self.regs[0x04..0x08]
    }

    pub fn triangle(&self) -> &[u8] {
        &self.regs[0x08..0x0C]
    }

    pub fn noise(&self) -> &[u8] {
        &self.regs[0x0C..0x10]
    }

    pub fn dmc(&self) -> &[u8] {
        &self.regs[0x10..0x14]
    }

    pub fn status(&self) -> u8 {
        self.read(STATUS_REG)
    }

    pub fn frame_counter(&self) -> u8 {
        self.read(FRAME_COUNTER_REG)
    }

    pub fn linear_reload_pending(&self) -> bool {
        self.linear_reload.is_pending()
    }

    pub fn noise_reload_pending(&self) -> bool {
        self.noise_reload.is_pending()
    }

    pub fn take_linear_reload(&mut self) -> Option<u8> {
        self.linear_reload.take()
    }

    pub fn take_noise_reload(&mut self) -> Option<u8> {
        self.noise_reload.take()
    }
}
