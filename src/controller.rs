/*!
Standard controller: an 8-bit parallel-in/serial-out shift register read
through $4016 (port 1) and $4017 (port 2).

Bit order as shifted out, bit 0 first:
  A, B, Select, Start, Up, Down, Left, Right

Strobe protocol (bit 0 of a $4016 write, shared by both ports):
- Strobe high: the register follows the live buttons; every read reports A.
- High -> low: the live buttons are latched and the read cursor returns to 0.
- Strobe low: each read shifts out the next latched bit. Once all eight have
  been read, further reads return 1.
*/

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    #[inline]
    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Controller {
    // Live buttons, bit set = pressed.
    buttons: u8,
    // Snapshot being shifted out.
    state: u8,
    strobe: bool,
    // 0..=8; 8 means exhausted.
    read_bit: u8,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.buttons |= button.mask();
        } else {
            self.buttons &= !button.mask();
        }
    }

    pub fn press(&mut self, button: Button) {
        self.set_button(button, true);
    }

    pub fn release(&mut self, button: Button) {
        self.set_button(button, false);
    }

    /// Replace every button at once. Bit layout follows `Button::mask`.
    pub fn set_state_mask(&mut self, mask: u8) {
        self.buttons = mask;
    }

    /// CPU write to $4016.
    pub fn write_strobe(&mut self, value: u8) {
        let high = value & 0x01 != 0;
        if self.strobe && !high {
            self.state = self.buttons;
            self.read_bit = 0;
        }
        self.strobe = high;
    }

    /// CPU read from this controller's port. Only bit 0 carries data.
    pub fn read(&mut self) -> u8 {
        if self.strobe {
            self.state = self.buttons;
            return self.state & 0x01;
        }
        if self.read_bit >= 8 {
            return 1;
        }
        let bit = (self.state >> self.read_bit) & 0x01;
        self.read_bit += 1;
        bit
    }

    pub fn strobe(&self) -> bool {
        self.strobe
    }

    pub fn current_mask(&self) -> u8 {
        self.buttons
    }

    pub fn latched_mask(&self) -> u8 {
        self.state
    }

    pub fn read_bit(&self) -> u8 {
        self.read_bit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_edge_latches_then_shifts_lsb_first() {
        let mut c = Controller::new();
        c.press(Button::A);
        c.press(Button::Start);
        c.press(Button::Left);

        c.write_strobe(1);
        c.write_strobe(0);

        for e in [1, 0, 0, 1, 0, 0, 1, 0] {
            assert_eq!(c.read(), e);
        }
        assert_eq!(c.read(), 1);
        assert_eq!(c.read(), 1);
    }

    #[test]
    fn strobe_high_resamples_and_reports_a() {
        let mut c = Controller::new();
        c.press(Button::A);
        c.write_strobe(1);
        for _ in 0..12 {
            assert_eq!(c.read(), 1);
        }
        c.release(Button::A);
        assert_eq!(c.read(), 0);
    }

    #[test]
    fn snapshot_ignores_presses_after_latch() {
        let mut c = Controller::new();
        c.write_strobe(1);
        c.write_strobe(0);
        c.press(Button::A);
        assert_eq!(c.read(), 0);
        assert_eq!(c.latched_mask(), 0);
    }

    #[test]
    fn low_to_low_write_does_not_relatch() {
        let mut c = Controller::new();
        c.set_state_mask(0xFF);
        c.write_strobe(1);
        c.write_strobe(0);
        assert_eq!(c.read(), 1);
        c.set_state_mask(0x00);
        c.write_strobe(0);
        assert_eq!(c.read_bit(), 1);
        assert_eq!(c.read(), 1);
    }

    #[test]
    fn button_masks_follow_read_order() {
        for (i, b) in Button::ALL.iter().enumerate() {
            assert_eq!(b.mask(), 1 << i);
        }
    }
}
