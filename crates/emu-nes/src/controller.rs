//! NES standard controller: an 8-bit parallel-load shift register.

use emu_core::Button;

/// A single standard NES controller.
#[derive(Debug, Default)]
pub struct Controller {
    /// Current button state, as set by the driver
    state: Button,
    /// Shift register latched from `state` while `strobe` is high
    shift_reg: u8,
    /// Strobe line; while high the register continuously re-latches `state`
    strobe: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear latched button state and shift register, as on a hardware reset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set which buttons are currently held
    pub fn set_state(&mut self, state: Button) {
        self.state = state;
        if self.strobe {
            self.shift_reg = self.state.bits();
        }
    }

    /// Write to the controller's strobe line ($4016/$4017 bit 0).
    /// A falling edge (1 -> 0) latches the current button state for
    /// shifting out on subsequent reads.
    pub fn write_strobe(&mut self, strobe_high: bool) {
        if strobe_high {
            self.shift_reg = self.state.bits();
        }
        self.strobe = strobe_high;
    }

    /// Read the next bit out of the shift register. While strobe is held
    /// high the register keeps re-latching, so every read returns the
    /// current A-button state. Bit 6 of the result is always set (open bus).
    pub fn read(&mut self) -> u8 {
        if self.strobe {
            self.shift_reg = self.state.bits();
        }
        let bit = self.shift_reg & 0x01;
        self.shift_reg >>= 1;
        self.shift_reg |= 0x80; // shifted-in high bits read back as 1 past the 8th read
        bit | 0x40
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strobe_latches_and_shifts() {
        let mut c = Controller::new();
        // A, Select, Right pressed: bits 0, 2, 7
        c.set_state(Button::A | Button::SELECT | Button::RIGHT);
        c.write_strobe(true);
        c.write_strobe(false); // falling edge latches

        let mut bits = Vec::new();
        for _ in 0..8 {
            bits.push(c.read() & 0x01);
        }

        assert_eq!(bits, vec![1, 0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_continuous_strobe_always_reads_a() {
        let mut c = Controller::new();
        c.set_state(Button::A);
        c.write_strobe(true);

        for _ in 0..4 {
            assert_eq!(c.read() & 0x01, 1);
        }
    }

    #[test]
    fn test_open_bus_bit_always_set() {
        let mut c = Controller::new();
        c.write_strobe(true);
        c.write_strobe(false);
        assert_eq!(c.read() & 0x40, 0x40);
    }

    #[test]
    fn test_reads_past_eighth_return_one() {
        let mut c = Controller::new();
        c.set_state(Button::empty());
        c.write_strobe(true);
        c.write_strobe(false);

        for _ in 0..8 {
            c.read();
        }
        // after 8 shifts the register has filled with 1s from the open-bus fill
        assert_eq!(c.read() & 0x01, 1);
    }
}
