//! GPIO pin abstractions
//!
//! Digital pins used by the input nodes: the shift register's clock, load and
//! data lines, and the A/B phases of each rotary encoder.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Digital input pin
///
/// Buttons on the input board are wired active-low, so `is_low()` means
/// "pressed" at the pin level. The protocol flips that polarity once, at the
/// bus responder.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }

    /// Read the pin as a single bit (1 = high)
    fn read_bit(&self) -> u8 {
        u8::from(self.is_high())
    }
}
