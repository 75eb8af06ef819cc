//! Parallel-in/serial-out shift register button reader
//!
//! Eight button lines are jammed into the register with the load line, then
//! shifted out MSB first. Lines are pulled up, so a raw `0` bit is a pressed
//! button.

use embedded_hal::delay::DelayNs;
use op2001_hal::{InputPin, OutputPin};

/// Load pulse width in microseconds
pub const LOAD_PULSE_US: u32 = 20;

/// Shift register wired to three GPIOs
pub struct ShiftRegister<L, C, D, T> {
    load: L,
    clock: C,
    data: D,
    delay: T,
}

impl<L, C, D, T> ShiftRegister<L, C, D, T>
where
    L: OutputPin,
    C: OutputPin,
    D: InputPin,
    T: DelayNs,
{
    /// Take the pins and park load and clock low
    pub fn new(mut load: L, mut clock: C, data: D, delay: T) -> Self {
        load.set_low();
        clock.set_low();
        Self {
            load,
            clock,
            data,
            delay,
        }
    }

    /// Latch and shift out all eight lines
    ///
    /// Bit 7 is the first line out. The result uses raw polarity, `0` is
    /// pressed.
    pub fn read(&mut self) -> u8 {
        self.load.set_high();
        self.delay.delay_us(LOAD_PULSE_US);
        self.load.set_low();
        self.clock.set_low();

        // The first line is on the output before any clock edge
        let first = self.data.read_bit();

        let mut rest = 0u8;
        for _ in 0..7 {
            self.clock.set_high();
            rest = (rest << 1) | self.data.read_bit();
            self.clock.set_low();
        }

        (first << 7) | rest
    }

    /// Release the pins
    pub fn release(self) -> (L, C, D, T) {
        (self.load, self.clock, self.data, self.delay)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::vec::Vec;

    /// Simulated register: the clock line advances the data output
    #[derive(Default)]
    struct Register {
        latched: Cell<u8>,
        inputs: Cell<u8>,
        shifted: Cell<u8>,
        events: RefCell<Vec<&'static str>>,
    }

    struct LoadPin(Rc<Register>);
    struct ClockPin(Rc<Register>, bool);
    struct DataPin(Rc<Register>);
    struct MockDelay(Rc<Register>);

    impl OutputPin for LoadPin {
        fn set_high(&mut self) {
            self.0.latched.set(self.0.inputs.get());
            self.0.shifted.set(0);
            self.0.events.borrow_mut().push("load_high");
        }

        fn set_low(&mut self) {
            self.0.events.borrow_mut().push("load_low");
        }
    }

    impl OutputPin for ClockPin {
        fn set_high(&mut self) {
            if !self.1 {
                self.0.shifted.set(self.0.shifted.get() + 1);
            }
            self.1 = true;
        }

        fn set_low(&mut self) {
            self.1 = false;
        }
    }

    impl InputPin for DataPin {
        fn is_high(&self) -> bool {
            let shift = self.0.shifted.get();
            shift < 8 && (self.0.latched.get() << shift) & 0x80 != 0
        }
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {
            self.0.events.borrow_mut().push("delay");
        }
    }

    fn register(inputs: u8) -> (Rc<Register>, ShiftRegister<LoadPin, ClockPin, DataPin, MockDelay>) {
        let reg = Rc::new(Register::default());
        reg.inputs.set(inputs);
        let sr = ShiftRegister::new(
            LoadPin(reg.clone()),
            ClockPin(reg.clone(), false),
            DataPin(reg.clone()),
            MockDelay(reg.clone()),
        );
        reg.events.borrow_mut().clear();
        (reg, sr)
    }

    #[test]
    fn test_reads_all_eight_lines_msb_first() {
        for inputs in [0xFF, 0x00, 0b1010_0110, 0x80, 0x01] {
            let (_, mut sr) = register(inputs);
            assert_eq!(sr.read(), inputs);
        }
    }

    #[test]
    fn test_load_pulse_precedes_shift() {
        let (reg, mut sr) = register(0xF7);
        sr.read();
        assert_eq!(*reg.events.borrow(), ["load_high", "delay", "load_low"]);
    }

    #[test]
    fn test_each_read_relatches() {
        let (reg, mut sr) = register(0xFF);
        assert_eq!(sr.read(), 0xFF);
        reg.inputs.set(0xF0);
        assert_eq!(sr.read(), 0xF0);
    }
}
