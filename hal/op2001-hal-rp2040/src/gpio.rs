//! RP2040 GPIO wrappers

use embassy_rp::gpio::{Input, Output};
use op2001_hal::{InputPin, OutputPin};

/// Push-pull output implementing [`OutputPin`]
pub struct RpOutput<'d>(Output<'d>);

impl<'d> RpOutput<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self(pin)
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }
}

/// Input implementing [`InputPin`]
///
/// Still usable for async edge waits through [`RpInput::inner_mut`].
pub struct RpInput<'d>(Input<'d>);

impl<'d> RpInput<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self(pin)
    }

    pub fn inner_mut(&mut self) -> &mut Input<'d> {
        &mut self.0
    }
}

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
