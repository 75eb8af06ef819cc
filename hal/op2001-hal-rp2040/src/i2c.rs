//! Blocking I2C requester
//!
//! Wraps any `embedded_hal::i2c::I2c` master, in practice
//! `embassy_rp::i2c::I2c<'_, _, Blocking>`.

use embedded_hal::i2c::I2c;
use op2001_hal::I2cBus;

pub struct RpI2cBus<B> {
    inner: B,
}

impl<B: I2c> RpI2cBus<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

impl<B: I2c> I2cBus for RpI2cBus<B> {
    type Error = B::Error;

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        // A completed master read always fills the buffer
        self.inner.read(address, buf)?;
        Ok(buf.len())
    }
}
