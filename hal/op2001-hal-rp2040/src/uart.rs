//! Buffered UART wrappers
//!
//! `embassy_rp::uart::BufferedUartRx`/`BufferedUartTx` fill and drain a ring
//! buffer from the UART interrupt. The wrappers here expose it through the
//! `op2001-hal` traits: reads never block, and only bytes already buffered
//! are returned.

use embedded_io::{Read, ReadReady, Write};
use op2001_hal::{UartRx, UartTx};

/// Non-blocking receive half
pub struct RpUartRx<R> {
    inner: R,
}

impl<R> RpUartRx<R>
where
    R: Read + ReadReady,
{
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R> UartRx for RpUartRx<R>
where
    R: Read + ReadReady,
{
    type Error = R::Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready()? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

/// Transmit half
pub struct RpUartTx<W> {
    inner: W,
}

impl<W: Write> RpUartTx<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> UartTx for RpUartTx<W> {
    type Error = W::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}
