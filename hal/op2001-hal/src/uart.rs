//! UART serial communication abstractions
//!
//! The serial path never blocks on input: receivers pull at most one byte per
//! poll and return `None` when nothing is waiting.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Take one byte if one is already buffered
    ///
    /// Returns `Ok(None)` immediately when the receive buffer is empty.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Discard everything currently buffered
    ///
    /// Returns the number of bytes dropped. Stops at the first read error.
    fn discard_pending(&mut self) -> usize {
        let mut dropped = 0;
        while let Ok(Some(_)) = self.try_read_byte() {
            dropped += 1;
        }
        dropped
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    /// Inter-node links run 9600 8N1
    fn default() -> Self {
        Self { baudrate: 9600 }
    }
}
