//! Frame assembly for the serial input link.
//!
//! Frame format:
//! - ASCII text, one message per frame: `<kind><index>:<value>;`
//! - `;` terminates a frame and is kept as its last byte
//! - `\n`, `\r` and `\0` are transport padding and never enter the buffer
//!
//! The receiver is fed one byte per call and never waits for more input.
//! A frame that grows past [`FRAME_CAPACITY`] without a terminator is dropped
//! and the receiver returns to idle.

use heapless::Vec;

/// Frame terminator byte
pub const FRAME_TERMINATOR: u8 = b';';

/// Maximum frame size in bytes, terminator included
pub const FRAME_CAPACITY: usize = 31;

/// Errors that can occur while assembling frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Buffered bytes reached capacity without a terminator; buffer dropped
    Overflow,
    /// A completed frame has not been taken yet; the byte was not consumed
    FramePending,
}

/// Receiver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    /// Waiting for the first byte of a frame
    Idle,
    /// Collecting bytes until the terminator
    Receiving,
}

/// A completed frame, terminator included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub(crate) bytes: Vec<u8, FRAME_CAPACITY>,
}

impl Frame {
    /// Build a frame from raw bytes
    ///
    /// Returns `None` if `bytes` does not fit in [`FRAME_CAPACITY`].
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Vec::from_slice(bytes).ok().map(|bytes| Self { bytes })
    }

    /// Frame contents, terminator included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Frame length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the frame holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Returns true for bytes the link treats as padding
pub fn is_transport_noise(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r' | b'\0')
}

/// Byte-at-a-time frame assembler
#[derive(Debug, Clone)]
pub struct FrameReceiver {
    state: RxState,
    buffer: Vec<u8, FRAME_CAPACITY>,
    ready: bool,
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReceiver {
    /// Create an idle receiver with an empty buffer
    pub const fn new() -> Self {
        Self {
            state: RxState::Idle,
            buffer: Vec::new(),
            ready: false,
        }
    }

    /// Current receiver state
    pub fn state(&self) -> RxState {
        self.state
    }

    /// Number of bytes currently buffered
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns true if a completed frame is waiting to be taken
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Drop buffered bytes and return to idle
    pub fn reset(&mut self) {
        self.state = RxState::Idle;
        self.buffer.clear();
        self.ready = false;
    }

    /// Feed a single byte to the receiver
    ///
    /// Returns `Ok(true)` when this byte completed a frame, `Ok(false)` when
    /// more bytes are needed or the byte was ignored.
    ///
    /// While a completed frame is pending the byte is refused with
    /// [`FrameError::FramePending`] and must be offered again after
    /// [`take`](Self::take).
    pub fn feed(&mut self, byte: u8) -> Result<bool, FrameError> {
        if self.ready {
            return Err(FrameError::FramePending);
        }

        if is_transport_noise(byte) {
            return Ok(false);
        }

        match self.state {
            RxState::Idle => {
                if byte == FRAME_TERMINATOR {
                    return Ok(false);
                }
                self.buffer.clear();
                // Empty buffer, cannot fail
                let _ = self.buffer.push(byte);
                self.state = RxState::Receiving;
                Ok(false)
            }
            RxState::Receiving => {
                if byte == FRAME_TERMINATOR {
                    // Ordinary bytes stop one short of capacity, so the
                    // terminator always has a slot
                    let _ = self.buffer.push(byte);
                    self.state = RxState::Idle;
                    self.ready = true;
                    return Ok(true);
                }

                if self.buffer.len() >= FRAME_CAPACITY - 1 {
                    self.reset();
                    return Err(FrameError::Overflow);
                }

                let _ = self.buffer.push(byte);
                Ok(false)
            }
        }
    }

    /// Take the completed frame, if any, leaving the receiver empty
    pub fn take(&mut self) -> Option<Frame> {
        if !self.ready {
            return None;
        }
        self.ready = false;
        let bytes = core::mem::take(&mut self.buffer);
        Some(Frame { bytes })
    }

    /// Feed bytes until one completes a frame
    ///
    /// Returns the completed frame and the number of bytes consumed.
    /// Overflow is recovered internally and the remaining bytes keep being
    /// fed; bytes after the completing one are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Option<Frame>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(true) => return (self.take(), i + 1),
                Ok(false) | Err(FrameError::Overflow) => {}
                Err(FrameError::FramePending) => return (self.take(), i),
            }
        }
        (None, bytes.len())
    }
}
