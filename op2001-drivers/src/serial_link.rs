//! Serial input path
//!
//! Drives the frame receiver from a non-blocking UART, decodes completed
//! frames and applies them to the input sink. One byte per poll keeps each
//! call short enough for a cooperative main loop.

use op2001_core::{ChannelId, InputSink, LinkError, LinkStats};
use op2001_hal::UartRx;
use op2001_protocol::{FrameError, FrameReceiver, Message};

/// Receiver half of the serial link
#[derive(Debug, Default)]
pub struct SerialLink {
    receiver: FrameReceiver,
}

impl SerialLink {
    pub const fn new() -> Self {
        Self {
            receiver: FrameReceiver::new(),
        }
    }

    pub fn receiver(&self) -> &FrameReceiver {
        &self.receiver
    }

    /// Process at most one input byte
    ///
    /// A frame already pending is decoded before anything is read. Returns
    /// the channel that changed, if the call completed a frame that changed
    /// one. Every error is recovered here and counted in `stats`.
    pub fn poll<R: UartRx, const N: usize>(
        &mut self,
        rx: &mut R,
        sink: &mut InputSink<N>,
        stats: &mut LinkStats,
    ) -> Option<ChannelId> {
        match self.step(rx, sink, stats) {
            Step::Changed(id) => Some(id),
            Step::Idle | Step::Progress | Step::Fault => None,
        }
    }

    /// Poll until the UART has no more input
    ///
    /// Returns the number of channels that changed.
    pub fn poll_all<R: UartRx, const N: usize>(
        &mut self,
        rx: &mut R,
        sink: &mut InputSink<N>,
        stats: &mut LinkStats,
    ) -> usize {
        let mut changed = 0;
        loop {
            match self.step(rx, sink, stats) {
                Step::Idle | Step::Fault => return changed,
                Step::Changed(_) => changed += 1,
                Step::Progress => {}
            }
        }
    }

    fn step<R: UartRx, const N: usize>(
        &mut self,
        rx: &mut R,
        sink: &mut InputSink<N>,
        stats: &mut LinkStats,
    ) -> Step {
        if !self.receiver.is_ready() {
            let byte = match rx.try_read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => return Step::Idle,
                Err(_) => {
                    stats.record(LinkError::UartFault);
                    return Step::Fault;
                }
            };
            match self.receiver.feed(byte) {
                Ok(true) => {}
                Ok(false) => return Step::Progress,
                Err(FrameError::Overflow) => {
                    rx.discard_pending();
                    stats.record(LinkError::TransportOverflow);
                    return Step::Progress;
                }
                // Not reachable while a pending frame is taken first
                Err(FrameError::FramePending) => {}
            }
        }

        let Some(frame) = self.receiver.take() else {
            return Step::Progress;
        };
        let result = Message::from_frame(&frame)
            .map_err(LinkError::from)
            .and_then(|msg| sink.apply(&msg));

        match result {
            Ok(Some(id)) => {
                stats.record_frame();
                Step::Changed(id)
            }
            Ok(None) => {
                stats.record_frame();
                Step::Progress
            }
            Err(err) => {
                stats.record(err);
                Step::Progress
            }
        }
    }
}

/// Outcome of one receive step
enum Step {
    /// No input available
    Idle,
    /// Input consumed, no channel changed
    Progress,
    /// UART receive error, counted; ends a `poll_all` batch
    Fault,
    Changed(ChannelId),
}
