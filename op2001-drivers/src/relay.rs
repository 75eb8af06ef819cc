//! Serial relay
//!
//! The audio node forwards every change it sees on the bus to the display
//! node as one text frame per channel.

use op2001_core::{ChannelId, ChannelKind, InputSink};
use op2001_hal::UartTx;
use op2001_protocol::Message;

/// Padding written after each frame; the receiver drops it
pub const FRAME_PADDING: &[u8] = b"\r\n";

/// Writes drained sink changes to a UART
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialRelay;

impl SerialRelay {
    pub const fn new() -> Self {
        Self
    }

    /// Message for one channel's current value
    pub fn message<const N: usize>(sink: &InputSink<N>, id: ChannelId) -> Option<Message> {
        let value = sink.channel(id)?.current();
        let index = id.index.get() as i32;
        Some(match id.kind {
            ChannelKind::Encoder => Message::encoder(index, value),
            ChannelKind::Button => Message::button(index, value != 0),
        })
    }

    /// Write a frame for every changed channel
    ///
    /// A change flag is cleared only once its frame has been written, so a
    /// write error leaves that change and every later one pending for the
    /// next call. Returns the number of frames written.
    pub fn forward<T: UartTx, const N: usize>(
        &self,
        tx: &mut T,
        sink: &mut InputSink<N>,
    ) -> Result<usize, T::Error> {
        let mut written = 0;
        while let Some(id) = sink.peek_changed() {
            if let Some(msg) = Self::message(sink, id) {
                tx.write_blocking(msg.encode().as_bytes())?;
                tx.write_blocking(FRAME_PADDING)?;
                written += 1;
            }
            sink.consume(id);
        }
        if written > 0 {
            tx.flush()?;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use op2001_protocol::FrameReceiver;
    use std::vec::Vec;

    #[derive(Default)]
    struct CapturingUart {
        out: Vec<u8>,
        flushes: usize,
    }

    impl UartTx for CapturingUart {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            self.out.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_forwards_each_change() {
        let mut sink = InputSink::<4>::new();
        sink.apply_snapshot(&[10, 0, 0, 0], &[false, false, true, false]);

        let mut uart = CapturingUart::default();
        assert_eq!(SerialRelay::new().forward(&mut uart, &mut sink), Ok(2));
        assert_eq!(uart.out, b"e0:10;\r\nb2:1;\r\n");
        assert_eq!(uart.flushes, 1);
        assert!(!sink.has_changes());
    }

    /// Fails the first `failures` writes, then captures
    struct FlakyUart {
        failures: usize,
        inner: CapturingUart,
    }

    impl UartTx for FlakyUart {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(());
            }
            self.inner.write_blocking(data)
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.inner.flush()
        }
    }

    #[test]
    fn test_failed_write_keeps_change_pending() {
        let mut sink = InputSink::<4>::new();
        sink.apply_snapshot(&[10, 0, 0, 0], &[false; 4]);

        let relay = SerialRelay::new();
        let mut uart = FlakyUart {
            failures: 1,
            inner: CapturingUart::default(),
        };
        assert_eq!(relay.forward(&mut uart, &mut sink), Err(()));
        assert!(sink.has_changes());

        // The bus repeats the snapshot; the differ reports nothing new
        assert_eq!(sink.apply_snapshot(&[10, 0, 0, 0], &[false; 4]), 0);

        assert_eq!(relay.forward(&mut uart, &mut sink), Ok(1));
        assert_eq!(uart.inner.out, b"e0:10;\r\n");
        assert!(!sink.has_changes());
    }

    #[test]
    fn test_retry_sends_whole_batch() {
        let mut sink = InputSink::<4>::new();
        sink.apply_snapshot(&[1, 2, 0, 0], &[false; 4]);

        let relay = SerialRelay::new();
        let mut uart = FlakyUart {
            failures: 0,
            inner: CapturingUart::default(),
        };
        assert_eq!(relay.forward(&mut uart, &mut sink), Ok(2));

        sink.apply_snapshot(&[3, 4, 0, 0], &[false; 4]);
        uart.failures = 1;
        assert_eq!(relay.forward(&mut uart, &mut sink), Err(()));
        assert_eq!(relay.forward(&mut uart, &mut sink), Ok(2));
        assert_eq!(uart.inner.out, b"e0:1;\r\ne1:2;\r\ne0:3;\r\ne1:4;\r\n");
    }

    #[test]
    fn test_nothing_changed_writes_nothing() {
        let mut sink = InputSink::<4>::new();
        let mut uart = CapturingUart::default();
        assert_eq!(SerialRelay::new().forward(&mut uart, &mut sink), Ok(0));
        assert!(uart.out.is_empty());
        assert_eq!(uart.flushes, 0);
    }

    #[test]
    fn test_relayed_stream_reparses() {
        let mut source = InputSink::<4>::new();
        source.apply_snapshot(&[1, 2, 3, 4], &[true, false, false, true]);
        let mut uart = CapturingUart::default();
        SerialRelay::new().forward(&mut uart, &mut source).unwrap();

        let mut remote = InputSink::<4>::new();
        let mut rx = FrameReceiver::new();
        for &byte in &uart.out {
            if let Ok(true) = rx.feed(byte) {
                let frame = rx.take().unwrap();
                remote.apply(&Message::from_frame(&frame).unwrap()).unwrap();
            }
        }

        for i in 0..4 {
            assert_eq!(remote.encoder_value(i), source.encoder_value(i));
        }
        assert!(remote.is_pressed(0) && remote.is_pressed(3));
    }
}
