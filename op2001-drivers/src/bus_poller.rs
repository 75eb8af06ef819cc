//! Bus requester
//!
//! Reads the encoder board's 9-byte snapshot and feeds it to the sink's
//! differ. A failed or short read leaves the sink as it was.

use op2001_core::{InputSink, LinkError, LinkStats};
use op2001_hal::I2cBus;
use op2001_protocol::{BusReply, BUS_REPLY_LEN};

/// Polls one responder address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusPoller {
    address: u8,
}

impl BusPoller {
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Read one snapshot
    pub fn read<B: I2cBus>(&self, bus: &mut B) -> Result<BusReply, LinkError> {
        let mut buf = [0u8; BUS_REPLY_LEN];
        let len = bus
            .read(self.address, &mut buf)
            .map_err(|_| LinkError::BusTransactionFailure)?;
        let bytes = buf.get(..len).ok_or(LinkError::BusTransactionFailure)?;
        Ok(BusReply::decode(bytes)?)
    }

    /// Apply the outcome of a [`BusPoller::read`] and count it
    ///
    /// Kept apart from the read so a caller can run the bus exchange without
    /// holding the lock that guards `sink` and `stats`. Returns the number of
    /// channels that changed.
    pub fn apply<const N: usize>(
        reply: Result<BusReply, LinkError>,
        sink: &mut InputSink<N>,
        stats: &mut LinkStats,
    ) -> Result<usize, LinkError> {
        let reply = reply.inspect_err(|&err| stats.record(err))?;
        stats.record_transaction();
        Ok(sink.apply_snapshot(&reply.positions(), &reply.buttons.states()))
    }

    /// Run one transaction and apply it
    ///
    /// Returns the number of channels that changed.
    pub fn poll<B: I2cBus, const N: usize>(
        &self,
        bus: &mut B,
        sink: &mut InputSink<N>,
        stats: &mut LinkStats,
    ) -> Result<usize, LinkError> {
        Self::apply(self.read(bus), sink, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use op2001_protocol::ButtonBitmap;

    enum Script {
        Reply([u8; BUS_REPLY_LEN]),
        Short(usize),
        Nack,
    }

    struct ScriptedBus {
        script: Script,
        last_address: Option<u8>,
    }

    impl ScriptedBus {
        fn new(script: Script) -> Self {
            Self {
                script,
                last_address: None,
            }
        }
    }

    impl I2cBus for ScriptedBus {
        type Error = ();

        fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, ()> {
            self.last_address = Some(address);
            match self.script {
                Script::Reply(bytes) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Script::Short(len) => Ok(len),
                Script::Nack => Err(()),
            }
        }
    }

    fn reply(positions: [i32; 4], pressed: [bool; 4]) -> [u8; BUS_REPLY_LEN] {
        BusReply::from_positions(&positions, ButtonBitmap::from_states(&pressed)).encode()
    }

    #[test]
    fn test_snapshot_applied() {
        let poller = BusPoller::new(0x08);
        let mut bus = ScriptedBus::new(Script::Reply(reply([10, 0, 0, 0], [false, false, true, false])));
        let mut sink = InputSink::<4>::new();
        let mut stats = LinkStats::new();

        assert_eq!(poller.poll(&mut bus, &mut sink, &mut stats), Ok(2));
        assert_eq!(bus.last_address, Some(0x08));
        assert_eq!(sink.encoder_value(0), 10);
        assert!(sink.is_pressed(2));
        assert_eq!(stats.transactions, 1);

        // Same snapshot again: nothing new
        assert_eq!(poller.poll(&mut bus, &mut sink, &mut stats), Ok(0));
    }

    #[test]
    fn test_short_reply_leaves_sink_untouched() {
        let poller = BusPoller::new(0x08);
        let mut bus = ScriptedBus::new(Script::Short(5));
        let mut sink = InputSink::<4>::new();
        let mut stats = LinkStats::new();

        assert_eq!(
            poller.poll(&mut bus, &mut sink, &mut stats),
            Err(LinkError::BusTransactionFailure)
        );
        assert!(!sink.has_changes());
        assert_eq!(stats.bus_failures, 1);
        assert_eq!(stats.transactions, 0);
    }

    #[test]
    fn test_bus_error_counted() {
        let poller = BusPoller::new(0x08);
        let mut bus = ScriptedBus::new(Script::Nack);
        let mut sink = InputSink::<4>::new();
        let mut stats = LinkStats::new();

        assert!(poller.poll(&mut bus, &mut sink, &mut stats).is_err());
        assert_eq!(stats.bus_failures, 1);
    }

    #[test]
    fn test_read_then_apply_separately() {
        let poller = BusPoller::new(0x08);
        let mut bus = ScriptedBus::new(Script::Reply(reply([0, 0, 7, 0], [true, false, false, false])));
        let mut sink = InputSink::<4>::new();
        let mut stats = LinkStats::new();

        let outcome = poller.read(&mut bus);
        assert!(!sink.has_changes());
        assert_eq!(BusPoller::apply(outcome, &mut sink, &mut stats), Ok(2));
        assert_eq!(sink.encoder_value(2), 7);
        assert!(sink.is_pressed(0));
        assert_eq!(stats.transactions, 1);

        let mut bus = ScriptedBus::new(Script::Nack);
        let outcome = poller.read(&mut bus);
        assert_eq!(
            BusPoller::apply(outcome, &mut sink, &mut stats),
            Err(LinkError::BusTransactionFailure)
        );
        assert_eq!(stats.bus_failures, 1);
        assert_eq!(sink.encoder_value(2), 7);
    }

    #[test]
    fn test_out_of_range_encoder_clamped() {
        let poller = BusPoller::new(0x08);
        let mut bus = ScriptedBus::new(Script::Reply(reply([-3, 200, 0, 0], [false; 4])));
        let mut sink = InputSink::<4>::new();
        let mut stats = LinkStats::new();

        poller.poll(&mut bus, &mut sink, &mut stats).unwrap();
        assert_eq!(sink.encoder_value(0), 0);
        assert_eq!(sink.encoder_value(1), 127);
    }
}
