//! Link errors and drop counters
//!
//! Every error here is recovered inside the node that saw it. The counters
//! are the only place they surface.

use op2001_protocol::{BusError, ParseError};

/// Recoverable faults on either input path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Serial frame exceeded capacity; buffered bytes dropped
    TransportOverflow,
    /// Completed frame could not be decoded; frame dropped
    Parse(ParseError),
    /// Message addressed a channel the sink does not have; message dropped
    ChannelOutOfRange,
    /// Bus read failed or returned a short reply; cached values kept
    BusTransactionFailure,
    /// UART reported a receive error (framing, parity, break or overrun)
    UartFault,
}

impl From<ParseError> for LinkError {
    fn from(err: ParseError) -> Self {
        LinkError::Parse(err)
    }
}

impl From<BusError> for LinkError {
    fn from(_: BusError) -> Self {
        LinkError::BusTransactionFailure
    }
}

/// Per-node link statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Serial frames decoded and applied
    pub frames_accepted: u32,
    /// Bus snapshots decoded and applied
    pub transactions: u32,
    pub overflows: u32,
    pub parse_errors: u32,
    pub out_of_range: u32,
    pub bus_failures: u32,
    pub uart_faults: u32,
}

impl LinkStats {
    pub const fn new() -> Self {
        Self {
            frames_accepted: 0,
            transactions: 0,
            overflows: 0,
            parse_errors: 0,
            out_of_range: 0,
            bus_failures: 0,
            uart_faults: 0,
        }
    }

    /// Count a recovered error
    pub fn record(&mut self, err: LinkError) {
        let counter = match err {
            LinkError::TransportOverflow => &mut self.overflows,
            LinkError::Parse(_) => &mut self.parse_errors,
            LinkError::ChannelOutOfRange => &mut self.out_of_range,
            LinkError::BusTransactionFailure => &mut self.bus_failures,
            LinkError::UartFault => &mut self.uart_faults,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn record_frame(&mut self) {
        self.frames_accepted = self.frames_accepted.saturating_add(1);
    }

    pub fn record_transaction(&mut self) {
        self.transactions = self.transactions.saturating_add(1);
    }

    /// Serial frames lost to overflow, decode failure or bad index
    pub fn dropped_frames(&self) -> u32 {
        self.overflows
            .saturating_add(self.parse_errors)
            .saturating_add(self.out_of_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_each_kind() {
        let mut stats = LinkStats::new();
        stats.record(LinkError::TransportOverflow);
        stats.record(LinkError::Parse(ParseError::UnknownKind));
        stats.record(LinkError::Parse(ParseError::Malformed));
        stats.record(LinkError::ChannelOutOfRange);
        stats.record(LinkError::BusTransactionFailure);
        stats.record(LinkError::UartFault);

        assert_eq!(stats.overflows, 1);
        assert_eq!(stats.parse_errors, 2);
        assert_eq!(stats.out_of_range, 1);
        assert_eq!(stats.bus_failures, 1);
        assert_eq!(stats.uart_faults, 1);
        assert_eq!(stats.dropped_frames(), 4);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = LinkStats {
            overflows: u32::MAX,
            ..LinkStats::new()
        };
        stats.record(LinkError::TransportOverflow);
        assert_eq!(stats.overflows, u32::MAX);
    }

    #[test]
    fn test_error_conversions() {
        assert_eq!(
            LinkError::from(BusError::Incomplete),
            LinkError::BusTransactionFailure
        );
        assert_eq!(
            LinkError::from(ParseError::Malformed),
            LinkError::Parse(ParseError::Malformed)
        );
    }
}
