//! Input event sink
//!
//! The authoritative table of encoder and button channels on the receiving
//! node. Both input paths write into it:
//!
//! - the serial path applies one decoded [`Message`] at a time
//! - the bus path applies a whole snapshot, diffed per channel against the
//!   last snapshot seen
//!
//! The presentation layer reads values freely and drains change flags. A
//! flag stays set until drained, so updates between drains coalesce into the
//! latest value with a single change.

use op2001_protocol::{clamp_encoder, Message};

use crate::channel::{Channel, ChannelId, ChannelIndex, ChannelKind};
use crate::differ::BusDiffer;
use crate::link::LinkError;

/// Channel table for up to `N` encoders and `N` buttons
#[derive(Debug, Clone)]
pub struct InputSink<const N: usize> {
    /// Channels per kind accepted from the wire, at most `N`
    active: usize,
    encoders: [Channel; N],
    buttons: [Channel; N],
    encoder_differ: BusDiffer<N>,
    button_differ: BusDiffer<N>,
}

impl<const N: usize> Default for InputSink<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> InputSink<N> {
    /// All encoders at 0, all buttons released
    pub const fn new() -> Self {
        Self::with_channels(N)
    }

    /// Table accepting only the first `count` channels of each kind
    pub const fn with_channels(count: usize) -> Self {
        Self {
            active: if count < N { count } else { N },
            encoders: [Channel::new(0); N],
            buttons: [Channel::new(0); N],
            encoder_differ: BusDiffer::new(0),
            button_differ: BusDiffer::new(0),
        }
    }

    /// Channels per kind accepted from the wire
    pub const fn channel_count(&self) -> usize {
        self.active
    }

    /// Validate a wire index against this table
    pub fn index(&self, raw: i32) -> Option<ChannelIndex> {
        ChannelIndex::new(raw, self.active)
    }

    /// Look up a channel
    ///
    /// `None` if the index was validated against a larger table.
    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        match id.kind {
            ChannelKind::Encoder => self.encoders.get(id.index.get()),
            ChannelKind::Button => self.buttons.get(id.index.get()),
        }
    }

    fn channel_mut(&mut self, id: ChannelId) -> Option<&mut Channel> {
        match id.kind {
            ChannelKind::Encoder => self.encoders.get_mut(id.index.get()),
            ChannelKind::Button => self.buttons.get_mut(id.index.get()),
        }
    }

    /// Encoder channels in index order
    pub fn encoders(&self) -> &[Channel; N] {
        &self.encoders
    }

    /// Button channels in index order
    pub fn buttons(&self) -> &[Channel; N] {
        &self.buttons
    }

    /// Current encoder value, 0 for indices past `N`
    pub fn encoder_value(&self, index: usize) -> i32 {
        self.encoders.get(index).map_or(0, Channel::current)
    }

    /// Current button state, released for indices past `N`
    pub fn is_pressed(&self, index: usize) -> bool {
        self.buttons.get(index).is_some_and(|ch| ch.current() != 0)
    }

    /// Apply one serial update
    ///
    /// Returns the channel if its value changed, `None` if the message
    /// repeated the current value.
    pub fn apply(&mut self, msg: &Message) -> Result<Option<ChannelId>, LinkError> {
        let index = self.index(msg.channel).ok_or(LinkError::ChannelOutOfRange)?;
        let id = ChannelId {
            kind: msg.kind.into(),
            index,
        };
        let value = match id.kind {
            ChannelKind::Encoder => clamp_encoder(msg.value),
            ChannelKind::Button => i32::from(msg.value != 0),
        };
        let channel = self.channel_mut(id).ok_or(LinkError::ChannelOutOfRange)?;
        Ok(channel.update(value).then_some(id))
    }

    /// Apply one bus snapshot
    ///
    /// Encoder values are clamped before diffing. Entries past the channel
    /// count are ignored. Returns the number of channels that changed.
    pub fn apply_snapshot(&mut self, encoders: &[i32], buttons: &[bool]) -> usize {
        let mut changed = 0;

        for (i, &raw) in encoders.iter().take(self.active).enumerate() {
            let (value, fresh) = self.encoder_differ.diff(i, clamp_encoder(raw));
            if fresh && self.encoders[i].update(value) {
                changed += 1;
            }
        }

        for (i, &pressed) in buttons.iter().take(self.active).enumerate() {
            let (value, fresh) = self.button_differ.diff(i, i32::from(pressed));
            if fresh && self.buttons[i].update(value) {
                changed += 1;
            }
        }

        changed
    }

    /// Returns true if any channel has a pending change
    pub fn has_changes(&self) -> bool {
        self.encoders
            .iter()
            .chain(self.buttons.iter())
            .any(Channel::is_changed)
    }

    /// First channel with a pending change, encoders first
    ///
    /// The flag stays set until [`InputSink::consume`] clears it.
    pub fn peek_changed(&self) -> Option<ChannelId> {
        (0..2 * N).map(slot_id::<N>).find_map(|id| {
            let id = id?;
            self.channel(id).is_some_and(Channel::is_changed).then_some(id)
        })
    }

    /// Clear one channel's change flag, returning whether it was set
    pub fn consume(&mut self, id: ChannelId) -> bool {
        self.channel_mut(id).is_some_and(|ch| ch.consume())
    }

    /// Iterate changed channels, encoders first, clearing each flag as it is
    /// yielded
    ///
    /// Channels not reached before the iterator is dropped keep their flag.
    pub fn drain_changed(&mut self) -> DrainChanged<'_, N> {
        DrainChanged { sink: self, pos: 0 }
    }
}

/// Iterator returned by [`InputSink::drain_changed`]
pub struct DrainChanged<'a, const N: usize> {
    sink: &'a mut InputSink<N>,
    pos: usize,
}

impl<const N: usize> Iterator for DrainChanged<'_, N> {
    type Item = ChannelId;

    fn next(&mut self) -> Option<ChannelId> {
        while self.pos < 2 * N {
            let pos = self.pos;
            self.pos += 1;

            let Some(id) = slot_id::<N>(pos) else { continue };
            if self.sink.consume(id) {
                return Some(id);
            }
        }
        None
    }
}

/// Channel at drain position `pos`: encoders `0..N`, then buttons
fn slot_id<const N: usize>(pos: usize) -> Option<ChannelId> {
    let (kind, slot) = if pos < N {
        (ChannelKind::Encoder, pos)
    } else {
        (ChannelKind::Button, pos - N)
    };
    let index = ChannelIndex::new(i32::try_from(slot).ok()?, N)?;
    Some(ChannelId { kind, index })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use op2001_protocol::FrameReceiver;
    use std::vec::Vec;

    fn feed_str<const N: usize>(sink: &mut InputSink<N>, input: &[u8]) {
        let mut rx = FrameReceiver::new();
        for &byte in input {
            if let Ok(true) = rx.feed(byte) {
                let frame = rx.take().unwrap();
                if let Ok(msg) = Message::from_frame(&frame) {
                    let _ = sink.apply(&msg);
                }
            }
        }
    }

    fn enc(i: i32) -> ChannelId {
        ChannelId::encoder(ChannelIndex::new(i, 4).unwrap())
    }

    fn btn(i: i32) -> ChannelId {
        ChannelId::button(ChannelIndex::new(i, 4).unwrap())
    }

    #[test]
    fn test_stream_end_to_end() {
        let mut sink = InputSink::<4>::new();
        feed_str(&mut sink, b"e0:10;b2:1;");

        let changes: Vec<_> = sink.drain_changed().collect();
        assert_eq!(changes, [enc(0), btn(2)]);
        assert_eq!(sink.encoder_value(0), 10);
        assert!(sink.is_pressed(2));
        assert!(!sink.has_changes());
    }

    #[test]
    fn test_out_of_range_dropped() {
        let mut sink = InputSink::<4>::new();
        let msg = Message::parse(b"e9:10;").unwrap();
        assert_eq!(sink.apply(&msg), Err(LinkError::ChannelOutOfRange));
        assert!(!sink.has_changes());
        assert!(sink.encoders().iter().all(|ch| ch.current() == 0));
    }

    #[test]
    fn test_apply_reports_repeat_as_unchanged() {
        let mut sink = InputSink::<4>::new();
        assert_eq!(sink.apply(&Message::encoder(1, 20)), Ok(Some(enc(1))));
        assert_eq!(sink.apply(&Message::encoder(1, 20)), Ok(None));
    }

    #[test]
    fn test_apply_clamps_unclamped_message() {
        let mut sink = InputSink::<4>::new();
        let msg = Message {
            kind: op2001_protocol::MessageKind::EncoderUpdate,
            channel: 0,
            value: 500,
        };
        sink.apply(&msg).unwrap();
        assert_eq!(sink.encoder_value(0), 127);
    }

    #[test]
    fn test_updates_coalesce_between_drains() {
        let mut sink = InputSink::<4>::new();
        sink.apply(&Message::encoder(3, 5)).unwrap();
        sink.apply(&Message::encoder(3, 6)).unwrap();
        sink.apply(&Message::encoder(3, 7)).unwrap();

        let changes: Vec<_> = sink.drain_changed().collect();
        assert_eq!(changes, [enc(3)]);
        assert_eq!(sink.encoder_value(3), 7);
    }

    #[test]
    fn test_partial_drain_keeps_remaining_flags() {
        let mut sink = InputSink::<4>::new();
        sink.apply(&Message::encoder(0, 1)).unwrap();
        sink.apply(&Message::button(1, true)).unwrap();

        assert_eq!(sink.drain_changed().next(), Some(enc(0)));
        assert!(sink.has_changes());
        assert_eq!(sink.drain_changed().collect::<Vec<_>>(), [btn(1)]);
    }

    #[test]
    fn test_snapshot_diffs_against_previous_snapshot() {
        let mut sink = InputSink::<4>::new();
        assert_eq!(sink.apply_snapshot(&[10, 0, 0, 0], &[false; 4]), 1);
        assert_eq!(sink.drain_changed().collect::<Vec<_>>(), [enc(0)]);

        assert_eq!(sink.apply_snapshot(&[10, 0, 0, 0], &[false; 4]), 0);
        assert!(!sink.has_changes());

        assert_eq!(sink.apply_snapshot(&[10, 0, 0, 0], &[false, false, false, true]), 1);
        assert_eq!(sink.drain_changed().collect::<Vec<_>>(), [btn(3)]);
    }

    #[test]
    fn test_snapshot_clamps_before_diff() {
        let mut sink = InputSink::<4>::new();
        assert_eq!(sink.apply_snapshot(&[300, -8, 0, 0], &[]), 1);
        assert_eq!(sink.encoder_value(0), 127);
        assert_eq!(sink.encoder_value(1), 0);

        // Still past the top of the range: no new change
        assert_eq!(sink.apply_snapshot(&[400, -9, 0, 0], &[]), 0);
    }

    #[test]
    fn test_channel_limit_below_capacity() {
        let mut sink = InputSink::<8>::with_channels(2);
        assert_eq!(sink.channel_count(), 2);
        assert_eq!(
            sink.apply(&Message::encoder(2, 10)),
            Err(LinkError::ChannelOutOfRange)
        );
        assert_eq!(sink.apply_snapshot(&[1, 2, 3, 4], &[]), 2);
        assert_eq!(sink.encoder_value(2), 0);
    }

    #[test]
    fn test_channel_limit_capped_at_capacity() {
        assert_eq!(InputSink::<4>::with_channels(9).channel_count(), 4);
    }

    #[test]
    fn test_wide_table_drains_every_flag() {
        let mut sink = InputSink::<16>::new();
        assert_eq!(sink.apply_snapshot(&[1; 16], &[true; 16]), 32);
        assert_eq!(sink.drain_changed().count(), 32);
        assert!(!sink.has_changes());
    }

    #[test]
    fn test_peek_keeps_flag_until_consumed() {
        let mut sink = InputSink::<4>::new();
        sink.apply(&Message::button(2, true)).unwrap();
        sink.apply(&Message::encoder(1, 9)).unwrap();

        assert_eq!(sink.peek_changed(), Some(enc(1)));
        assert_eq!(sink.peek_changed(), Some(enc(1)));
        assert!(sink.consume(enc(1)));
        assert!(!sink.consume(enc(1)));
        assert_eq!(sink.peek_changed(), Some(btn(2)));
        assert!(sink.consume(btn(2)));
        assert_eq!(sink.peek_changed(), None);
    }

    #[test]
    fn test_foreign_index_is_not_a_panic() {
        let mut sink = InputSink::<4>::new();
        let wide = ChannelId::encoder(ChannelIndex::new(5, 8).unwrap());
        assert!(sink.channel(wide).is_none());
        assert!(!sink.consume(wide));
        assert_eq!(sink.channel(enc(3)).map(Channel::current), Some(0));
    }

    #[test]
    fn test_snapshot_larger_than_table() {
        let mut sink = InputSink::<2>::new();
        assert_eq!(sink.apply_snapshot(&[1, 2, 3, 4], &[true, true, true, true]), 4);
        assert_eq!(sink.drain_changed().count(), 4);
    }
}
