//! Channel model
//!
//! A channel is one addressable input: an encoder position or a button
//! state. Encoders and buttons have separate index spaces of the same size.

use op2001_protocol::MessageKind;

/// Upper bound on channels per kind on any node
pub const MAX_CHANNELS: usize = 8;

/// Input kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelKind {
    Encoder,
    Button,
}

impl From<MessageKind> for ChannelKind {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::EncoderUpdate => ChannelKind::Encoder,
            MessageKind::ButtonUpdate => ChannelKind::Button,
        }
    }
}

impl From<ChannelKind> for MessageKind {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Encoder => MessageKind::EncoderUpdate,
            ChannelKind::Button => MessageKind::ButtonUpdate,
        }
    }
}

/// Channel index checked against a channel count
///
/// Only [`ChannelIndex::new`] creates one, so holding a `ChannelIndex` means
/// the index was in range for the table it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelIndex(u8);

impl ChannelIndex {
    /// Validate a wire index against `count` channels
    pub fn new(raw: i32, count: usize) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .filter(|&i| i < count)
            .and_then(|i| u8::try_from(i).ok())
            .map(Self)
    }

    /// Index as usize
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// Fully qualified channel address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId {
    pub kind: ChannelKind,
    pub index: ChannelIndex,
}

impl ChannelId {
    pub fn encoder(index: ChannelIndex) -> Self {
        Self {
            kind: ChannelKind::Encoder,
            index,
        }
    }

    pub fn button(index: ChannelIndex) -> Self {
        Self {
            kind: ChannelKind::Button,
            index,
        }
    }
}

/// Current and previous value of one input, plus a pending-change flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel {
    current: i32,
    previous: i32,
    changed: bool,
}

impl Default for Channel {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Channel {
    /// Channel resting at `initial` with no pending change
    pub const fn new(initial: i32) -> Self {
        Self {
            current: initial,
            previous: initial,
            changed: false,
        }
    }

    /// Latest value
    pub fn current(&self) -> i32 {
        self.current
    }

    /// Value before the latest change
    pub fn previous(&self) -> i32 {
        self.previous
    }

    /// Returns true if a change is waiting to be drained
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Store a new value
    ///
    /// Returns true if the value differs from the current one. An equal value
    /// leaves the channel untouched, including a pending change flag.
    pub fn update(&mut self, value: i32) -> bool {
        if value == self.current {
            return false;
        }
        self.previous = self.current;
        self.current = value;
        self.changed = true;
        true
    }

    /// Clear the change flag, returning its previous state
    pub fn consume(&mut self) -> bool {
        core::mem::replace(&mut self.changed, false)
    }
}
