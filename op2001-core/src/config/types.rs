//! Configuration types
//!
//! Defaults match the wiring of the reference instrument: 9600 baud serial
//! link, encoder board at I2C address 0x08 polled every 40 ms, four channels.

use op2001_protocol::ENCODER_BOARD_ADDRESS;

use crate::channel::MAX_CHANNELS;

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 9600 }
    }
}

/// Polled bus settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// 7-bit address of the encoder board
    pub address: u8,
    /// Delay between snapshot reads (and between samples on the responder)
    pub poll_interval_ms: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            address: ENCODER_BOARD_ADDRESS,
            poll_interval_ms: 40,
        }
    }
}

/// Input table settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    /// Channels per kind accepted from the wire
    pub channels: u8,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { channels: 4 }
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeConfig {
    pub serial: SerialConfig,
    pub bus: BusConfig,
    pub inputs: InputConfig,
}

impl NodeConfig {
    /// Check value ranges the parser cannot check per key
    pub fn is_valid(&self) -> bool {
        self.serial.baudrate > 0
            && self.bus.address <= 0x7F
            && self.bus.poll_interval_ms > 0
            && (1..=MAX_CHANNELS).contains(&usize::from(self.inputs.channels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.serial.baudrate, 9600);
        assert_eq!(config.bus.address, 0x08);
        assert_eq!(config.bus.poll_interval_ms, 40);
        assert_eq!(config.inputs.channels, 4);
        assert!(config.is_valid());
    }

    #[test]
    fn test_invalid_channel_count() {
        let mut config = NodeConfig::default();
        config.inputs.channels = 0;
        assert!(!config.is_valid());
        config.inputs.channels = 9;
        assert!(!config.is_valid());
    }

    #[test]
    fn test_invalid_address() {
        let mut config = NodeConfig::default();
        config.bus.address = 0x80;
        assert!(!config.is_valid());
    }
}
