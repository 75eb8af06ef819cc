//! Minimal TOML parser for node configuration
//!
//! Handles only the subset `node.toml` uses. It does NOT support the full
//! TOML grammar.
//!
//! Supported features:
//! - `[section]` headers (`serial`, `bus`, `inputs`)
//! - `key = integer` pairs, decimal or `0x` hex, `_` separators
//! - Comments (# ...), whole-line or trailing
//!
//! Keys not given keep their default value.

use super::types::NodeConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is not `key = value`
    InvalidLine,
    /// Key not known in its section
    UnknownKey,
    /// Value is not an integer or does not fit the field
    InvalidValue,
    /// Parsed config fails range checks
    OutOfRange,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Serial,
    Bus,
    Inputs,
}

/// Parse `node.toml` contents into a [`NodeConfig`]
pub fn parse_config(input: &str) -> Result<NodeConfig, ConfigError> {
    let mut config = NodeConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ConfigError::InvalidSection)?
                .trim();
            section = match name {
                "serial" => Section::Serial,
                "bus" => Section::Bus,
                "inputs" => Section::Inputs,
                _ => return Err(ConfigError::InvalidSection),
            };
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ConfigError::InvalidLine)?;
        let key = key.trim();
        let value = parse_integer(value.trim())?;

        match (section, key) {
            (Section::Serial, "baudrate") => config.serial.baudrate = narrow(value)?,
            (Section::Bus, "address") => config.bus.address = narrow(value)?,
            (Section::Bus, "poll_interval_ms") => config.bus.poll_interval_ms = narrow(value)?,
            (Section::Inputs, "channels") => config.inputs.channels = narrow(value)?,
            _ => return Err(ConfigError::UnknownKey),
        }
    }

    if !config.is_valid() {
        return Err(ConfigError::OutOfRange);
    }
    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_integer(text: &str) -> Result<u64, ConfigError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in text.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ConfigError::InvalidValue)?;
    }

    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse::<u64>(),
    };
    parsed.map_err(|_| ConfigError::InvalidValue)
}

fn narrow<T: TryFrom<u64>>(value: u64) -> Result<T, ConfigError> {
    T::try_from(value).map_err(|_| ConfigError::InvalidValue)
}
