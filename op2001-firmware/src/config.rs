//! Boot-time configuration

use defmt::*;
use op2001_core::config::{parse_config, NodeConfig};

/// Embedded configuration, validated by build.rs
const EMBEDDED_CONFIG: &str = include_str!("../node.toml");

/// Parse the embedded config, falling back to defaults
pub fn load() -> NodeConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration: {:?}", config);
            config
        }
        Err(e) => {
            warn!("Embedded config rejected ({:?}), using defaults", e);
            NodeConfig::default()
        }
    }
}
