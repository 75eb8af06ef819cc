//! Node configuration
//!
//! Each board embeds a small `node.toml`, parsed at boot with the `no_std`
//! parser in [`parser`].

pub mod parser;
pub mod types;

pub use parser::{parse_config, ConfigError};
pub use types::*;
