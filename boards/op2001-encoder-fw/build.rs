//! Build script for op2001-encoder-fw
//!
//! - Sets up linker search paths for memory.x
//! - Validates node.toml at compile time; this board has no serial port, so
//!   a `[serial]` section is rejected

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct NodeToml {
    bus: BusToml,
    inputs: InputsToml,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BusToml {
    address: u8,
    poll_interval_ms: u32,
}

impl Default for BusToml {
    fn default() -> Self {
        Self {
            address: 0x08,
            poll_interval_ms: 40,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InputsToml {
    channels: u8,
}

impl Default for InputsToml {
    fn default() -> Self {
        Self { channels: 4 }
    }
}

/// Validate node.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=node.toml");

    let config_path = Path::new("node.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read node.toml", &[e.to_string()]),
    };

    let config: NodeToml = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail(
            "Invalid node.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    if config.bus.address > 0x7F {
        errors.push("[bus] address must be a 7-bit address".to_string());
    }
    if config.bus.poll_interval_ms == 0 {
        errors.push("[bus] poll_interval_ms must be non-zero".to_string());
    }
    // Four encoders and four buttons are wired; the reply layout is fixed
    if config.inputs.channels != 4 {
        errors.push("[inputs] channels must be 4 on this board".to_string());
    }
    if !errors.is_empty() {
        fail("Invalid node configuration", &errors);
    }

    println!("cargo:warning=node.toml validated successfully");
}

fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
