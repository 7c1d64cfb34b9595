//! Build script for kelvin-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates meter.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use kelvin_core::config::MeterConfig;

/// Top-level keys and sections meter.toml may contain
const KNOWN_KEYS: &[&str] = &[
    "sensor",
    "interval_ms",
    "rtd",
    "timing",
    "ir",
    "display",
    "serial",
];

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
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate meter.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=meter.toml");

    let config_path = Path::new("meter.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: meter.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a meter.toml configuration file.            ║\n\
            ║  Please create one in the kelvin-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read meter.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax first, so the error points at the line
    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail("Invalid TOML syntax in meter.toml", &e.to_string()),
    };

    warn_unknown_keys(&value);

    let config: MeterConfig = match value.try_into() {
        Ok(config) => config,
        Err(e) => fail("Invalid value in meter.toml", &e.to_string()),
    };

    if let Err(e) = config.validate() {
        fail("Invalid meter configuration", &e.to_string());
    }

    println!(
        "cargo:warning=meter.toml validated: {:?} meter, {} ms interval",
        config.sensor,
        config.interval_ms()
    );
}

fn warn_unknown_keys(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };
    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            println!("cargo:warning=meter.toml: unknown key '{}' is ignored", key);
        }
    }
}

fn fail(title: &str, msg: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(msg)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
