//! Configuration loading
//!
//! The meter configuration is `meter.toml`, compiled into the firmware and
//! checked by the build script. Parsed at start-up by the `no_std` parser
//! in kelvin-core.

pub mod loader;

pub use loader::{layout, load_config};
