//! Kelvin Hardware Abstraction Layer
//!
//! Chip-agnostic descriptions of the buses the meters talk over. Sensor
//! drivers publish the bus settings their device needs using these types,
//! and the board firmware translates them into its own HAL configuration.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  kelvin-firmware (RP2040 board)         │
//! └─────────────────────────────────────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐    ┌──────────────────┐
//! │ kelvin-drivers  │───▶│ kelvin-hal       │
//! │ (device needs)  │    │ (this crate)     │
//! └─────────────────┘    └──────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`spi::SpiConfig`], [`spi::Mode`] - SPI clock and mode
//! - [`i2c::I2cConfig`] - I2C clock
//! - [`uart::UartTx`], [`uart::UartConfig`] - Serial console output

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod spi;
pub mod uart;

// Re-export key types at crate root for convenience
pub use i2c::I2cConfig;
pub use spi::{Mode, SpiConfig};
pub use uart::{LineWriter, UartConfig, UartTx};
