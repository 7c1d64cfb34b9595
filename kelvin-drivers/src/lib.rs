//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in kelvin-core on top of `embedded-hal` 1.0:
//!
//! - RTD converter (MAX31865 over SPI)
//! - Infrared thermometer (MLX90614 over SMBus)
//! - OLED panel (SH1106 framebuffer, async I2C flush)
//! - Blinking status LED

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod ir;
pub mod led;
pub mod rtd;
