//! Board-agnostic core logic for the temperature meter firmware
//!
//! This crate contains all measurement logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (temperature sensor, RTD front end)
//! - RTD conversion tables and the MAX31865 register model
//! - Device status classification and the fault-detection sequence
//! - Infrared thermometer conversion
//! - Poll timing and serial report formatting
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod ir;
pub mod poll;
pub mod reading;
pub mod report;
pub mod rtd;
pub mod temperature;
pub mod traits;

pub use reading::{NoDataReason, Reading};
pub use temperature::{Resistance, Temperature};
