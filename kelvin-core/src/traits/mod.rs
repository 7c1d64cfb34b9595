//! Hardware abstraction traits
//!
//! These traits define the interface between the measurement logic
//! and hardware-specific implementations.

pub mod rtd;
pub mod sensor;

pub use rtd::{ConversionWait, RtdFrontEnd};
pub use sensor::{SensorError, TemperatureSensor};
