//! Resistance temperature detector support
//!
//! Everything needed to drive a MAX31865 RTD-to-digital converter that
//! does not touch the bus: the register model, fault flags, the
//! Callendar-Van Dusen conversion, device status classification and the
//! measurement sequences.

pub mod conversion;
pub mod fault;
pub mod registers;
pub mod sensor;
pub mod sequence;
pub mod status;

pub use conversion::{
    code_to_resistance, code_to_temperature, resistance_to_temperature, temperature_to_code,
    threshold_register, ConversionError, RtdKind, RtdSample,
};
pub use fault::FaultFlags;
pub use registers::{FaultCycle, Filter, RegisterSnapshot, RtdConfig, ThresholdPair, Wiring};
pub use sensor::RtdSensor;
pub use sequence::{begin, read_one_shot, run_diagnostic, ConversionReport, DiagnosticReport};
pub use status::{classify_link, DeviceStatus};
