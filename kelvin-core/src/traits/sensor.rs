//! Temperature sensor trait

use crate::rtd::{ConversionError, FaultFlags};
use crate::temperature::Temperature;

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed or the device did not answer
    NoCommunication,
    /// Register readback differs from what was written
    ReadbackMismatch,
    /// Device reported fault flags
    Fault(FaultFlags),
    /// Conversion produced no usable value (zero ratio, error word)
    NoData,
    /// Reading out of expected range
    OutOfRange,
    /// Packet error code mismatch
    ChecksumMismatch,
}

impl From<ConversionError> for SensorError {
    fn from(e: ConversionError) -> Self {
        match e {
            ConversionError::NoData => SensorError::NoData,
            ConversionError::OutOfRange => SensorError::OutOfRange,
        }
    }
}

/// Trait for temperature sensors
///
/// Implementations handle the specific sensor type (RTD front end,
/// infrared thermometer, ...) including any blocking settle delays the
/// device needs.
pub trait TemperatureSensor {
    /// Take one reading
    ///
    /// Takes `&mut self` because every read is a bus transaction.
    fn read_temperature(&mut self) -> Result<Temperature, SensorError>;
}
