//! Per-cycle reading outcome

use crate::temperature::Temperature;

/// Why a cycle produced no temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoDataReason {
    /// Bus transaction failed
    Bus,
    /// Nothing answered on the bus
    NotFound,
    /// Register readback mismatch
    TransmitError,
    /// Device reported fault flags
    Fault,
    /// Zero conversion result
    ZeroReading,
    /// Value outside the valid range or an error word
    OutOfRange,
    /// Packet error code mismatch
    Checksum,
}

/// What one polling cycle shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    Value(Temperature),
    NoData(NoDataReason),
}

impl Reading {
    pub fn temperature(&self) -> Option<Temperature> {
        match *self {
            Reading::Value(t) => Some(t),
            Reading::NoData(_) => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Reading::Value(_))
    }
}

impl From<crate::rtd::ConversionError> for NoDataReason {
    fn from(e: crate::rtd::ConversionError) -> Self {
        match e {
            crate::rtd::ConversionError::NoData => NoDataReason::ZeroReading,
            crate::rtd::ConversionError::OutOfRange => NoDataReason::OutOfRange,
        }
    }
}

impl From<crate::traits::SensorError> for NoDataReason {
    fn from(e: crate::traits::SensorError) -> Self {
        use crate::traits::SensorError;
        match e {
            SensorError::NoCommunication => NoDataReason::Bus,
            SensorError::ReadbackMismatch => NoDataReason::TransmitError,
            SensorError::Fault(_) => NoDataReason::Fault,
            SensorError::NoData => NoDataReason::ZeroReading,
            SensorError::OutOfRange => NoDataReason::OutOfRange,
            SensorError::ChecksumMismatch => NoDataReason::Checksum,
        }
    }
}

impl From<Result<Temperature, crate::traits::SensorError>> for Reading {
    fn from(result: Result<Temperature, crate::traits::SensorError>) -> Self {
        match result {
            Ok(t) => Reading::Value(t),
            Err(e) => Reading::NoData(e.into()),
        }
    }
}
