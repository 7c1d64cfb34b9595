//! Device status classification

use super::{FaultFlags, ThresholdPair};

/// Result of one diagnostic cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceStatus {
    /// Threshold readback is all zeros or all ones
    NotFound,
    /// Threshold readback differs from what was written
    TransmitError,
    /// Link good and no fault flags
    Ok,
    /// Link good but the fault cycle reported flags
    Fault(FaultFlags),
}

const fn is_floating(word: u16) -> bool {
    word == 0x0000 || word == 0xFFFF
}

/// Classify the SPI link from a threshold write and its readback
///
/// Returns [`DeviceStatus::Ok`] when the link is usable; the fault cycle
/// refines that with [`DeviceStatus::with_fault_status`].
pub fn classify_link(written: ThresholdPair, readback: ThresholdPair) -> DeviceStatus {
    if is_floating(readback.low) && is_floating(readback.high) {
        DeviceStatus::NotFound
    } else if readback != written {
        DeviceStatus::TransmitError
    } else {
        DeviceStatus::Ok
    }
}

impl DeviceStatus {
    /// Fold in the stage-2 fault status of a found device
    pub fn with_fault_status(self, flags: FaultFlags) -> Self {
        match self {
            DeviceStatus::Ok if !flags.is_empty() => DeviceStatus::Fault(flags),
            other => other,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, DeviceStatus::Ok)
    }
}
