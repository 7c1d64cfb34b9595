//! RTD-to-digital converter front end
//!
//! The register-level operations the fault-detection and one-shot
//! sequences in [`crate::rtd::sequence`] are built from. The MAX31865
//! driver implements this over SPI; tests implement it over a simulated
//! register file.

use crate::rtd::{FaultFlags, RegisterSnapshot, RtdConfig, ThresholdPair};

/// How a conversion wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionWait {
    /// Data-ready line went low
    Ready { elapsed_ms: u32 },
    /// Data-ready line still high when the timeout expired
    TimedOut { elapsed_ms: u32 },
    /// No data-ready line; waited the full conversion time
    Fixed { elapsed_ms: u32 },
}

/// Register access to an RTD converter
pub trait RtdFrontEnd {
    /// Bus error type
    type Error;

    /// Write the configuration register
    fn configure(&mut self, config: &RtdConfig) -> Result<(), Self::Error>;

    /// Write the high and low fault threshold registers
    fn write_thresholds(&mut self, thresholds: ThresholdPair) -> Result<(), Self::Error>;

    /// Burst-read all registers
    fn read_snapshot(&mut self) -> Result<RegisterSnapshot, Self::Error>;

    /// Read the raw 16-bit RTD register (code in bits 15..1, fault in bit 0)
    fn read_rtd(&mut self) -> Result<u16, Self::Error>;

    /// Read the fault status register
    fn fault_status(&mut self) -> Result<FaultFlags, Self::Error>;

    /// Block until a started conversion completes or `timeout_ms` elapses
    fn wait_conversion(&mut self, timeout_ms: u32) -> Result<ConversionWait, Self::Error>;
}
