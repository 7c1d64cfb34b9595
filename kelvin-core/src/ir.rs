//! MLX90614 infrared thermometer conversion
//!
//! RAM temperature words are 0.02 K per LSB. Bit 15 flags an error word.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::reading::{NoDataReason, Reading};
use crate::temperature::Temperature;

/// Factory SMBus address
pub const MLX90614_ADDRESS: u8 = 0x5A;

/// RAM registers holding linearised temperatures
pub mod ram {
    pub const AMBIENT: u8 = 0x06;
    pub const OBJECT1: u8 = 0x07;
    pub const OBJECT2: u8 = 0x08;
}

const ERROR_FLAG: u16 = 0x8000;

/// Temperature channel to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IrChannel {
    /// Die temperature
    Ambient,
    /// First thermopile zone
    #[default]
    Object1,
    /// Second thermopile zone (dual-zone parts only)
    Object2,
}

impl IrChannel {
    pub const fn register(self) -> u8 {
        match self {
            IrChannel::Ambient => ram::AMBIENT,
            IrChannel::Object1 => ram::OBJECT1,
            IrChannel::Object2 => ram::OBJECT2,
        }
    }
}

/// Temperature of a RAM word, `raw * 0.02 - 273.15`
pub const fn raw_to_temperature(raw: u16) -> Temperature {
    Temperature::from_centi_kelvin(raw as i32 * 2)
}

/// One infrared reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrSample {
    pub raw: u16,
    pub temperature: Temperature,
    /// Non-zero, error flag clear and within the valid range
    pub valid: bool,
}

impl IrSample {
    pub fn from_raw(raw: u16, max_valid_c: i16) -> Self {
        let temperature = raw_to_temperature(raw);
        let valid = raw != 0
            && raw & ERROR_FLAG == 0
            && temperature <= Temperature::from_celsius(max_valid_c);
        Self {
            raw,
            temperature,
            valid,
        }
    }

    pub fn reading(&self) -> Reading {
        if self.valid {
            Reading::Value(self.temperature)
        } else {
            Reading::NoData(NoDataReason::OutOfRange)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_conversion() {
        // 8000 * 0.02 - 273.15
        assert_eq!(raw_to_temperature(0x1F40).centi(), -11315);
        assert_eq!(raw_to_temperature(0x3AF7).centi(), 2875);
        assert_eq!(raw_to_temperature(0).centi(), -27315);
    }

    #[test]
    fn test_cold_reading_is_shown() {
        let sample = IrSample::from_raw(0x1F40, 1000);
        assert!(sample.valid);
        assert_eq!(sample.reading(), Reading::Value(Temperature::from_centi(-11315)));
    }

    #[test]
    fn test_floating_bus_is_no_data() {
        // 0xFFFF is what a read returns with nothing on the bus
        let sample = IrSample::from_raw(0xFFFF, 1000);
        assert!(!sample.valid);
        assert_eq!(sample.reading(), Reading::NoData(NoDataReason::OutOfRange));
    }

    #[test]
    fn test_stuck_low_bus_is_no_data() {
        // SDA held low reads back as 0x0000, which would be absolute zero
        let sample = IrSample::from_raw(0x0000, 1000);
        assert!(!sample.valid);
        assert_eq!(sample.reading(), Reading::NoData(NoDataReason::OutOfRange));
    }

    #[test]
    fn test_limit_applies_below_error_flag() {
        // 1000°C is 63707 raw, above the error flag, so lower the limit
        let hot = IrSample::from_raw(0x4E20, 100); // 126.85°C
        assert!(!hot.valid);
        let warm = IrSample::from_raw(0x4E20, 150);
        assert!(warm.valid);
    }

    #[test]
    fn test_channel_registers() {
        assert_eq!(IrChannel::Ambient.register(), 0x06);
        assert_eq!(IrChannel::Object1.register(), 0x07);
        assert_eq!(IrChannel::Object2.register(), 0x08);
    }
}
