//! Configuration types
//!
//! Board-agnostic meter configuration plus the semantic checks shared by
//! the build script and the firmware loader.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;

use core::fmt;

/// Largest reference resistor accepted; keeps resistances within `u32`
/// milliohms
pub const MAX_RREF_OHMS: u32 = 100_000;

/// Semantic configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Poll interval of zero
    ZeroInterval,
    /// Reference resistor of zero or above [`MAX_RREF_OHMS`]
    ReferenceOutOfRange(u32),
    /// Low threshold not below high threshold
    InvalidThresholds { low: u16, high: u16 },
    /// Threshold temperature outside the conversion table
    ThresholdOutOfRange,
    /// Not a 7-bit device address
    InvalidAddress(u8),
    /// Data-ready timeout shorter than a conversion
    ConversionTimeoutTooShort { timeout_ms: u32, min_ms: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigError::ZeroInterval => f.write_str("interval_ms must be greater than zero"),
            ConfigError::ReferenceOutOfRange(ohms) => write!(
                f,
                "rtd.rref_ohms {} must be between 1 and {}",
                ohms, MAX_RREF_OHMS
            ),
            ConfigError::InvalidThresholds { low, high } => write!(
                f,
                "rtd low threshold 0x{:04X} must be below high threshold 0x{:04X}",
                low, high
            ),
            ConfigError::ThresholdOutOfRange => {
                f.write_str("rtd threshold temperature outside -200..850 C")
            }
            ConfigError::InvalidAddress(addr) => {
                write!(f, "ir.address 0x{:02X} is not a 7-bit address", addr)
            }
            ConfigError::ConversionTimeoutTooShort { timeout_ms, min_ms } => write!(
                f,
                "timing.conversion_timeout_ms {} is shorter than a {} ms conversion",
                timeout_ms, min_ms
            ),
        }
    }
}

impl MeterConfig {
    /// Check the values a TOML file cannot constrain by type alone
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms() == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        match self.sensor {
            SensorKind::Rtd | SensorKind::RtdDiagnostic => self.validate_rtd(),
            SensorKind::Infrared => self.validate_ir(),
        }
    }

    fn validate_rtd(&self) -> Result<(), ConfigError> {
        let rref_ohms = self.rtd.rref_ohms;
        if rref_ohms == 0 || rref_ohms > MAX_RREF_OHMS {
            return Err(ConfigError::ReferenceOutOfRange(rref_ohms));
        }

        let thresholds = self
            .rtd
            .thresholds()
            .map_err(|_| ConfigError::ThresholdOutOfRange)?;
        if thresholds.low >= thresholds.high {
            return Err(ConfigError::InvalidThresholds {
                low: thresholds.low,
                high: thresholds.high,
            });
        }

        let min_ms = self.rtd.filter.max_conversion_ms();
        if self.timing.conversion_timeout_ms < min_ms {
            return Err(ConfigError::ConversionTimeoutTooShort {
                timeout_ms: self.timing.conversion_timeout_ms,
                min_ms,
            });
        }
        Ok(())
    }

    fn validate_ir(&self) -> Result<(), ConfigError> {
        let addr = self.ir.address;
        // 0x00 is the general call, 0x78.. are reserved
        if addr == 0 || addr > 0x77 {
            return Err(ConfigError::InvalidAddress(addr));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtd::{RtdKind, ThresholdPair};

    #[test]
    fn test_defaults_validate() {
        for sensor in [SensorKind::Rtd, SensorKind::RtdDiagnostic, SensorKind::Infrared] {
            assert_eq!(MeterConfig::for_sensor(sensor).validate(), Ok(()));
        }
    }

    #[test]
    fn test_interval_defaults_per_sensor() {
        assert_eq!(MeterConfig::for_sensor(SensorKind::Rtd).interval_ms(), 1000);
        assert_eq!(
            MeterConfig::for_sensor(SensorKind::RtdDiagnostic).interval_ms(),
            2000
        );
        assert_eq!(MeterConfig::for_sensor(SensorKind::Infrared).interval_ms(), 500);

        let mut config = MeterConfig::for_sensor(SensorKind::Infrared);
        config.interval_ms = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn test_celsius_thresholds_override_raw() {
        let settings = RtdSettings {
            rref_ohms: 400,
            low_threshold_c: Some(-100),
            high_threshold_c: Some(350),
            low_threshold: 0,
            high_threshold: 0,
            ..Default::default()
        };
        assert_eq!(settings.thresholds(), Ok(ThresholdPair::new(0x2690, 0x9304)));
    }

    #[test]
    fn test_rejects_bad_rtd_settings() {
        let mut config = MeterConfig::for_sensor(SensorKind::RtdDiagnostic);
        config.rtd.low_threshold = 0x9304;
        config.rtd.high_threshold = 0x2690;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThresholds { .. })
        ));

        let mut config = MeterConfig::for_sensor(SensorKind::Rtd);
        config.rtd.kind = RtdKind::Pt1000;
        config.rtd.high_threshold_c = Some(900);
        assert_eq!(config.validate(), Err(ConfigError::ThresholdOutOfRange));

        let mut config = MeterConfig::for_sensor(SensorKind::Rtd);
        config.rtd.rref_ohms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ReferenceOutOfRange(0)));

        // 5 MΩ would overflow the milliohm resistance
        config.rtd.rref_ohms = 5_000_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ReferenceOutOfRange(5_000_000))
        );
        config.rtd.rref_ohms = MAX_RREF_OHMS;
        assert_eq!(config.validate(), Ok(()));

        let mut config = MeterConfig::for_sensor(SensorKind::RtdDiagnostic);
        config.timing.conversion_timeout_ms = 50;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ConversionTimeoutTooShort {
                timeout_ms: 50,
                min_ms: 66
            })
        );
    }

    #[test]
    fn test_rejects_bad_ir_address() {
        let mut config = MeterConfig::for_sensor(SensorKind::Infrared);
        config.ir.address = 0xB4;
        assert_eq!(config.validate(), Err(ConfigError::InvalidAddress(0xB4)));
    }

    #[test]
    fn test_title_falls_back_to_sensor_default() {
        let mut config = MeterConfig::for_sensor(SensorKind::Infrared);
        assert_eq!(config.title(), "IR temp");
        config.display.title.push_str("Kiln").unwrap();
        assert_eq!(config.title(), "Kiln");
    }
}
