//! Fixed-point temperature and resistance values
//!
//! All arithmetic stays in integers so the same code runs on the M0+ (no
//! FPU) and on the host. Temperatures are hundredths of a degree Celsius,
//! resistances are milliohms.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Offset between the Kelvin and Celsius scales, in hundredths
pub const ZERO_CELSIUS_CENTI_KELVIN: i32 = 27_315;

/// Temperature in hundredths of a degree Celsius
///
/// `Display` prints two decimals by default and honours a smaller
/// precision (`{:.1}`, `{:.0}`), rounding half away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Temperature(i32);

impl Temperature {
    /// 0.00°C
    pub const ZERO: Self = Self(0);

    /// Create from hundredths of a degree
    pub const fn from_centi(centi: i32) -> Self {
        Self(centi)
    }

    /// Create from whole degrees
    pub const fn from_celsius(celsius: i16) -> Self {
        Self(celsius as i32 * 100)
    }

    /// Create from hundredths of a kelvin
    pub const fn from_centi_kelvin(centi_kelvin: i32) -> Self {
        Self(centi_kelvin - ZERO_CELSIUS_CENTI_KELVIN)
    }

    /// Value in hundredths of a degree
    pub const fn centi(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2).min(2);
        let scale: i64 = 10i64.pow(2 - precision as u32);
        let value = self.0 as i64;

        let rounded = if value >= 0 {
            (value + scale / 2) / scale
        } else {
            (value - scale / 2) / scale
        };

        let sign = if rounded < 0 { "-" } else { "" };
        let magnitude = rounded.unsigned_abs();
        let divisor = 10u64.pow(precision as u32);

        if precision == 0 {
            write!(f, "{}{}", sign, magnitude)
        } else {
            write!(
                f,
                "{}{}.{:0width$}",
                sign,
                magnitude / divisor,
                magnitude % divisor,
                width = precision
            )
        }
    }
}

/// Resistance in milliohms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Resistance(u32);

impl Resistance {
    pub const fn from_milliohms(milliohms: u32) -> Self {
        Self(milliohms)
    }

    pub const fn from_ohms(ohms: u32) -> Self {
        Self(ohms * 1000)
    }

    pub const fn milliohms(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Resistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::format;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(format!("{}", Temperature::from_centi(1924)), "19.24");
        assert_eq!(format!("{}", Temperature::from_centi(-11315)), "-113.15");
        assert_eq!(format!("{}", Temperature::from_centi(5)), "0.05");
        assert_eq!(format!("{}", Temperature::from_centi(-5)), "-0.05");
    }

    #[test]
    fn test_display_rounds_to_precision() {
        assert_eq!(format!("{:.1}", Temperature::from_centi(1925)), "19.3");
        assert_eq!(format!("{:.1}", Temperature::from_centi(1924)), "19.2");
        assert_eq!(format!("{:.1}", Temperature::from_centi(-2077)), "-20.8");
        assert_eq!(format!("{:.0}", Temperature::from_centi(2450)), "25");
        assert_eq!(format!("{:.1}", Temperature::from_centi(-4)), "0.0");
    }

    #[test]
    fn test_kelvin_offset() {
        // 0.02 K resolution word 15095 from the infrared sensor
        let t = Temperature::from_centi_kelvin(15095 * 2);
        assert_eq!(t.centi(), 2875);
    }

    #[test]
    fn test_resistance_display() {
        assert_eq!(format!("{}", Resistance::from_milliohms(107_500)), "107.500");
        assert_eq!(format!("{}", Resistance::from_milliohms(1_000_112)), "1000.112");
        assert_eq!(format!("{}", Resistance::from_ohms(430)), "430.000");
    }
}
