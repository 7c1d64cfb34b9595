//! MAX31865 fault status flags

use core::fmt;

/// Fault status register contents
///
/// Bits 1:0 of the register are unused by the chip and are kept as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultFlags(u8);

impl FaultFlags {
    /// No fault
    pub const NONE: Self = Self(0x00);
    /// RTD resistance above the high fault threshold
    pub const HIGH_THRESHOLD: Self = Self(0x80);
    /// RTD resistance below the low fault threshold
    pub const LOW_THRESHOLD: Self = Self(0x40);
    /// REFIN- > 0.85 x V_BIAS
    pub const REFIN_HIGH: Self = Self(0x20);
    /// REFIN- < 0.85 x V_BIAS, FORCE- open
    pub const REFIN_LOW_OPEN: Self = Self(0x10);
    /// RTDIN- < 0.85 x V_BIAS, FORCE- open
    pub const RTDIN_LOW_OPEN: Self = Self(0x08);
    /// Over-voltage or under-voltage on the inputs
    pub const VOLTAGE: Self = Self(0x04);

    const DESCRIPTIONS: [(Self, &'static str); 6] = [
        (Self::HIGH_THRESHOLD, "RTD high thre. exceeded "),
        (Self::LOW_THRESHOLD, "RTD low thres. exceeded "),
        (Self::REFIN_HIGH, "REFIN- > 0.85x V_BIAS "),
        (Self::REFIN_LOW_OPEN, "REFIN- < 0.85x V_BIAS F- Open "),
        (Self::RTDIN_LOW_OPEN, "RTDIN- < 0.85x V_BIAS F- Open "),
        (Self::VOLTAGE, "Overvoltage / undervoltage "),
    ];

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Human-readable text for every set flag, in register bit order
    pub fn descriptions(self) -> impl Iterator<Item = &'static str> {
        Self::DESCRIPTIONS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, text)| text)
    }
}

impl core::ops::BitOr for FaultFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for FaultFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("OK!");
        }
        for text in self.descriptions() {
            f.write_str(text)?;
        }
        Ok(())
    }
}
