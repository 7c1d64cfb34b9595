//! MAX31865 register model
//!
//! The chip has eight byte-wide registers. Reads address them directly,
//! writes set bit 7 of the address. A burst read starting at 0x00 returns
//! all eight in order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Register addresses (read form)
pub mod reg {
    /// Configuration
    pub const CONFIG: u8 = 0x00;
    /// RTD resistance data, MSB
    pub const RTD_MSB: u8 = 0x01;
    /// RTD resistance data, LSB
    pub const RTD_LSB: u8 = 0x02;
    /// High fault threshold, MSB
    pub const HIGH_FAULT_MSB: u8 = 0x03;
    /// High fault threshold, LSB
    pub const HIGH_FAULT_LSB: u8 = 0x04;
    /// Low fault threshold, MSB
    pub const LOW_FAULT_MSB: u8 = 0x05;
    /// Low fault threshold, LSB
    pub const LOW_FAULT_LSB: u8 = 0x06;
    /// Fault status
    pub const FAULT_STATUS: u8 = 0x07;

    /// Number of registers returned by a full burst read
    pub const COUNT: usize = 8;

    /// Address bit selecting a write access
    pub const WRITE: u8 = 0x80;
}

/// Configuration register bits
pub mod bits {
    pub const VBIAS: u8 = 0x80;
    pub const AUTO_CONVERT: u8 = 0x40;
    pub const ONE_SHOT: u8 = 0x20;
    pub const THREE_WIRE: u8 = 0x10;
    pub const FAULT_CYCLE_MASK: u8 = 0x0C;
    pub const FAULT_CLEAR: u8 = 0x02;
    pub const FILTER_50HZ: u8 = 0x01;
}

/// RTD wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Wiring {
    Two,
    #[default]
    Three,
    Four,
}

/// Mains rejection notch filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Filter {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "50hz"))]
    Hz50,
    #[cfg_attr(feature = "serde", serde(rename = "60hz"))]
    Hz60,
}

impl Filter {
    /// Worst-case one-shot conversion time
    pub const fn max_conversion_ms(self) -> u32 {
        match self {
            Filter::Hz50 => 66,
            Filter::Hz60 => 55,
        }
    }
}

/// Fault detection cycle control (config bits D3:D2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultCycle {
    /// No action
    #[default]
    None,
    /// Automatic delay detection
    Automatic,
    /// Manual cycle, first stage (bias settling)
    ManualStage1,
    /// Manual cycle, second stage (comparison)
    ManualStage2,
}

impl FaultCycle {
    const fn bits(self) -> u8 {
        match self {
            FaultCycle::None => 0x00,
            FaultCycle::Automatic => 0x04,
            FaultCycle::ManualStage1 => 0x08,
            FaultCycle::ManualStage2 => 0x0C,
        }
    }

    const fn from_bits(byte: u8) -> Self {
        match byte & bits::FAULT_CYCLE_MASK {
            0x04 => FaultCycle::Automatic,
            0x08 => FaultCycle::ManualStage1,
            0x0C => FaultCycle::ManualStage2,
            _ => FaultCycle::None,
        }
    }
}

/// Configuration register contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtdConfig {
    /// Bias voltage on
    pub bias: bool,
    /// Continuous conversion
    pub auto_convert: bool,
    /// Start a single conversion (self-clearing)
    pub one_shot: bool,
    pub wiring: Wiring,
    pub fault_cycle: FaultCycle,
    /// Clear latched faults (self-clearing)
    pub clear_faults: bool,
    pub filter: Filter,
}

impl RtdConfig {
    /// Bias off, no conversion, no fault cycle
    pub const fn idle(wiring: Wiring, filter: Filter) -> Self {
        Self {
            bias: false,
            auto_convert: false,
            one_shot: false,
            wiring,
            fault_cycle: FaultCycle::None,
            clear_faults: false,
            filter,
        }
    }

    /// Encode into the register byte
    pub const fn to_register(&self) -> u8 {
        let mut byte = self.fault_cycle.bits();
        if self.bias {
            byte |= bits::VBIAS;
        }
        if self.auto_convert {
            byte |= bits::AUTO_CONVERT;
        }
        if self.one_shot {
            byte |= bits::ONE_SHOT;
        }
        if matches!(self.wiring, Wiring::Three) {
            byte |= bits::THREE_WIRE;
        }
        if self.clear_faults {
            byte |= bits::FAULT_CLEAR;
        }
        if matches!(self.filter, Filter::Hz50) {
            byte |= bits::FILTER_50HZ;
        }
        byte
    }

    /// Decode a register byte
    ///
    /// Two- and four-wire share an encoding; both decode as [`Wiring::Four`].
    pub const fn from_register(byte: u8) -> Self {
        Self {
            bias: byte & bits::VBIAS != 0,
            auto_convert: byte & bits::AUTO_CONVERT != 0,
            one_shot: byte & bits::ONE_SHOT != 0,
            wiring: if byte & bits::THREE_WIRE != 0 {
                Wiring::Three
            } else {
                Wiring::Four
            },
            fault_cycle: FaultCycle::from_bits(byte),
            clear_faults: byte & bits::FAULT_CLEAR != 0,
            filter: if byte & bits::FILTER_50HZ != 0 {
                Filter::Hz50
            } else {
                Filter::Hz60
            },
        }
    }

    pub const fn with_fault_cycle(mut self, cycle: FaultCycle) -> Self {
        self.fault_cycle = cycle;
        self
    }
}

/// Low and high fault threshold registers
///
/// Values are raw register words: the 15-bit code shifted left by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThresholdPair {
    pub low: u16,
    pub high: u16,
}

impl ThresholdPair {
    /// Thresholds that never trip
    pub const FULL_RANGE: Self = Self {
        low: 0x0000,
        high: 0xFFFF,
    };

    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }
}

/// All eight registers from one burst read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterSnapshot {
    pub regs: [u8; reg::COUNT],
}

impl RegisterSnapshot {
    pub const fn new(regs: [u8; reg::COUNT]) -> Self {
        Self { regs }
    }

    fn word(&self, msb: u8) -> u16 {
        let i = msb as usize;
        u16::from_be_bytes([self.regs[i], self.regs[i + 1]])
    }

    /// Raw RTD register (code in bits 15..1, fault in bit 0)
    pub fn rtd_word(&self) -> u16 {
        self.word(reg::RTD_MSB)
    }

    /// 15-bit ADC code
    pub fn rtd_code(&self) -> u16 {
        self.rtd_word() >> 1
    }

    pub fn thresholds(&self) -> ThresholdPair {
        ThresholdPair {
            low: self.word(reg::LOW_FAULT_MSB),
            high: self.word(reg::HIGH_FAULT_MSB),
        }
    }

    pub fn fault_status(&self) -> crate::rtd::FaultFlags {
        crate::rtd::FaultFlags::from_bits(self.regs[reg::FAULT_STATUS as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_full_diagnostic_config() {
        // bias, three-wire, fault clear, 50 Hz
        let config = RtdConfig {
            bias: true,
            wiring: Wiring::Three,
            clear_faults: true,
            filter: Filter::Hz50,
            ..Default::default()
        };
        assert_eq!(config.to_register(), 0x93);
    }

    #[test]
    fn test_manual_fault_cycle_bits() {
        let base = RtdConfig {
            bias: true,
            wiring: Wiring::Four,
            filter: Filter::Hz60,
            ..Default::default()
        };
        assert_eq!(
            base.with_fault_cycle(FaultCycle::ManualStage1).to_register(),
            0x88
        );
        assert_eq!(
            base.with_fault_cycle(FaultCycle::ManualStage2).to_register(),
            0x8C
        );
        assert_eq!(
            base.with_fault_cycle(FaultCycle::Automatic).to_register(),
            0x84
        );
    }

    #[test]
    fn test_decode_round_trips_every_byte() {
        for byte in 0..=u8::MAX {
            assert_eq!(RtdConfig::from_register(byte).to_register(), byte);
        }
    }

    #[test]
    fn test_two_wire_decodes_as_four_wire() {
        let two = RtdConfig::idle(Wiring::Two, Filter::Hz60);
        let byte = two.to_register();
        assert_eq!(byte, 0x00);
        assert_eq!(RtdConfig::from_register(byte).wiring, Wiring::Four);
    }

    #[test]
    fn test_snapshot_accessors() {
        let snap = RegisterSnapshot::new([0xD1, 0x40, 0x01, 0x93, 0x04, 0x26, 0x90, 0x40]);
        assert_eq!(snap.rtd_word(), 0x4001);
        assert_eq!(snap.rtd_code(), 0x2000);
        assert_eq!(snap.thresholds(), ThresholdPair::new(0x2690, 0x9304));
        assert_eq!(snap.fault_status().bits(), 0x40);
    }
}
