//! Configuration type definitions
//!
//! These types describe one meter build. The firmware embeds a TOML file
//! with these keys; the build script deserialises it into the same types
//! to reject a bad file before it is flashed.

use heapless::String;

use crate::ir::IrChannel;
use crate::rtd::{
    threshold_register, ConversionError, Filter, RtdKind, ThresholdPair, Wiring,
};
use crate::temperature::Temperature;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum title/banner length
pub const MAX_TEXT_LEN: usize = 24;

/// Which meter program runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SensorKind {
    /// One-shot RTD meter
    #[default]
    Rtd,
    /// RTD meter with link check and fault detection
    RtdDiagnostic,
    /// Infrared thermometer
    Infrared,
}

impl SensorKind {
    pub const fn default_interval_ms(self) -> u32 {
        match self {
            SensorKind::Rtd => 1000,
            SensorKind::RtdDiagnostic => 2000,
            SensorKind::Infrared => 500,
        }
    }

    /// Display text when a cycle yields no temperature
    pub const fn no_data_text(self) -> &'static str {
        match self {
            SensorKind::Rtd | SensorKind::RtdDiagnostic => "NO DATA !!",
            SensorKind::Infrared => "No data I2C",
        }
    }

    pub const fn default_title(self) -> &'static str {
        match self {
            SensorKind::Rtd => "MAX31865 Meter",
            SensorKind::RtdDiagnostic => "MAX31865 Test",
            SensorKind::Infrared => "IR temp",
        }
    }
}

/// RTD probe and converter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RtdSettings {
    pub kind: RtdKind,
    /// Reference resistor on the breakout board
    pub rref_ohms: u32,
    pub wiring: Wiring,
    pub filter: Filter,
    /// Raw low fault threshold register
    pub low_threshold: u16,
    /// Raw high fault threshold register
    pub high_threshold: u16,
    /// Low threshold in °C, overrides the raw register when set
    pub low_threshold_c: Option<i16>,
    /// High threshold in °C, overrides the raw register when set
    pub high_threshold_c: Option<i16>,
    /// DRDY output wired to the board; otherwise conversions wait the
    /// fixed conversion time
    pub data_ready: bool,
}

impl Default for RtdSettings {
    fn default() -> Self {
        Self {
            kind: RtdKind::Pt100,
            rref_ohms: 430,
            wiring: Wiring::Three,
            filter: Filter::Hz50,
            low_threshold: 0x2690,  // -100°C with a 400 Ω reference
            high_threshold: 0x9304, // +350°C
            low_threshold_c: None,
            high_threshold_c: None,
            data_ready: false,
        }
    }
}

impl RtdSettings {
    /// Threshold registers to write, converting °C overrides
    pub fn thresholds(&self) -> Result<ThresholdPair, ConversionError> {
        let low = match self.low_threshold_c {
            Some(c) => threshold_register(Temperature::from_celsius(c), self.rref_ohms, self.kind)?,
            None => self.low_threshold,
        };
        let high = match self.high_threshold_c {
            Some(c) => threshold_register(Temperature::from_celsius(c), self.rref_ohms, self.kind)?,
            None => self.high_threshold,
        };
        Ok(ThresholdPair::new(low, high))
    }
}

/// Blocking delays inside a measurement cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Timing {
    /// Bias on to one-shot start
    pub bias_settle_ms: u32,
    /// One-shot start to RTD read (no data-ready line)
    pub one_shot_ms: u32,
    /// After each manual fault stage
    pub stage_settle_ms: u32,
    /// Between fault stages, five input RC constants
    pub rc_settle_ms: u32,
    /// Upper bound on the data-ready wait
    pub conversion_timeout_ms: u32,
    /// After power-up before the first cycle
    pub warmup_ms: u32,
    /// Splash screen hold time
    pub splash_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            bias_settle_ms: 10,
            one_shot_ms: 65,
            stage_settle_ms: 2,
            rc_settle_ms: 60,
            conversion_timeout_ms: 70,
            warmup_ms: 1000,
            splash_ms: 3000,
        }
    }
}

/// Infrared thermometer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IrSettings {
    /// 7-bit SMBus address
    pub address: u8,
    pub channel: IrChannel,
    /// Readings above this are treated as a floating bus
    pub max_valid_c: i16,
    /// Check the SMBus packet error code
    pub verify_pec: bool,
}

impl Default for IrSettings {
    fn default() -> Self {
        Self {
            address: crate::ir::MLX90614_ADDRESS,
            channel: IrChannel::Object1,
            max_valid_c: 1000,
            verify_pec: false,
        }
    }
}

/// Display layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LayoutKind {
    /// 128x64 monochrome OLED
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "oled_128x64"))]
    Oled128x64,
    /// 160x80 colour LCD
    #[cfg_attr(feature = "serde", serde(rename = "m5stickc"))]
    M5StickC,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplaySettings {
    pub layout: LayoutKind,
    /// Splash title, empty for the sensor default
    pub title: String<MAX_TEXT_LEN>,
    /// Footer text
    pub banner: String<MAX_TEXT_LEN>,
    /// Footer accent, drawn in the highlight colour after the banner
    pub accent: String<MAX_TEXT_LEN>,
    /// Panel contrast / brightness
    pub contrast: u8,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let mut banner = String::new();
        let _ = banner.push_str("YR-Design ");
        let mut accent = String::new();
        let _ = accent.push_str("2020");
        Self {
            layout: LayoutKind::Oled128x64,
            title: String::new(),
            banner,
            accent,
            contrast: 0xCF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialSettings {
    pub baud: u32,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self { baud: 115_200 }
    }
}

/// Complete meter configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeterConfig {
    pub sensor: SensorKind,
    /// Cycle period, sensor default when absent
    pub interval_ms: Option<u32>,
    pub rtd: RtdSettings,
    pub timing: Timing,
    pub ir: IrSettings,
    pub display: DisplaySettings,
    pub serial: SerialSettings,
}

impl MeterConfig {
    /// Defaults for a sensor program
    pub fn for_sensor(sensor: SensorKind) -> Self {
        Self {
            sensor,
            ..Default::default()
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
            .unwrap_or_else(|| self.sensor.default_interval_ms())
    }

    /// Splash title
    pub fn title(&self) -> &str {
        if self.display.title.is_empty() {
            self.sensor.default_title()
        } else {
            self.display.title.as_str()
        }
    }
}
