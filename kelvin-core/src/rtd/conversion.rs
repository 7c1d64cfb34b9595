//! Platinum RTD conversion
//!
//! Integer-only conversion between MAX31865 ADC codes, resistance and
//! temperature using a Callendar-Van Dusen lookup table.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::reading::Reading;
use crate::temperature::{Resistance, Temperature};

/// Full-scale ADC code (15 bits)
pub const FULL_SCALE: u32 = 32_768;

/// Platinum RTD resistance ratio table
///
/// Table format: (temperature_c, resistance_ratio_ppm) where the ratio is
/// R(T) / R0 in parts per million. Generated from the IEC 60751
/// Callendar-Van Dusen equation with:
/// - A = 3.9083e-3
/// - B = -5.775e-7
/// - C = -4.183e-12 (below 0°C only)
///
/// Linear interpolation between 10°C steps stays within 0.02°C.
#[rustfmt::skip]
const RATIO_TABLE: &[(i16, u32)] = &[
    (-200, 185_201), (-190, 228_255), (-180, 270_964), (-170, 313_350),
    (-160, 355_433), (-150, 397_232), (-140, 438_764), (-130, 480_048),
    (-120, 521_098), (-110, 561_930), (-100, 602_558), (-90, 642_996),
    (-80, 683_254), (-70, 723_345), (-60, 763_278), (-50, 803_063),
    (-40, 842_707), (-30, 882_217), (-20, 921_599), (-10, 960_859),
    (0, 1_000_000), (10, 1_039_025), (20, 1_077_935), (30, 1_116_729),
    (40, 1_155_408), (50, 1_193_971), (60, 1_232_419), (70, 1_270_751),
    (80, 1_308_968), (90, 1_347_069), (100, 1_385_055), (110, 1_422_925),
    (120, 1_460_680), (130, 1_498_319), (140, 1_535_843), (150, 1_573_251),
    (160, 1_610_544), (170, 1_647_721), (180, 1_684_783), (190, 1_721_729),
    (200, 1_758_560), (210, 1_795_275), (220, 1_831_875), (230, 1_868_359),
    (240, 1_904_728), (250, 1_940_981), (260, 1_977_119), (270, 2_013_141),
    (280, 2_049_048), (290, 2_084_839), (300, 2_120_515), (310, 2_156_075),
    (320, 2_191_520), (330, 2_226_849), (340, 2_262_063), (350, 2_297_161),
    (360, 2_332_144), (370, 2_367_011), (380, 2_401_763), (390, 2_436_399),
    (400, 2_470_920), (410, 2_505_325), (420, 2_539_615), (430, 2_573_789),
    (440, 2_607_848), (450, 2_641_791), (460, 2_675_619), (470, 2_709_331),
    (480, 2_742_928), (490, 2_776_409), (500, 2_809_775), (510, 2_843_025),
    (520, 2_876_160), (530, 2_909_179), (540, 2_942_083), (550, 2_974_871),
    (560, 3_007_544), (570, 3_040_101), (580, 3_072_543), (590, 3_104_869),
    (600, 3_137_080), (610, 3_169_175), (620, 3_201_155), (630, 3_233_019),
    (640, 3_264_768), (650, 3_296_401), (660, 3_327_919), (670, 3_359_321),
    (680, 3_390_608), (690, 3_421_779), (700, 3_452_835), (710, 3_483_775),
    (720, 3_514_600), (730, 3_545_309), (740, 3_575_903), (750, 3_606_381),
    (760, 3_636_744), (770, 3_666_991), (780, 3_697_123), (790, 3_727_139),
    (800, 3_757_040), (810, 3_786_825), (820, 3_816_495), (830, 3_846_049),
    (840, 3_875_488), (850, 3_904_811),
];

/// Conversion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionError {
    /// Zero code, nothing to convert
    NoData,
    /// Resistance outside the -200°C..850°C table
    OutOfRange,
}

/// Platinum element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RtdKind {
    #[default]
    Pt100,
    Pt1000,
}

impl RtdKind {
    /// Nominal resistance at 0°C
    pub const fn nominal_ohms(self) -> u32 {
        match self {
            RtdKind::Pt100 => 100,
            RtdKind::Pt1000 => 1000,
        }
    }
}

/// Resistance measured by a 15-bit code against `rref_ohms`
pub fn code_to_resistance(code: u16, rref_ohms: u32) -> Resistance {
    let milliohms = rref_ohms as u64 * 1000 * code as u64 / FULL_SCALE as u64;
    Resistance::from_milliohms(milliohms as u32)
}

/// Temperature of an RTD element at the given resistance
pub fn resistance_to_temperature(
    resistance: Resistance,
    kind: RtdKind,
) -> Result<Temperature, ConversionError> {
    if resistance.milliohms() == 0 {
        return Err(ConversionError::NoData);
    }

    let ratio = resistance.milliohms() as u64 * 1000 / kind.nominal_ohms() as u64;
    let (_, lowest) = RATIO_TABLE[0];
    let (_, highest) = RATIO_TABLE[RATIO_TABLE.len() - 1];
    if ratio < lowest as u64 || ratio > highest as u64 {
        return Err(ConversionError::OutOfRange);
    }
    let ratio = ratio as i64;

    for pair in RATIO_TABLE.windows(2) {
        let (t0, p0) = pair[0];
        let (t1, p1) = pair[1];
        let (p0, p1) = (p0 as i64, p1 as i64);

        if ratio >= p0 && ratio <= p1 {
            let t0 = t0 as i64 * 100;
            let span = t1 as i64 * 100 - t0;
            let centi = t0 + (ratio - p0) * span / (p1 - p0);
            return Ok(Temperature::from_centi(centi as i32));
        }
    }

    Err(ConversionError::OutOfRange)
}

/// Temperature from a 15-bit code
pub fn code_to_temperature(
    code: u16,
    rref_ohms: u32,
    kind: RtdKind,
) -> Result<Temperature, ConversionError> {
    if code == 0 {
        return Err(ConversionError::NoData);
    }
    resistance_to_temperature(code_to_resistance(code, rref_ohms), kind)
}

/// 15-bit code the converter reports at `temperature`, rounded to nearest
pub fn temperature_to_code(
    temperature: Temperature,
    rref_ohms: u32,
    kind: RtdKind,
) -> Result<u16, ConversionError> {
    if rref_ohms == 0 {
        return Err(ConversionError::OutOfRange);
    }
    let centi = temperature.centi() as i64;

    for pair in RATIO_TABLE.windows(2) {
        let (t0, p0) = pair[0];
        let (t1, p1) = pair[1];
        let (t0, t1) = (t0 as i64 * 100, t1 as i64 * 100);

        if centi >= t0 && centi <= t1 {
            let (p0, p1) = (p0 as i64, p1 as i64);
            let ratio = p0 + (centi - t0) * (p1 - p0) / (t1 - t0);
            let milliohms = ratio * kind.nominal_ohms() as i64 / 1000;
            let rref = rref_ohms as i64;
            let code = (milliohms * FULL_SCALE as i64 + rref * 500) / (rref * 1000);
            if code >= FULL_SCALE as i64 {
                return Err(ConversionError::OutOfRange);
            }
            return Ok(code as u16);
        }
    }

    Err(ConversionError::OutOfRange)
}

/// Fault threshold register word for `temperature` (code << 1)
pub fn threshold_register(
    temperature: Temperature,
    rref_ohms: u32,
    kind: RtdKind,
) -> Result<u16, ConversionError> {
    temperature_to_code(temperature, rref_ohms, kind).map(|code| code << 1)
}

/// One converted RTD reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtdSample {
    /// 15-bit ADC code
    pub code: u16,
    pub resistance: Resistance,
    pub temperature: Result<Temperature, ConversionError>,
}

impl RtdSample {
    pub fn from_code(code: u16, rref_ohms: u32, kind: RtdKind) -> Self {
        Self {
            code,
            resistance: code_to_resistance(code, rref_ohms),
            temperature: code_to_temperature(code, rref_ohms, kind),
        }
    }

    /// code / 32768 scaled by 10^8
    pub fn ratio_e8(&self) -> u32 {
        (self.code as u64 * 100_000_000 / FULL_SCALE as u64) as u32
    }

    pub fn reading(&self) -> Reading {
        match self.temperature {
            Ok(t) => Reading::Value(t),
            Err(e) => Reading::NoData(e.into()),
        }
    }
}
