//! Minimal TOML parser for the embedded meter configuration
//!
//! Handles only the subset `meter.toml` uses; it does NOT support the full
//! TOML grammar and needs no allocator.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - Decimal and `0x` hexadecimal integers, with `_` separators
//! - [section] headers
//! - Comments (# ...), including after a value
//!
//! Unknown keys are ignored. The build script runs the full `toml` crate
//! over the same file, so anything this parser rejects was already caught
//! at compile time.

use heapless::String;

use super::types::{LayoutKind, MeterConfig, SensorKind, MAX_TEXT_LEN};
use crate::ir::IrChannel;
use crate::rtd::{Filter, RtdKind, Wiring};

/// Parse error, with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection { line: u16 },
    /// Value of the wrong type or out of range
    InvalidValue { line: u16 },
    /// Text longer than the configuration can hold
    TextTooLong { line: u16 },
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Rtd,
    Timing,
    Ir,
    Display,
    Serial,
}

/// Value-level failure, tagged with a line by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueError {
    Invalid,
    TooLong,
}

impl ValueError {
    fn at(self, line: u16) -> ParseError {
        match self {
            ValueError::Invalid => ParseError::InvalidValue { line },
            ValueError::TooLong => ParseError::TextTooLong { line },
        }
    }
}

/// Parse TOML text into a [`MeterConfig`]
///
/// Keys the file leaves out keep their defaults.
pub fn parse_config(input: &str) -> Result<MeterConfig, ParseError> {
    let mut config = MeterConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = (index + 1).min(u16::MAX as usize) as u16;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line).ok_or(ParseError::InvalidSection { line: line_no })?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config).map_err(|e| e.at(line_no))?;
        }
    }

    Ok(config)
}

/// Parse a header line like `[rtd]`, trailing comment allowed
fn parse_section_header(line: &str) -> Option<Section> {
    let end = line.find(']')?;
    let rest = line[end + 1..].trim();
    if !rest.is_empty() && !rest.starts_with('#') {
        return None;
    }

    match line[1..end].trim() {
        "rtd" => Some(Section::Rtd),
        "timing" => Some(Section::Timing),
        "ir" => Some(Section::Ir),
        "display" => Some(Section::Display),
        "serial" => Some(Section::Serial),
        _ => None,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Strip a trailing comment unless the # sits inside a string
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip quotes from a string value
fn parse_str(value: &str) -> Result<&str, ValueError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ValueError::Invalid)
    }
}

fn parse_text(value: &str) -> Result<String<MAX_TEXT_LEN>, ValueError> {
    let s = parse_str(value)?;
    let mut text = String::new();
    text.push_str(s).map_err(|_| ValueError::TooLong)?;
    Ok(text)
}

/// Parse a decimal or `0x` hex integer into any integer type
fn parse_int<T: TryFrom<i64>>(value: &str) -> Result<T, ValueError> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let (radix, digits) = match digits.strip_prefix("0x") {
        Some(hex) => (16, hex),
        None => (10, digits),
    };

    let mut acc: i64 = 0;
    let mut seen = false;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let d = c.to_digit(radix).ok_or(ValueError::Invalid)?;
        acc = acc
            .checked_mul(radix as i64)
            .and_then(|a| a.checked_add(d as i64))
            .ok_or(ValueError::Invalid)?;
        seen = true;
    }
    if !seen {
        return Err(ValueError::Invalid);
    }

    let acc = if negative { -acc } else { acc };
    T::try_from(acc).map_err(|_| ValueError::Invalid)
}

fn parse_bool(value: &str) -> Result<bool, ValueError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ValueError::Invalid),
    }
}

fn parse_sensor(value: &str) -> Result<SensorKind, ValueError> {
    match parse_str(value)? {
        "rtd" => Ok(SensorKind::Rtd),
        "rtd_diagnostic" => Ok(SensorKind::RtdDiagnostic),
        "infrared" => Ok(SensorKind::Infrared),
        _ => Err(ValueError::Invalid),
    }
}

fn parse_rtd_kind(value: &str) -> Result<RtdKind, ValueError> {
    match parse_str(value)? {
        "pt100" => Ok(RtdKind::Pt100),
        "pt1000" => Ok(RtdKind::Pt1000),
        _ => Err(ValueError::Invalid),
    }
}

fn parse_wiring(value: &str) -> Result<Wiring, ValueError> {
    match parse_str(value)? {
        "two" => Ok(Wiring::Two),
        "three" => Ok(Wiring::Three),
        "four" => Ok(Wiring::Four),
        _ => Err(ValueError::Invalid),
    }
}

fn parse_filter(value: &str) -> Result<Filter, ValueError> {
    match parse_str(value)? {
        "50hz" => Ok(Filter::Hz50),
        "60hz" => Ok(Filter::Hz60),
        _ => Err(ValueError::Invalid),
    }
}

fn parse_channel(value: &str) -> Result<IrChannel, ValueError> {
    match parse_str(value)? {
        "ambient" => Ok(IrChannel::Ambient),
        "object1" => Ok(IrChannel::Object1),
        "object2" => Ok(IrChannel::Object2),
        _ => Err(ValueError::Invalid),
    }
}

fn parse_layout(value: &str) -> Result<LayoutKind, ValueError> {
    match parse_str(value)? {
        "oled_128x64" => Ok(LayoutKind::Oled128x64),
        "m5stickc" => Ok(LayoutKind::M5StickC),
        _ => Err(ValueError::Invalid),
    }
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MeterConfig,
) -> Result<(), ValueError> {
    match section {
        Section::Root => match key {
            "sensor" => config.sensor = parse_sensor(value)?,
            "interval_ms" => config.interval_ms = Some(parse_int(value)?),
            _ => {} // Ignore unknown keys
        },
        Section::Rtd => {
            let rtd = &mut config.rtd;
            match key {
                "kind" => rtd.kind = parse_rtd_kind(value)?,
                "rref_ohms" => rtd.rref_ohms = parse_int(value)?,
                "wiring" => rtd.wiring = parse_wiring(value)?,
                "filter" => rtd.filter = parse_filter(value)?,
                "low_threshold" => rtd.low_threshold = parse_int(value)?,
                "high_threshold" => rtd.high_threshold = parse_int(value)?,
                "low_threshold_c" => rtd.low_threshold_c = Some(parse_int(value)?),
                "high_threshold_c" => rtd.high_threshold_c = Some(parse_int(value)?),
                "data_ready" => rtd.data_ready = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Timing => {
            let timing = &mut config.timing;
            let field = match key {
                "bias_settle_ms" => &mut timing.bias_settle_ms,
                "one_shot_ms" => &mut timing.one_shot_ms,
                "stage_settle_ms" => &mut timing.stage_settle_ms,
                "rc_settle_ms" => &mut timing.rc_settle_ms,
                "conversion_timeout_ms" => &mut timing.conversion_timeout_ms,
                "warmup_ms" => &mut timing.warmup_ms,
                "splash_ms" => &mut timing.splash_ms,
                _ => return Ok(()),
            };
            *field = parse_int(value)?;
        }
        Section::Ir => {
            let ir = &mut config.ir;
            match key {
                "address" => ir.address = parse_int(value)?,
                "channel" => ir.channel = parse_channel(value)?,
                "max_valid_c" => ir.max_valid_c = parse_int(value)?,
                "verify_pec" => ir.verify_pec = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Display => {
            let display = &mut config.display;
            match key {
                "layout" => display.layout = parse_layout(value)?,
                "title" => display.title = parse_text(value)?,
                "banner" => display.banner = parse_text(value)?,
                "accent" => display.accent = parse_text(value)?,
                "contrast" => display.contrast = parse_int(value)?,
                _ => {}
            }
        }
        Section::Serial => {
            if key == "baud" {
                config.serial.baud = parse_int(value)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_forms() {
        assert_eq!(parse_int::<u16>("0x9304"), Ok(0x9304));
        assert_eq!(parse_int::<u32>("115_200"), Ok(115_200));
        assert_eq!(parse_int::<i16>("-100"), Ok(-100));
        assert_eq!(parse_int::<u8>("256"), Err(ValueError::Invalid));
        assert_eq!(parse_int::<u8>("-1"), Err(ValueError::Invalid));
        assert_eq!(parse_int::<u32>("0x"), Err(ValueError::Invalid));
        assert_eq!(parse_int::<u32>("12ms"), Err(ValueError::Invalid));
    }

    #[test]
    fn test_parse_key_value_strips_comment() {
        assert_eq!(
            parse_key_value("wiring = \"three\"   # two | three"),
            Some(("wiring", "\"three\""))
        );
        assert_eq!(
            parse_key_value("title = \"No #1\""),
            Some(("title", "\"No #1\""))
        );
        assert_eq!(parse_key_value("orphan"), None);
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("[rtd]"), Some(Section::Rtd));
        assert_eq!(parse_section_header("[ timing ] # delays"), Some(Section::Timing));
        assert_eq!(parse_section_header("[heater]"), None);
        assert_eq!(parse_section_header("[rtd"), None);
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
sensor = "rtd_diagnostic"
interval_ms = 2500

[rtd]
kind = "pt1000"
rref_ohms = 4300
wiring = "four"
filter = "60hz"
low_threshold = 0x1000
high_threshold_c = 350
data_ready = true

[timing]
rc_settle_ms = 80
conversion_timeout_ms = 90

[ir]
address = 0x5B
channel = "ambient"
verify_pec = true

[display]
layout = "m5stickc"
title = "Bath"
banner = "YR-Design "
contrast = 64

[serial]
baud = 9600
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.sensor, SensorKind::RtdDiagnostic);
        assert_eq!(config.interval_ms(), 2500);
        assert_eq!(config.rtd.kind, RtdKind::Pt1000);
        assert_eq!(config.rtd.rref_ohms, 4300);
        assert_eq!(config.rtd.wiring, Wiring::Four);
        assert_eq!(config.rtd.filter, Filter::Hz60);
        assert_eq!(config.rtd.low_threshold, 0x1000);
        assert_eq!(config.rtd.high_threshold_c, Some(350));
        assert!(config.rtd.data_ready);
        assert_eq!(config.timing.rc_settle_ms, 80);
        assert_eq!(config.timing.bias_settle_ms, 10);
        assert_eq!(config.ir.address, 0x5B);
        assert_eq!(config.ir.channel, IrChannel::Ambient);
        assert!(config.ir.verify_pec);
        assert_eq!(config.display.layout, LayoutKind::M5StickC);
        assert_eq!(config.title(), "Bath");
        assert_eq!(config.display.banner.as_str(), "YR-Design ");
        assert_eq!(config.display.accent.as_str(), "2020");
        assert_eq!(config.display.contrast, 64);
        assert_eq!(config.serial.baud, 9600);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        let config = parse_config("# nothing here\n").unwrap();
        assert_eq!(config, MeterConfig::default());
        assert_eq!(config.interval_ms(), 1000);
    }

    #[test]
    fn test_errors_carry_line() {
        assert_eq!(
            parse_config("sensor = \"rtd\"\n[pump]\n"),
            Err(ParseError::InvalidSection { line: 2 })
        );
        assert_eq!(
            parse_config("[rtd]\nwiring = \"five\"\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[display]\n\ntitle = \"a title far too long for the panel\"\n"),
            Err(ParseError::TextTooLong { line: 3 })
        );
    }

    #[test]
    fn test_shipped_file_documents_defaults() {
        let config = parse_config(include_str!("../../../kelvin-firmware/meter.toml")).unwrap();
        assert_eq!(config, MeterConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_config("[ir]\nemissivity = 0.95\naddress = 0x5A\n").unwrap();
        assert_eq!(config.ir.address, 0x5A);
    }
}
