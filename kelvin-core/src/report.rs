//! Serial console report formatting
//!
//! Every report is written to any [`core::fmt::Write`] sink with CR LF line
//! endings, so the same code drives the UART and the host tests.

use core::fmt::{self, Write};

use heapless::String;

use crate::ir::{IrChannel, IrSample};
use crate::reading::Reading;
use crate::rtd::{ConversionReport, DeviceStatus, DiagnosticReport, RtdSample};
use crate::traits::ConversionWait;

/// Longest text drawn as a reading
pub const DISPLAY_TEXT_LEN: usize = 16;

const NO_VALUE: &str = "---";

/// Start-up banner
pub fn write_banner<W: Write>(w: &mut W, title: &str, version: &str) -> fmt::Result {
    write!(w, "====================\r\n{} v{}\r\n\r\n", title, version)
}

/// One-shot RTD reading: code, ratio, resistance and temperature
pub fn write_rtd_sample<W: Write>(w: &mut W, sample: &RtdSample) -> fmt::Result {
    let ratio = sample.ratio_e8();
    write!(w, "RTD value: {}\r\n", sample.code)?;
    write!(w, "Ratio = {}.{:08}\r\n", ratio / 100_000_000, ratio % 100_000_000)?;
    write!(w, "Resistance = {}\r\n", sample.resistance)?;
    match sample.temperature {
        Ok(t) => write!(w, "Temperature = {}\r\n", t)?,
        Err(_) => write!(w, "Temperature = {}\r\n", NO_VALUE)?,
    }
    w.write_str("\r\n")
}

/// Full transcript of one diagnostic cycle
pub fn write_diagnostic<W: Write>(
    w: &mut W,
    uptime_s: u32,
    report: &DiagnosticReport,
) -> fmt::Result {
    write!(w, "{}\tChecking MAX31865 SPI chip...", uptime_s)?;

    match report.status {
        DeviceStatus::NotFound => {
            w.write_str("No communication, is breakout board plugged ?\r\n")?;
        }
        DeviceStatus::TransmitError => {
            w.write_str("SPI transmission error, verify wiring!\r\n")?;
            write!(
                w,
                "\t    Set low threshold to 0x{:X} just read 0x{:X}\r\n",
                report.written.low, report.readback.low
            )?;
            write!(
                w,
                "\t    Set high threshold to 0x{:X} just read 0x{:X}\r\n",
                report.written.high, report.readback.high
            )?;
        }
        DeviceStatus::Ok | DeviceStatus::Fault(_) => write_fault_cycle(w, report)?,
    }

    w.write_str("\tDone!\r\n\r\n")
}

fn write_fault_cycle<W: Write>(w: &mut W, report: &DiagnosticReport) -> fmt::Result {
    w.write_str("Found OK!\r\n")?;

    if let Some(stage1) = report.stage1 {
        // Stage 1 always latches REFIN- high; only the stage-2 flags matter
        write!(
            w,
            "\t  Checking manual fault detection Stage 1 status={:02X} => OK!\r\n",
            stage1.bits()
        )?;
    }
    if let Some(fault) = report.fault {
        write!(
            w,
            "\t  Checking manual fault detection Stage 2 status={:02X} => {}\r\n",
            fault.bits(),
            fault
        )?;
    }
    if let Some(conversion) = &report.conversion {
        write_conversion(w, conversion)?;
    }
    Ok(())
}

fn write_conversion<W: Write>(w: &mut W, conversion: &ConversionReport) -> fmt::Result {
    w.write_str("\t  Starting conversion...")?;
    match conversion.wait {
        ConversionWait::Ready { elapsed_ms } => write!(w, "(in {}ms) ", elapsed_ms)?,
        ConversionWait::TimedOut { elapsed_ms } => write!(w, "(timed-out {}ms) ", elapsed_ms)?,
        ConversionWait::Fixed { .. } => {}
    }
    write!(w, "Status:{:02X} \r\n", conversion.fault.bits())?;

    let sample = &conversion.sample;
    write!(w, "\t  RTD:{} Ohms => Temp:", sample.resistance)?;
    match sample.temperature {
        Ok(t) => write!(w, "{:.1} C\r\n", t),
        Err(_) => write!(w, "{} C\r\n", NO_VALUE),
    }
}

const fn channel_label(channel: IrChannel) -> &'static str {
    match channel {
        IrChannel::Ambient => "Ambient",
        IrChannel::Object1 => "Object",
        IrChannel::Object2 => "Object 2",
    }
}

/// Infrared reading with its raw word
pub fn write_ir_sample<W: Write>(
    w: &mut W,
    channel: IrChannel,
    sample: &IrSample,
    no_data_text: &str,
) -> fmt::Result {
    write!(w, "{} = ", channel_label(channel))?;
    if sample.valid {
        write!(w, "{} C", sample.temperature)?;
    } else {
        w.write_str(no_data_text)?;
    }
    write!(w, " (raw 0x{:04X})\r\n", sample.raw)
}

/// Text drawn on the display for a reading
///
/// A value prints with two decimals and a `C` suffix.
pub fn display_text(reading: &Reading, no_data_text: &str) -> String<DISPLAY_TEXT_LEN> {
    let mut text = String::new();
    match reading {
        Reading::Value(t) => {
            let _ = write!(text, "{}C", t);
        }
        Reading::NoData(_) => {
            let _ = text.push_str(no_data_text);
        }
    }
    text
}
