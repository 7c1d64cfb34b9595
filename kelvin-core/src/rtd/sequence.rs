//! RTD measurement sequences
//!
//! Two programs drive the converter:
//!
//! - [`read_one_shot`]: bias on, clear faults, settle, one-shot conversion,
//!   read the RTD register, bias off.
//! - [`run_diagnostic`]: full configuration and threshold readback to
//!   check the SPI link, a two-stage manual fault detection cycle and,
//!   if no fault is flagged, a one-shot conversion bounded by the
//!   data-ready line.
//!
//! Both block the caller for the whole cycle; every wait is a
//! [`DelayNs`] call or the front end's own conversion wait.

use embedded_hal::delay::DelayNs;

use super::{
    classify_link, DeviceStatus, FaultCycle, FaultFlags, Filter, RtdConfig, RtdSample,
    ThresholdPair, Wiring,
};
use crate::config::{RtdSettings, Timing};
use crate::reading::{NoDataReason, Reading};
use crate::traits::{ConversionWait, RtdFrontEnd};

/// Put the converter into a known idle state
///
/// Bias off, no automatic conversion, faults cleared and thresholds set so
/// they never trip.
pub fn begin<F: RtdFrontEnd>(dev: &mut F, wiring: Wiring, filter: Filter) -> Result<(), F::Error> {
    let config = RtdConfig {
        clear_faults: true,
        ..RtdConfig::idle(wiring, filter)
    };
    dev.configure(&config)?;
    dev.write_thresholds(ThresholdPair::FULL_RANGE)
}

/// Take one biased one-shot reading
pub fn read_one_shot<F, D>(
    dev: &mut F,
    delay: &mut D,
    settings: &RtdSettings,
    timing: &Timing,
) -> Result<RtdSample, F::Error>
where
    F: RtdFrontEnd,
    D: DelayNs,
{
    let idle = RtdConfig::idle(settings.wiring, settings.filter);
    let biased = RtdConfig { bias: true, ..idle };

    dev.configure(&RtdConfig {
        clear_faults: true,
        ..biased
    })?;
    delay.delay_ms(timing.bias_settle_ms);

    dev.configure(&RtdConfig {
        one_shot: true,
        ..biased
    })?;
    delay.delay_ms(timing.one_shot_ms);

    let word = dev.read_rtd();
    // Bias off even when the read failed
    let off = dev.configure(&idle);
    let word = word?;
    off?;

    Ok(RtdSample::from_code(
        word >> 1,
        settings.rref_ohms,
        settings.kind,
    ))
}

/// Conversion performed after a clean fault cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConversionReport {
    pub wait: ConversionWait,
    /// Fault status register read with the result
    pub fault: FaultFlags,
    pub sample: RtdSample,
}

/// Everything one diagnostic cycle found out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiagnosticReport {
    /// Thresholds written
    pub written: ThresholdPair,
    /// Thresholds read back
    pub readback: ThresholdPair,
    pub status: DeviceStatus,
    /// Fault status after manual stage 1
    pub stage1: Option<FaultFlags>,
    /// Fault status after manual stage 2
    pub fault: Option<FaultFlags>,
    pub conversion: Option<ConversionReport>,
}

impl DiagnosticReport {
    /// Report for a cycle whose bus transfers failed outright
    pub fn no_communication(written: ThresholdPair) -> Self {
        Self {
            written,
            readback: ThresholdPair::new(0x0000, 0x0000),
            status: DeviceStatus::NotFound,
            stage1: None,
            fault: None,
            conversion: None,
        }
    }

    /// Link up, no fault flags anywhere and a usable conversion
    pub fn is_healthy(&self) -> bool {
        self.status.is_ok()
            && self
                .conversion
                .is_some_and(|c| c.fault.is_empty() && c.sample.code != 0)
    }

    /// What to display for this cycle
    pub fn reading(&self) -> Reading {
        match self.status {
            DeviceStatus::NotFound => return Reading::NoData(NoDataReason::NotFound),
            DeviceStatus::TransmitError => return Reading::NoData(NoDataReason::TransmitError),
            DeviceStatus::Fault(_) => return Reading::NoData(NoDataReason::Fault),
            DeviceStatus::Ok => {}
        }

        match self.conversion {
            Some(c) if !c.fault.is_empty() => Reading::NoData(NoDataReason::Fault),
            Some(c) => c.sample.reading(),
            None => Reading::NoData(NoDataReason::ZeroReading),
        }
    }
}

/// Run one full link check, fault detection and conversion cycle
///
/// Bus errors abort the cycle; a found device is always returned to the
/// idle configuration before this returns.
pub fn run_diagnostic<F, D>(
    dev: &mut F,
    delay: &mut D,
    settings: &RtdSettings,
    thresholds: ThresholdPair,
    timing: &Timing,
) -> Result<DiagnosticReport, F::Error>
where
    F: RtdFrontEnd,
    D: DelayNs,
{
    let idle = RtdConfig::idle(settings.wiring, settings.filter);
    let biased = RtdConfig { bias: true, ..idle };

    dev.configure(&RtdConfig {
        clear_faults: true,
        ..biased
    })?;
    dev.write_thresholds(thresholds)?;

    let readback = dev.read_snapshot()?.thresholds();
    let link = classify_link(thresholds, readback);

    let mut report = DiagnosticReport {
        written: thresholds,
        readback,
        status: link,
        stage1: None,
        fault: None,
        conversion: None,
    };

    if !link.is_ok() {
        return Ok(report);
    }

    let result = fault_cycle(dev, delay, settings, timing, biased, &mut report);
    let off = dev.configure(&idle);
    result?;
    off?;
    Ok(report)
}

fn fault_cycle<F, D>(
    dev: &mut F,
    delay: &mut D,
    settings: &RtdSettings,
    timing: &Timing,
    biased: RtdConfig,
    report: &mut DiagnosticReport,
) -> Result<(), F::Error>
where
    F: RtdFrontEnd,
    D: DelayNs,
{
    dev.configure(&biased.with_fault_cycle(FaultCycle::ManualStage1))?;
    delay.delay_ms(timing.stage_settle_ms);
    report.stage1 = Some(dev.fault_status()?);

    // Input filter must settle before the comparison stage
    delay.delay_ms(timing.rc_settle_ms);

    dev.configure(&biased.with_fault_cycle(FaultCycle::ManualStage2))?;
    delay.delay_ms(timing.stage_settle_ms);
    let fault = dev.fault_status()?;
    report.fault = Some(fault);
    report.status = report.status.with_fault_status(fault);

    if !fault.is_empty() {
        return Ok(());
    }

    dev.configure(&RtdConfig {
        one_shot: true,
        ..biased
    })?;
    let wait = dev.wait_conversion(timing.conversion_timeout_ms)?;
    let snapshot = dev.read_snapshot()?;

    report.conversion = Some(ConversionReport {
        wait,
        fault: snapshot.fault_status(),
        sample: RtdSample::from_code(snapshot.rtd_code(), settings.rref_ohms, settings.kind),
    });
    Ok(())
}
