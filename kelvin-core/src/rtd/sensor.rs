//! RTD probe bound to its converter

use embedded_hal::delay::DelayNs;

use super::{begin, read_one_shot, run_diagnostic, DiagnosticReport, RtdSample, ThresholdPair};
use crate::config::{RtdSettings, Timing};
use crate::temperature::Temperature;
use crate::traits::{RtdFrontEnd, SensorError, TemperatureSensor};

/// A converter, a delay source and the probe settings
///
/// Owns both so a measurement cycle can borrow them independently.
pub struct RtdSensor<F, D> {
    dev: F,
    delay: D,
    settings: RtdSettings,
    timing: Timing,
}

impl<F: RtdFrontEnd, D: DelayNs> RtdSensor<F, D> {
    pub fn new(dev: F, delay: D, settings: RtdSettings, timing: Timing) -> Self {
        Self {
            dev,
            delay,
            settings,
            timing,
        }
    }

    pub fn settings(&self) -> &RtdSettings {
        &self.settings
    }

    /// Idle the converter with thresholds that never trip
    pub fn begin(&mut self) -> Result<(), F::Error> {
        begin(&mut self.dev, self.settings.wiring, self.settings.filter)
    }

    /// One biased one-shot conversion
    pub fn sample(&mut self) -> Result<RtdSample, F::Error> {
        read_one_shot(&mut self.dev, &mut self.delay, &self.settings, &self.timing)
    }

    /// Link check, fault detection and conversion
    pub fn diagnose(&mut self, thresholds: ThresholdPair) -> Result<DiagnosticReport, F::Error> {
        run_diagnostic(
            &mut self.dev,
            &mut self.delay,
            &self.settings,
            thresholds,
            &self.timing,
        )
    }

    pub fn release(self) -> (F, D) {
        (self.dev, self.delay)
    }
}

impl<F: RtdFrontEnd, D: DelayNs> TemperatureSensor for RtdSensor<F, D> {
    fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        let sample = self.sample().map_err(|_| SensorError::NoCommunication)?;
        Ok(sample.temperature?)
    }
}
