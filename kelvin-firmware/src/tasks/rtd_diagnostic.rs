//! RTD fault-diagnostic task
//!
//! Every cycle checks the SPI link through the threshold registers, runs
//! the two manual fault-detection stages and, if the device is clean,
//! one conversion. The full transcript goes to the console; the status
//! LEDs blink green for a healthy cycle and red otherwise.

use defmt::*;
use embassy_rp::gpio::Output;

use kelvin_core::config::MeterConfig;
use kelvin_core::report;
use kelvin_core::rtd::{DiagnosticReport, ThresholdPair};
use kelvin_drivers::led::Led;

use super::meter::{uptime_s, Meter, VERSION};
use super::rtd::Rtd;
use super::ConsolePort;
use crate::channels::LedState;
use crate::console::Console;

#[embassy_executor::task]
pub async fn rtd_diagnostic_task(
    mut sensor: Rtd,
    mut console: Console<ConsolePort>,
    mut activity: Led<Output<'static>>,
    config: &'static MeterConfig,
) {
    info!("RTD diagnostic task started");

    let rtd = &config.rtd;
    // validated at load time; the raw registers are the fallback
    let thresholds = rtd
        .thresholds()
        .unwrap_or(ThresholdPair::new(rtd.low_threshold, rtd.high_threshold));
    debug!("Fault thresholds {:#x}..{:#x}", thresholds.low, thresholds.high);

    let mut meter = Meter::new(config);
    console.report(|w| report::write_banner(w, config.title(), VERSION));

    if let Err(e) = sensor.begin() {
        warn!("MAX31865 setup failed: {:?}", Debug2Format(&e));
    }

    meter.splash().await;
    meter.warm_up().await;

    loop {
        meter.next_cycle().await;
        let uptime = uptime_s();

        activity.set(true);
        let diagnostic = match sensor.diagnose(thresholds) {
            Ok(diagnostic) => diagnostic,
            Err(e) => {
                warn!("MAX31865 bus error: {:?}", Debug2Format(&e));
                DiagnosticReport::no_communication(thresholds)
            }
        };
        activity.set(false);

        console.report(|w| report::write_diagnostic(w, uptime, &diagnostic));
        debug!("Diagnostic status {:?}", diagnostic.status);

        if diagnostic.is_healthy() {
            LedState::Healthy.store();
        } else {
            LedState::Unhealthy.store();
        }
        meter.show(&diagnostic.reading());
    }
}
