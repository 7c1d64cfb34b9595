//! One-shot RTD meter task
//!
//! Prints code, ratio, resistance and temperature on the console every
//! cycle and shows the temperature, or the no-data text for a zero code.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;

use kelvin_core::config::MeterConfig;
use kelvin_core::report;
use kelvin_core::rtd::RtdSensor;
use kelvin_core::{NoDataReason, Reading};
use kelvin_drivers::led::Led;
use kelvin_drivers::rtd::Max31865;

use super::meter::{Meter, VERSION};
use super::ConsolePort;
use crate::console::Console;

/// MAX31865 on SPI0 with its own chip select
pub type RtdSpi = ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, Delay>;

/// Converter with the data-ready line
pub type RtdFront = Max31865<RtdSpi, Input<'static>, Delay>;

pub type Rtd = RtdSensor<RtdFront, Delay>;

#[embassy_executor::task]
pub async fn rtd_task(
    mut sensor: Rtd,
    mut console: Console<ConsolePort>,
    mut activity: Led<Output<'static>>,
    config: &'static MeterConfig,
) {
    info!("RTD meter task started");

    let mut meter = Meter::new(config);
    console.report(|w| report::write_banner(w, config.title(), VERSION));

    if let Err(e) = sensor.begin() {
        warn!("MAX31865 setup failed: {:?}", Debug2Format(&e));
    }

    meter.splash().await;
    meter.warm_up().await;

    loop {
        meter.next_cycle().await;

        activity.set(true);
        let reading = match sensor.sample() {
            Ok(sample) => {
                console.report(|w| report::write_rtd_sample(w, &sample));
                trace!("RTD code {} -> {:?}", sample.code, sample.temperature);
                sample.reading()
            }
            Err(e) => {
                warn!("MAX31865 read failed: {:?}", Debug2Format(&e));
                Reading::NoData(NoDataReason::Bus)
            }
        };
        activity.set(false);

        meter.show(&reading);
    }
}
