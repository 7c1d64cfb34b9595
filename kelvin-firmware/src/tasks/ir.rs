//! Infrared thermometer task

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C1;

use kelvin_core::config::MeterConfig;
use kelvin_core::report;
use kelvin_core::traits::SensorError;
use kelvin_core::Reading;
use kelvin_drivers::ir::Mlx90614;
use kelvin_drivers::led::Led;

use super::meter::{Meter, VERSION};
use super::ConsolePort;
use crate::console::Console;

/// MLX90614 on I2C1
pub type IrSensor = Mlx90614<I2c<'static, I2C1, Blocking>>;

#[embassy_executor::task]
pub async fn ir_task(
    mut sensor: IrSensor,
    mut console: Console<ConsolePort>,
    mut activity: Led<Output<'static>>,
    config: &'static MeterConfig,
) {
    info!("IR meter task started");

    let mut meter = Meter::new(config);
    let no_data = config.sensor.no_data_text();
    console.report(|w| report::write_banner(w, config.title(), VERSION));

    meter.splash().await;
    meter.warm_up().await;

    loop {
        meter.next_cycle().await;

        activity.set(true);
        let result = sensor.sample();
        activity.set(false);

        let reading = match result {
            Ok(sample) => {
                console.report(|w| report::write_ir_sample(w, sensor.channel(), &sample, no_data));
                sample.reading()
            }
            Err(e) => {
                warn!("MLX90614 read failed: {:?}", Debug2Format(&e));
                console.report(|w| {
                    use core::fmt::Write;
                    write!(w, "{}\r\n", no_data)
                });
                Reading::NoData(SensorError::from(e).into())
            }
        };

        meter.show(&reading);
    }
}
