//! Kelvin - Temperature Meter Firmware
//!
//! Main firmware binary for RP2040-based temperature meters. One build
//! runs one meter, selected in meter.toml:
//!
//! - a MAX31865 RTD meter,
//! - a MAX31865 meter that checks the link and runs fault detection,
//! - an MLX90614 infrared thermometer.
//!
//! Readings go to the serial console and a 128x64 SH1106 OLED.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::spi::Spi;
use embassy_rp::uart::UartTx;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use kelvin_core::config::{MeterConfig, SensorKind};
use kelvin_core::rtd::RtdSensor;
use kelvin_drivers::display::{sh1106, Sh1106};
use kelvin_drivers::ir::{mlx90614, Mlx90614};
use kelvin_drivers::led::{Led, StatusLed};
use kelvin_drivers::rtd::{max31865, Max31865};
use kelvin_hal::UartConfig;

use crate::console::Console;

mod board;
mod channels;
mod config;
mod console;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// Configuration must live forever for task references
static METER_CONFIG: StaticCell<MeterConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Kelvin firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static MeterConfig = METER_CONFIG.init(config::load_config());

    // Serial console, transmit only
    let uart_config = board::uart_config(&UartConfig::with_baudrate(config.serial.baud));
    let console = Console::new(UartTx::new_blocking(p.UART0, p.PIN_0, uart_config));
    info!("UART initialized at {} baud", config.serial.baud);

    // OLED on I2C0
    let oled_i2c = I2c::new_async(
        p.I2C0,
        p.PIN_5,
        p.PIN_4,
        Irqs,
        board::i2c_config(&sh1106::I2C_CONFIG),
    );
    spawner
        .spawn(tasks::display_task(Sh1106::new(oled_i2c), config.display.contrast))
        .unwrap();

    // LEDs: onboard activity, green/red status pair
    let activity = Led::new_active_high(Output::new(p.PIN_25, Level::Low));
    let status = StatusLed::new(
        Led::new_active_high(Output::new(p.PIN_14, Level::Low)),
        Led::new_active_high(Output::new(p.PIN_15, Level::Low)),
    );
    spawner.spawn(tasks::led_task(status)).unwrap();

    match config.sensor {
        SensorKind::Rtd | SensorKind::RtdDiagnostic => {
            let spi = Spi::new_blocking(
                p.SPI0,
                p.PIN_18,
                p.PIN_19,
                p.PIN_16,
                board::spi_config(&max31865::SPI_CONFIG),
            );
            let cs = Output::new(p.PIN_17, Level::High);
            let spi_dev = ExclusiveDevice::new(spi, cs, Delay).unwrap();
            let drdy = config
                .rtd
                .data_ready
                .then(|| Input::new(p.PIN_20, Pull::Up));

            let front = Max31865::with_optional_data_ready(spi_dev, drdy, Delay);
            let sensor = RtdSensor::new(front, Delay, config.rtd, config.timing);
            info!("MAX31865 initialized on SPI0");

            if config.sensor == SensorKind::Rtd {
                spawner
                    .spawn(tasks::rtd_task(sensor, console, activity, config))
                    .unwrap();
            } else {
                spawner
                    .spawn(tasks::rtd_diagnostic_task(sensor, console, activity, config))
                    .unwrap();
            }
        }
        SensorKind::Infrared => {
            let i2c = I2c::new_blocking(
                p.I2C1,
                p.PIN_3,
                p.PIN_2,
                board::i2c_config(&mlx90614::I2C_CONFIG),
            );
            let sensor = Mlx90614::new(i2c, &config.ir);
            info!("MLX90614 initialized on I2C1");

            spawner
                .spawn(tasks::ir_task(sensor, console, activity, config))
                .unwrap();
        }
    }

    info!("All tasks spawned, firmware running");
}
