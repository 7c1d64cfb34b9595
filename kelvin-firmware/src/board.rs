//! RP2040 board wiring
//!
//! Pin assignments and the translation of the chip-agnostic bus settings
//! the drivers publish into embassy-rp configurations.
//!
//! | Function            | Pins                                  |
//! |---------------------|---------------------------------------|
//! | Serial console      | UART0 TX GPIO0                        |
//! | MLX90614            | I2C1 SDA GPIO2, SCL GPIO3             |
//! | SH1106 OLED         | I2C0 SDA GPIO4, SCL GPIO5             |
//! | Status LED green    | GPIO14                                |
//! | Status LED red      | GPIO15                                |
//! | MAX31865            | SPI0 MISO GPIO16, CS GPIO17, SCK GPIO18, MOSI GPIO19 |
//! | MAX31865 DRDY       | GPIO20, when `[rtd] data_ready` is set |
//! | Onboard LED         | GPIO25                                |

use embassy_rp::{i2c, spi, uart};

use kelvin_hal::spi::{Phase, Polarity};
use kelvin_hal::uart::{DataBits, Parity, StopBits};
use kelvin_hal::{I2cConfig, SpiConfig, UartConfig};

pub fn spi_config(cfg: &SpiConfig) -> spi::Config {
    let mut config = spi::Config::default();
    config.frequency = cfg.frequency;
    config.polarity = match cfg.polarity() {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    config.phase = match cfg.phase() {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    config
}

pub fn i2c_config(cfg: &I2cConfig) -> i2c::Config {
    let mut config = i2c::Config::default();
    config.frequency = cfg.frequency;
    config
}

pub fn uart_config(cfg: &UartConfig) -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = cfg.baudrate;
    config.data_bits = match cfg.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    config.parity = match cfg.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    config.stop_bits = match cfg.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    config
}
