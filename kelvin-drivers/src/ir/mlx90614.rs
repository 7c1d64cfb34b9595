//! MLX90614 infrared thermometer (SMBus)
//!
//! # SMBus Protocol
//!
//! RAM words are read with a repeated-start read-word:
//! - Write: slave address (W), command = RAM address
//! - Read: slave address (R), LSB, MSB, PEC
//!
//! The PEC is a CRC-8 (polynomial 0x07) over every byte of the frame,
//! address bytes included.

use embedded_hal::i2c::I2c;
use kelvin_core::config::IrSettings;
use kelvin_core::ir::{IrChannel, IrSample};
use kelvin_core::traits::{SensorError, TemperatureSensor};
use kelvin_core::Temperature;
use kelvin_hal::i2c::I2cConfig;

/// SMBus caps the clock at 100 kHz
pub const I2C_CONFIG: I2cConfig = I2cConfig::STANDARD;

/// Calculate CRC8 for SMBus packet error checking
///
/// Polynomial: x^8 + x^2 + x + 1 (0x07), initial value 0
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// PEC of a read-word frame
pub fn read_word_pec(address: u8, command: u8, lsb: u8, msb: u8) -> u8 {
    crc8(&[address << 1, command, (address << 1) | 1, lsb, msb])
}

/// MLX90614 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C transfer failed
    I2c(E),
    /// Packet error code mismatch
    Pec { expected: u8, actual: u8 },
}

impl<E> From<Error<E>> for SensorError {
    fn from(e: Error<E>) -> Self {
        match e {
            Error::I2c(_) => SensorError::NoCommunication,
            Error::Pec { .. } => SensorError::ChecksumMismatch,
        }
    }
}

/// MLX90614 driver
pub struct Mlx90614<I2C> {
    i2c: I2C,
    address: u8,
    channel: IrChannel,
    max_valid_c: i16,
    verify_pec: bool,
}

impl<I2C: I2c> Mlx90614<I2C> {
    pub fn new(i2c: I2C, settings: &IrSettings) -> Self {
        Self {
            i2c,
            address: settings.address,
            channel: settings.channel,
            max_valid_c: settings.max_valid_c,
            verify_pec: settings.verify_pec,
        }
    }

    pub fn channel(&self) -> IrChannel {
        self.channel
    }

    /// Read a RAM word
    pub fn read_raw(&mut self, command: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 3];
        self.i2c
            .write_read(self.address, &[command], &mut buf)
            .map_err(Error::I2c)?;

        let [lsb, msb, pec] = buf;
        if self.verify_pec {
            let expected = read_word_pec(self.address, command, lsb, msb);
            if pec != expected {
                return Err(Error::Pec {
                    expected,
                    actual: pec,
                });
            }
        }
        Ok(u16::from_le_bytes([lsb, msb]))
    }

    /// Read any channel
    pub fn read_channel(&mut self, channel: IrChannel) -> Result<IrSample, Error<I2C::Error>> {
        let raw = self.read_raw(channel.register())?;
        Ok(IrSample::from_raw(raw, self.max_valid_c))
    }

    /// Read the configured channel
    pub fn sample(&mut self) -> Result<IrSample, Error<I2C::Error>> {
        self.read_channel(self.channel)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> TemperatureSensor for Mlx90614<I2C> {
    fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        let sample = self.sample()?;
        if sample.valid {
            Ok(sample.temperature)
        } else {
            Err(SensorError::OutOfRange)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::i2c::{ErrorType, Operation};

    /// Sensor answering every read-word with a fixed frame
    struct MockBus {
        response: [u8; 3],
        requests: Vec<(u8, u8)>,
    }

    impl MockBus {
        fn answering(lsb: u8, msb: u8, pec: u8) -> Self {
            Self {
                response: [lsb, msb, pec],
                requests: Vec::new(),
            }
        }
    }

    impl ErrorType for MockBus {
        type Error = Infallible;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Infallible> {
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => self.requests.push((address, bytes[0])),
                    Operation::Read(buf) => buf.copy_from_slice(&self.response[..buf.len()]),
                }
            }
            Ok(())
        }
    }

    fn settings(verify_pec: bool) -> IrSettings {
        IrSettings {
            verify_pec,
            ..Default::default()
        }
    }

    #[test]
    fn test_crc8_vectors() {
        assert_eq!(crc8(&[0x01, 0x02, 0x03]), 0x48);
        assert_eq!(read_word_pec(0x5A, 0x07, 0xF7, 0x3A), 0xDF);
        assert_eq!(read_word_pec(0x5A, 0x06, 0x40, 0x1F), 0x16);
    }

    #[test]
    fn test_reads_object_word_lsb_first() {
        let mut ir = Mlx90614::new(MockBus::answering(0xF7, 0x3A, 0xDF), &settings(true));
        let sample = ir.sample().unwrap();
        assert_eq!(sample.raw, 0x3AF7);
        assert_eq!(ir.read_temperature(), Ok(Temperature::from_centi(2875)));

        let bus = ir.release();
        assert_eq!(bus.requests[0], (0x5A, 0x07));
    }

    #[test]
    fn test_pec_mismatch_rejected() {
        let mut ir = Mlx90614::new(MockBus::answering(0xF7, 0x3A, 0x00), &settings(true));
        assert_eq!(
            ir.sample(),
            Err(Error::Pec {
                expected: 0xDF,
                actual: 0x00
            })
        );
        assert_eq!(ir.read_temperature(), Err(SensorError::ChecksumMismatch));
    }

    #[test]
    fn test_pec_ignored_when_disabled() {
        let mut ir = Mlx90614::new(MockBus::answering(0xF7, 0x3A, 0x00), &settings(false));
        assert!(ir.sample().is_ok());
    }

    #[test]
    fn test_floating_bus_is_out_of_range() {
        let mut ir = Mlx90614::new(MockBus::answering(0xFF, 0xFF, 0xFF), &settings(false));
        assert!(!ir.sample().unwrap().valid);
        assert_eq!(ir.read_temperature(), Err(SensorError::OutOfRange));
    }

    #[test]
    fn test_ambient_channel() {
        let mut ir = Mlx90614::new(MockBus::answering(0x40, 0x1F, 0x16), &settings(true));
        let sample = ir.read_channel(IrChannel::Ambient).unwrap();
        assert_eq!(sample.temperature.centi(), -11315);
        assert_eq!(ir.release().requests[0], (0x5A, 0x06));
    }
}
