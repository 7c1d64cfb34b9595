//! MAX31865 RTD-to-digital converter (SPI)
//!
//! # SPI Protocol
//!
//! Mode 1 (CPOL 0, CPHA 1), up to 5 MHz:
//! - Read: address byte (bit 7 clear), then data bytes clocked out
//! - Write: address byte | 0x80, then data bytes
//! - Consecutive registers auto-increment within one chip-select frame
//!
//! # Data Ready
//!
//! The optional DRDY output goes low when a conversion result is
//! available. Without it a conversion wait is a fixed delay.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin};
use embedded_hal::spi::{Operation, SpiDevice};
use kelvin_core::rtd::registers::reg;
use kelvin_core::rtd::{FaultFlags, RegisterSnapshot, RtdConfig, ThresholdPair};
use kelvin_core::traits::{ConversionWait, RtdFrontEnd, SensorError};
use kelvin_hal::spi::{Mode, SpiConfig};

/// Bus settings the converter needs
pub const SPI_CONFIG: SpiConfig = SpiConfig {
    frequency: 4_000_000,
    mode: Mode::Mode1,
};

/// DRDY poll period while waiting for a conversion
const DRDY_POLL_MS: u32 = 1;

/// MAX31865 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// SPI transfer failed
    Spi(E),
    /// DRDY pin could not be read
    DataReady,
}

impl<E> From<Error<E>> for SensorError {
    fn from(_: Error<E>) -> Self {
        SensorError::NoCommunication
    }
}

/// Placeholder for boards without a DRDY line
pub struct NoDataReady;

impl digital::ErrorType for NoDataReady {
    type Error = Infallible;
}

impl InputPin for NoDataReady {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(false)
    }
}

/// MAX31865 driver
pub struct Max31865<SPI, DRDY, D> {
    spi: SPI,
    drdy: Option<DRDY>,
    delay: D,
}

impl<SPI, D> Max31865<SPI, NoDataReady, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    /// Driver without a DRDY line
    pub fn new(spi: SPI, delay: D) -> Self {
        Self {
            spi,
            drdy: None,
            delay,
        }
    }
}

impl<SPI, DRDY, D> Max31865<SPI, DRDY, D>
where
    SPI: SpiDevice,
    DRDY: InputPin,
    D: DelayNs,
{
    /// Driver that polls DRDY for conversion completion
    pub fn with_data_ready(spi: SPI, drdy: DRDY, delay: D) -> Self {
        Self::with_optional_data_ready(spi, Some(drdy), delay)
    }

    /// Driver whose DRDY line is fitted per board; `None` waits the
    /// fixed conversion time
    pub fn with_optional_data_ready(spi: SPI, drdy: Option<DRDY>, delay: D) -> Self {
        Self { spi, drdy, delay }
    }

    /// Release the bus, pin and delay
    pub fn release(self) -> (SPI, Option<DRDY>, D) {
        (self.spi, self.drdy, self.delay)
    }

    fn read_registers(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), Error<SPI::Error>> {
        self.spi
            .transaction(&mut [Operation::Write(&[addr & !reg::WRITE]), Operation::Read(buf)])
            .map_err(Error::Spi)
    }

    fn write_registers<const N: usize>(
        &mut self,
        addr: u8,
        data: [u8; N],
    ) -> Result<(), Error<SPI::Error>> {
        self.spi
            .transaction(&mut [Operation::Write(&[addr | reg::WRITE]), Operation::Write(&data)])
            .map_err(Error::Spi)
    }

    fn data_ready(&mut self) -> Result<Option<bool>, Error<SPI::Error>> {
        match self.drdy.as_mut() {
            Some(pin) => pin.is_low().map(Some).map_err(|_| Error::DataReady),
            None => Ok(None),
        }
    }
}

impl<SPI, DRDY, D> RtdFrontEnd for Max31865<SPI, DRDY, D>
where
    SPI: SpiDevice,
    DRDY: InputPin,
    D: DelayNs,
{
    type Error = Error<SPI::Error>;

    fn configure(&mut self, config: &RtdConfig) -> Result<(), Self::Error> {
        self.write_registers(reg::CONFIG, [config.to_register()])
    }

    fn write_thresholds(&mut self, thresholds: ThresholdPair) -> Result<(), Self::Error> {
        let [high_msb, high_lsb] = thresholds.high.to_be_bytes();
        let [low_msb, low_lsb] = thresholds.low.to_be_bytes();
        self.write_registers(reg::HIGH_FAULT_MSB, [high_msb, high_lsb, low_msb, low_lsb])
    }

    fn read_snapshot(&mut self) -> Result<RegisterSnapshot, Self::Error> {
        let mut regs = [0u8; reg::COUNT];
        self.read_registers(reg::CONFIG, &mut regs)?;
        Ok(RegisterSnapshot::new(regs))
    }

    fn read_rtd(&mut self) -> Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.read_registers(reg::RTD_MSB, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn fault_status(&mut self) -> Result<FaultFlags, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_registers(reg::FAULT_STATUS, &mut buf)?;
        Ok(FaultFlags::from_bits(buf[0]))
    }

    fn wait_conversion(&mut self, timeout_ms: u32) -> Result<ConversionWait, Self::Error> {
        let mut elapsed_ms = 0;
        loop {
            match self.data_ready()? {
                None => {
                    self.delay.delay_ms(timeout_ms);
                    return Ok(ConversionWait::Fixed {
                        elapsed_ms: timeout_ms,
                    });
                }
                Some(true) => return Ok(ConversionWait::Ready { elapsed_ms }),
                Some(false) if elapsed_ms >= timeout_ms => {
                    return Ok(ConversionWait::TimedOut { elapsed_ms })
                }
                Some(false) => {
                    self.delay.delay_ms(DRDY_POLL_MS);
                    elapsed_ms += DRDY_POLL_MS;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelvin_core::config::{RtdSettings, Timing};
    use kelvin_core::rtd::{DeviceStatus, RtdKind, RtdSensor, Wiring};
    use kelvin_core::traits::TemperatureSensor;
    use kelvin_core::Temperature;

    /// Register-file simulation of the converter behind an SPI device
    struct SimulatedChip {
        regs: [u8; reg::COUNT],
        /// RTD word latched on a one-shot
        rtd_word: u16,
        /// Unplugged: MISO floats high
        unplugged: bool,
        frames: Vec<Vec<u8>>,
    }

    impl SimulatedChip {
        fn new(rtd_word: u16) -> Self {
            Self {
                regs: [0; reg::COUNT],
                rtd_word,
                unplugged: false,
                frames: Vec::new(),
            }
        }

        fn write(&mut self, addr: u8, data: &[u8]) {
            for (i, &byte) in data.iter().enumerate() {
                let r = (addr as usize + i) % reg::COUNT;
                if r == reg::CONFIG as usize {
                    if byte & 0x20 != 0 {
                        let [msb, lsb] = self.rtd_word.to_be_bytes();
                        self.regs[1] = msb;
                        self.regs[2] = lsb;
                    }
                    if byte & 0x02 != 0 {
                        self.regs[7] = 0;
                    }
                    self.regs[0] = byte & !0x22;
                } else if (3..=6).contains(&r) {
                    self.regs[r] = byte;
                }
            }
        }
    }

    impl embedded_hal::spi::ErrorType for SimulatedChip {
        type Error = Infallible;
    }

    impl SpiDevice for SimulatedChip {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            let mut frame = Vec::new();
            let mut addr = None;
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        let bytes: &[u8] = bytes;
                        frame.extend_from_slice(bytes);
                        match addr {
                            None => addr = Some(bytes[0]),
                            Some(a) if a & 0x80 != 0 => self.write(a & 0x7F, bytes),
                            Some(_) => {}
                        }
                    }
                    Operation::Read(buf) => {
                        let start = addr.unwrap_or(0) as usize;
                        for (i, b) in buf.iter_mut().enumerate() {
                            *b = if self.unplugged {
                                0xFF
                            } else {
                                self.regs[(start + i) % reg::COUNT]
                            };
                        }
                    }
                    _ => {}
                }
            }
            self.frames.push(frame);
            Ok(())
        }
    }

    /// DRDY that goes low after a number of polls
    struct Drdy {
        high_polls: u32,
    }

    impl digital::ErrorType for Drdy {
        type Error = Infallible;
    }

    impl InputPin for Drdy {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            if self.high_polls == 0 {
                return Ok(true);
            }
            self.high_polls -= 1;
            Ok(false)
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    #[test]
    fn test_spi_config_is_mode1() {
        assert_eq!(SPI_CONFIG.mode, Mode::Mode1);
        assert!(SPI_CONFIG.frequency <= 5_000_000);
    }

    #[test]
    fn test_write_uses_write_bit() {
        let mut dev = Max31865::new(SimulatedChip::new(0), CountingDelay::default());
        dev.configure(&RtdConfig::from_register(0x93)).unwrap();
        dev.write_thresholds(ThresholdPair::new(0x2690, 0x9304))
            .unwrap();

        let (chip, _, _) = dev.release();
        assert_eq!(chip.frames[0], [0x80, 0x93]);
        assert_eq!(chip.frames[1], [0x83, 0x93, 0x04, 0x26, 0x90]);
        assert_eq!(chip.regs[0], 0x91);
    }

    #[test]
    fn test_snapshot_is_one_burst() {
        let mut dev = Max31865::new(SimulatedChip::new(0), CountingDelay::default());
        dev.write_thresholds(ThresholdPair::new(0x2690, 0x9304))
            .unwrap();
        let snap = dev.read_snapshot().unwrap();
        assert_eq!(snap.thresholds(), ThresholdPair::new(0x2690, 0x9304));

        let (chip, _, _) = dev.release();
        assert_eq!(chip.frames.last().unwrap(), &[0x00]);
    }

    #[test]
    fn test_wait_without_drdy_is_fixed() {
        let mut dev = Max31865::new(SimulatedChip::new(0), CountingDelay::default());
        let wait = dev.wait_conversion(70).unwrap();
        assert_eq!(wait, ConversionWait::Fixed { elapsed_ms: 70 });
        let (_, _, delay) = dev.release();
        assert_eq!(delay.total_ms, 70);
    }

    #[test]
    fn test_wait_polls_drdy() {
        let mut dev = Max31865::with_data_ready(
            SimulatedChip::new(0),
            Drdy { high_polls: 63 },
            CountingDelay::default(),
        );
        assert_eq!(
            dev.wait_conversion(70).unwrap(),
            ConversionWait::Ready { elapsed_ms: 63 }
        );
    }

    #[test]
    fn test_unfitted_drdy_is_fixed_wait() {
        // A pin that never goes low must not be polled when not fitted
        let mut dev = Max31865::with_optional_data_ready(
            SimulatedChip::new(0),
            None::<Drdy>,
            CountingDelay::default(),
        );
        assert_eq!(
            dev.wait_conversion(70).unwrap(),
            ConversionWait::Fixed { elapsed_ms: 70 }
        );

        let mut fitted = Max31865::with_optional_data_ready(
            SimulatedChip::new(0),
            Some(Drdy { high_polls: 10 }),
            CountingDelay::default(),
        );
        assert_eq!(
            fitted.wait_conversion(70).unwrap(),
            ConversionWait::Ready { elapsed_ms: 10 }
        );
    }

    #[test]
    fn test_wait_times_out() {
        let mut dev = Max31865::with_data_ready(
            SimulatedChip::new(0),
            Drdy { high_polls: 500 },
            CountingDelay::default(),
        );
        assert_eq!(
            dev.wait_conversion(70).unwrap(),
            ConversionWait::TimedOut { elapsed_ms: 70 }
        );
    }

    fn sensor(chip: SimulatedChip) -> RtdSensor<Max31865<SimulatedChip, NoDataReady, CountingDelay>, CountingDelay> {
        let settings = RtdSettings {
            kind: RtdKind::Pt100,
            rref_ohms: 430,
            wiring: Wiring::Three,
            ..Default::default()
        };
        RtdSensor::new(
            Max31865::new(chip, CountingDelay::default()),
            CountingDelay::default(),
            settings,
            Timing::default(),
        )
    }

    #[test]
    fn test_one_shot_through_spi() {
        let mut rtd = sensor(SimulatedChip::new(8192 << 1));
        rtd.begin().unwrap();
        assert_eq!(
            rtd.read_temperature(),
            Ok(Temperature::from_centi(1924))
        );

        let (dev, delay) = rtd.release();
        assert_eq!(delay.total_ms, 75);
        let (chip, _, _) = dev.release();
        // begin: idle + clear, open thresholds
        assert_eq!(chip.frames[0], [0x80, 0x13]);
        assert_eq!(chip.frames[1], [0x83, 0xFF, 0xFF, 0x00, 0x00]);
        // bias off last
        assert_eq!(chip.frames.last().unwrap(), &[0x80, 0x11]);
    }

    #[test]
    fn test_zero_rtd_is_no_data() {
        let mut rtd = sensor(SimulatedChip::new(0));
        assert_eq!(rtd.read_temperature(), Err(SensorError::NoData));
    }

    #[test]
    fn test_diagnostic_through_spi() {
        let mut rtd = sensor(SimulatedChip::new(8192 << 1));
        let report = rtd.diagnose(ThresholdPair::new(0x2690, 0x9304)).unwrap();
        assert_eq!(report.status, DeviceStatus::Ok);
        assert_eq!(
            report.conversion.map(|c| c.wait),
            Some(ConversionWait::Fixed { elapsed_ms: 70 })
        );
        assert_eq!(report.reading().temperature(), Some(Temperature::from_centi(1924)));
    }

    #[test]
    fn test_unplugged_is_not_found() {
        let mut chip = SimulatedChip::new(0);
        chip.unplugged = true;
        let mut rtd = sensor(chip);
        let report = rtd.diagnose(ThresholdPair::new(0x2690, 0x9304)).unwrap();
        assert_eq!(report.status, DeviceStatus::NotFound);
    }
}
