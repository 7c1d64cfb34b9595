//! UART serial console abstractions
//!
//! The meters print human-readable lines on a serial console. Board HALs
//! implement [`UartTx`]; [`LineWriter`] turns any transmitter into a
//! [`core::fmt::Write`] sink so reports can be formatted straight onto the
//! wire.

use core::fmt;

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// 8N1 at the given baud rate
    pub fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// [`core::fmt::Write`] adapter over a [`UartTx`]
///
/// Transmit errors are mapped to [`fmt::Error`]; the last one is kept so
/// the caller can log it after the write completes.
pub struct LineWriter<'a, T: UartTx> {
    tx: &'a mut T,
    error: Option<T::Error>,
}

impl<'a, T: UartTx> LineWriter<'a, T> {
    pub fn new(tx: &'a mut T) -> Self {
        Self { tx, error: None }
    }

    /// Flush the transmitter and return the first error seen, if any
    pub fn finish(mut self) -> Result<(), T::Error> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.tx.flush()
    }
}

impl<T: UartTx> fmt::Write for LineWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.error.is_some() {
            return Err(fmt::Error);
        }
        self.tx.write_blocking(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}
