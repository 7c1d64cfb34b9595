//! Serial console on the board UART

use core::fmt;

use defmt::warn;
use embedded_io::Write as IoWrite;

use kelvin_hal::{LineWriter, UartTx};

/// Console over any blocking `embedded-io` writer
pub struct Console<W> {
    port: W,
}

impl<W: IoWrite> Console<W> {
    pub fn new(port: W) -> Self {
        Self { port }
    }

    /// Format one report onto the port
    ///
    /// A failed write is logged and dropped; the meter keeps running.
    pub fn report<F>(&mut self, body: F)
    where
        F: FnOnce(&mut LineWriter<'_, Self>) -> fmt::Result,
    {
        let mut w = LineWriter::new(self);
        let formatted = body(&mut w);
        if w.finish().is_err() || formatted.is_err() {
            warn!("serial report dropped");
        }
    }
}

impl<W: IoWrite> UartTx for Console<W> {
    type Error = W::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.port.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.port.flush()
    }
}
