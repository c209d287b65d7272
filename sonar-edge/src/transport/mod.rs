//! Byte-level UART backends a sensor link can drive.

mod mock;
mod serial;
mod simulated;

pub use mock::MockUart;
pub use serial::SerialUart;
pub use simulated::SimulatedUart;

use std::io;

/// A duplex byte channel to one rangefinder.
///
/// Every method must return promptly: callers pace themselves on
/// [`Uart::available`] and only read bytes that are already buffered.
pub trait Uart: Send {
    /// Write data, returns number of bytes written.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Number of received bytes waiting to be read.
    fn available(&mut self) -> io::Result<usize>;

    /// Read buffered data into `buffer`, returns number of bytes read.
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize>;

    /// Discard everything currently buffered, returning what was dropped.
    fn drain(&mut self) -> io::Result<Vec<u8>> {
        let mut drained = vec![0u8; self.available()?];
        let n = self.read(&mut drained)?;
        drained.truncate(n);
        Ok(drained)
    }
}

/// Fill `buf` from bytes the UART already reported as available.
pub(crate) fn read_exact(uart: &mut dyn Uart, mut buf: &mut [u8]) -> io::Result<()> {
    while !buf.is_empty() {
        let n = uart.read(buf)?;

        if n == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }

        buf = &mut buf[n..];
    }
    Ok(())
}
