use std::fmt;
use std::io;
use std::time::Duration;

use sonar_core::protocol::{FRAME_HEADER, FRAME_LEN, POLL_COMMAND};
use sonar_core::{Centimeters, Channel, Distance, FrameError, RawFrame};
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::transport::{Uart, read_exact};

/// How often a waiting poll re-checks the UART for a complete frame.
const AVAILABILITY_CHECK: Duration = Duration::from_millis(2);

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("UART I/O error: {0}")]
    Io(#[from] io::Error),
}

/// What went wrong on a failed poll, with the bytes seen on the wire.
#[derive(Debug)]
pub struct Diagnostic {
    pub channel: Channel,
    pub error: LinkError,
    /// Frame bytes consumed by the poll followed by whatever was flushed.
    pub raw: Vec<u8>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} | Raw Data: ", self.channel.label(), self.error)?;

        if self.raw.is_empty() {
            return f.write_str("No data");
        }

        for (i, byte) in self.raw.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// One rangefinder on its own UART.
///
/// Each [`poll`](SensorLink::poll) sends a single command byte and decodes
/// the 4-byte answer. Failures never escape: they turn the reading into
/// [`Distance::Unavailable`] for this cycle, flush the UART so leftovers
/// can't shift the next frame, and leave a [`Diagnostic`] behind.
pub struct SensorLink {
    channel: Channel,
    uart: Box<dyn Uart>,
    read_timeout: Duration,
    frame: [u8; FRAME_LEN],
    consumed: usize,
    last: Distance,
    diagnostic: Option<Diagnostic>,
}

impl SensorLink {
    pub fn new(channel: Channel, uart: Box<dyn Uart>, read_timeout: Duration) -> Self {
        Self {
            channel,
            uart,
            read_timeout,
            frame: [0; FRAME_LEN],
            consumed: 0,
            last: Distance::Unavailable,
            diagnostic: None,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Result of the most recent poll.
    pub fn last(&self) -> Distance {
        self.last
    }

    /// Take the diagnostic left by the most recent failed poll, if any.
    pub fn take_diagnostic(&mut self) -> Option<Diagnostic> {
        self.diagnostic.take()
    }

    pub async fn poll(&mut self) -> Distance {
        self.consumed = 0;

        let distance = match self.read_frame().await {
            Ok(cm) => {
                self.diagnostic = None;
                debug!(channel = %self.channel, cm = cm.get(), "Sensor reading");
                Distance::Measured(cm)
            }
            Err(error) => {
                let diagnostic = self.flush(error);
                warn!(channel = %self.channel, "{diagnostic}");
                self.diagnostic = Some(diagnostic);
                Distance::Unavailable
            }
        };

        self.last = distance;
        distance
    }

    async fn read_frame(&mut self) -> Result<Centimeters, LinkError> {
        self.uart.write(&[POLL_COMMAND])?;

        let deadline = Instant::now() + self.read_timeout;
        loop {
            let available = self.uart.available()?;
            if available >= FRAME_LEN {
                break;
            }
            if Instant::now() >= deadline {
                return Err(FrameError::Timeout {
                    received: available,
                }
                .into());
            }
            sleep(AVAILABILITY_CHECK).await;
        }

        read_exact(self.uart.as_mut(), &mut self.frame[..1])?;
        self.consumed = 1;

        if self.frame[0] != FRAME_HEADER {
            return Err(FrameError::BadHeader(self.frame[0]).into());
        }

        read_exact(self.uart.as_mut(), &mut self.frame[1..])?;
        self.consumed = FRAME_LEN;

        Ok(RawFrame::from_bytes(self.frame).decode()?)
    }

    fn flush(&mut self, error: LinkError) -> Diagnostic {
        let mut raw = self.frame[..self.consumed].to_vec();

        match self.uart.drain() {
            Ok(rest) => raw.extend(rest),
            Err(e) => warn!(channel = %self.channel, error = %e, "Failed to flush UART"),
        }

        Diagnostic {
            channel: self.channel,
            error,
            raw,
        }
    }
}

impl fmt::Debug for SensorLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorLink")
            .field("channel", &self.channel)
            .field("read_timeout", &self.read_timeout)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}
