use std::io;
use std::time::Duration;

use serde::Deserialize;
use sonar_core::Channel;

use crate::sensor::SensorLink;
use crate::transport::{SerialUart, SimulatedUart, Uart};

fn default_read_timeout_ms() -> u64 {
    500
}

fn default_cycle_pause_ms() -> u64 {
    100
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_max_mm() -> u16 {
    6000
}

/// Pacing of a node's polling loop.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Pause after every loop iteration, giving the sensors time to settle
    #[serde(default = "default_cycle_pause_ms")]
    pub cycle_pause_ms: u64,
}

impl NodeConfig {
    pub fn cycle_pause(&self) -> Duration {
        Duration::from_millis(self.cycle_pause_ms)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            cycle_pause_ms: default_cycle_pause_ms(),
        }
    }
}

/// Timing shared by every sensor link of a node.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Longest wait for a complete frame after a poll command
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl LinkConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

/// Where one rangefinder is attached.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UartConfig {
    Serial {
        /// Serial device path, e.g. "/dev/ttyS2"
        path: String,
        #[serde(default = "default_baud_rate")]
        baud_rate: u32,
    },
    Simulated {
        #[serde(default)]
        min_mm: u16,
        #[serde(default = "default_max_mm")]
        max_mm: u16,
        /// Fraction of answers sent with a broken checksum
        #[serde(default)]
        corrupt_ratio: f64,
        /// Fraction of polls left unanswered
        #[serde(default)]
        dropout_ratio: f64,
    },
}

impl UartConfig {
    pub fn serial(path: &str) -> Self {
        UartConfig::Serial {
            path: path.to_owned(),
            baud_rate: default_baud_rate(),
        }
    }

    pub fn open(&self) -> io::Result<Box<dyn Uart>> {
        let uart: Box<dyn Uart> = match self {
            UartConfig::Serial { path, baud_rate } => Box::new(SerialUart::open(path, *baud_rate)?),
            UartConfig::Simulated {
                min_mm,
                max_mm,
                corrupt_ratio,
                dropout_ratio,
            } => Box::new(SimulatedUart::new(
                *min_mm,
                *max_mm,
                *corrupt_ratio,
                *dropout_ratio,
            )),
        };
        Ok(uart)
    }

    /// Open the UART and bind it to `channel`.
    pub fn open_link(&self, channel: Channel, link: &LinkConfig) -> io::Result<SensorLink> {
        Ok(SensorLink::new(channel, self.open()?, link.read_timeout()))
    }
}
