pub mod cadence;
pub mod config;
pub mod sensor;
pub mod transport;

pub use cadence::Cadence;
pub use config::{LinkConfig, NodeConfig, UartConfig};
pub use sensor::{Diagnostic, LinkError, SensorLink};
pub use transport::{MockUart, SerialUart, SimulatedUart, Uart};
