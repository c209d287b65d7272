pub mod config;
pub mod forwarder;
pub mod uplink;

pub use config::{Config, HubConfig, SensorsConfig};
pub use forwarder::Forwarder;
pub use uplink::{HttpUplink, PushAck, Uplink, UplinkError};
