use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use sonar_edge::{LinkConfig, NodeConfig, UartConfig};

fn default_refresh_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    pub sensors: SensorsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address for the HTTP server to listen on
    pub http_addr: SocketAddr,
}

#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    /// Interval in milliseconds between status refreshes
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

impl DisplayConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

/// The two rangefinders wired to this node.
#[derive(Debug, Deserialize)]
pub struct SensorsConfig {
    pub left: UartConfig,
    pub right: UartConfig,
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                http_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 80)),
            },
            node: NodeConfig::default(),
            link: LinkConfig::default(),
            display: DisplayConfig::default(),
            sensors: SensorsConfig {
                left: UartConfig::serial("/dev/ttyS2"),
                right: UartConfig::serial("/dev/ttyS1"),
            },
        }
    }
}
