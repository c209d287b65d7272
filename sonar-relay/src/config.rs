use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use sonar_edge::{LinkConfig, NodeConfig, UartConfig};

fn default_push_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    2000
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub hub: HubConfig,
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub link: LinkConfig,
    pub sensors: SensorsConfig,
}

#[derive(Debug, Deserialize)]
pub struct HubConfig {
    /// Base URL of the hub's HTTP server
    pub url: String,
    /// Interval in milliseconds between pushes
    #[serde(default = "default_push_interval_ms")]
    pub push_interval_ms: u64,
    /// Upper bound in milliseconds for one request to the hub
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl HubConfig {
    pub fn push_interval(&self) -> Duration {
        Duration::from_millis(self.push_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// The two rangefinders wired to this node.
#[derive(Debug, Deserialize)]
pub struct SensorsConfig {
    pub front: UartConfig,
    pub back: UartConfig,
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
            hub: HubConfig {
                url: "http://192.168.40.1".to_string(),
                push_interval_ms: default_push_interval_ms(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            node: NodeConfig::default(),
            link: LinkConfig::default(),
            sensors: SensorsConfig {
                front: UartConfig::serial("/dev/ttyS2"),
                back: UartConfig::serial("/dev/ttyS1"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_file() {
        let config: Config = toml::from_str(
            r#"
            [hub]
            url = "http://10.0.0.1:8080"

            [sensors.front]
            type = "simulated"

            [sensors.back]
            type = "serial"
            path = "/dev/ttyUSB1"
            "#,
        )
        .unwrap();

        assert_eq!(config.hub.url, "http://10.0.0.1:8080");
        assert_eq!(config.hub.push_interval(), Duration::from_millis(1000));
        assert_eq!(config.hub.request_timeout(), Duration::from_millis(2000));
        assert_eq!(config.node.cycle_pause(), Duration::from_millis(100));
    }
}
