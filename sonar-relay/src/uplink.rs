use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use sonar_core::PushPayload;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum UplinkError {
    #[error("uplink is disconnected")]
    Disconnected,

    #[error("hub unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("hub rejected push with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// The hub's answer to an accepted push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushAck {
    pub status: StatusCode,
    pub body: String,
}

/// Connection to the hub that readings are pushed over.
#[async_trait]
pub trait Uplink: Send {
    fn is_connected(&self) -> bool;

    /// Re-establish the connection. Succeeds only once the hub answers.
    async fn reconnect(&mut self) -> Result<(), UplinkError>;

    async fn push(&mut self, payload: &PushPayload) -> Result<PushAck, UplinkError>;
}

/// Pushes JSON to the hub's `/update` endpoint over HTTP.
///
/// "Connected" means the last exchange with the hub reached it. A request
/// that fails in transit marks the uplink down; the next
/// [`reconnect`](Uplink::reconnect) probes `/health` before pushes resume.
#[derive(Debug, Clone)]
pub struct HttpUplink {
    client: Client,
    base_url: String,
    connected: bool,
}

impl HttpUplink {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Ok(Self {
            client,
            base_url,
            connected: false,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl Uplink for HttpUplink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn reconnect(&mut self) -> Result<(), UplinkError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| {
                self.connected = false;
                UplinkError::Unreachable(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            self.connected = false;
            let body = response.text().await.unwrap_or_default();
            return Err(UplinkError::Rejected { status, body });
        }

        debug!(url = %self.base_url, "Hub reachable");
        self.connected = true;
        Ok(())
    }

    async fn push(&mut self, payload: &PushPayload) -> Result<PushAck, UplinkError> {
        if !self.connected {
            return Err(UplinkError::Disconnected);
        }

        let response = self
            .client
            .post(self.url("/update"))
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                self.connected = false;
                UplinkError::Unreachable(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            self.connected = false;
            UplinkError::Unreachable(e)
        })?;

        if status.is_success() {
            Ok(PushAck { status, body })
        } else {
            Err(UplinkError::Rejected { status, body })
        }
    }
}
