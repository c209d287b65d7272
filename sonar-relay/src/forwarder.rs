use std::time::Duration;

use sonar_core::{Channel, PushPayload};
use sonar_edge::{Cadence, SensorLink};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::uplink::{Uplink, UplinkError};

/// The relay's polling loop: local sensors every cycle, their last readings
/// to the hub every push interval.
pub struct Forwarder<U> {
    links: Vec<SensorLink>,
    uplink: U,
    push: Cadence,
    cycle_pause: Duration,
}

impl<U: Uplink> Forwarder<U> {
    pub fn new(
        links: Vec<SensorLink>,
        uplink: U,
        push_interval: Duration,
        cycle_pause: Duration,
    ) -> Self {
        Self {
            links,
            uplink,
            push: Cadence::new(push_interval),
            cycle_pause,
        }
    }

    pub fn uplink(&self) -> &U {
        &self.uplink
    }

    /// Last known readings of the links that feed the push payload.
    pub fn payload(&self) -> PushPayload {
        let mut payload = PushPayload::default();

        for link in &self.links {
            let distance = Some(link.last());
            match link.channel() {
                Channel::Front => payload.front = distance,
                Channel::Back => payload.back = distance,
                _ => {}
            }
        }

        payload
    }

    /// Initial connection attempt; failure is logged and left to the loop.
    pub async fn connect(&mut self) {
        match self.uplink.reconnect().await {
            Ok(()) => info!("Connected to hub"),
            Err(e) => warn!(error = %e, "Hub not reachable yet, will retry"),
        }
    }

    /// One loop iteration without the trailing pause.
    pub async fn tick(&mut self) {
        for link in &mut self.links {
            link.poll().await;
        }

        if self.push.fire(Instant::now()) {
            self.transmit().await;
        }
    }

    /// Pushes the current readings, or reconnects if the uplink is down.
    pub async fn transmit(&mut self) {
        if !self.uplink.is_connected() {
            warn!("Uplink down, reconnecting");
            match self.uplink.reconnect().await {
                Ok(()) => info!("Reconnected to hub"),
                Err(e) => warn!(error = %e, "Reconnect failed"),
            }
            return;
        }

        let payload = self.payload();
        match self.uplink.push(&payload).await {
            Ok(ack) => {
                info!(status = %ack.status, response = %ack.body, ?payload, "Push sent");
            }
            Err(UplinkError::Rejected { status, body }) => {
                warn!(%status, response = %body, "Hub rejected push");
            }
            Err(e) => {
                warn!(error = %e, "Push failed");
            }
        }
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            sensors = self.links.len(),
            cycle_pause_ms = self.cycle_pause.as_millis() as u64,
            push_interval_ms = self.push.period().as_millis() as u64,
            "Forwarder started"
        );

        self.connect().await;

        loop {
            self.tick().await;
            debug!(payload = ?self.payload(), "Relay readings");

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Forwarder shutting down");
                    break;
                }
                _ = sleep(self.cycle_pause) => {}
            }
        }
    }
}
