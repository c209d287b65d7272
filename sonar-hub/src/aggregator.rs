use std::time::Duration;

use sonar_edge::{Cadence, SensorLink};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::display::{DisplayError, DisplaySink};
use crate::store::AggregateStore;

/// The hub's polling loop: local sensors into the store, store onto the
/// display.
pub struct Aggregator {
    links: Vec<SensorLink>,
    store: AggregateStore,
    display: Box<dyn DisplaySink>,
    refresh: Cadence,
    cycle_pause: Duration,
}

impl Aggregator {
    /// Initializes the display; its failure is the only fatal startup error.
    pub fn new(
        links: Vec<SensorLink>,
        store: AggregateStore,
        mut display: Box<dyn DisplaySink>,
        refresh_interval: Duration,
        cycle_pause: Duration,
    ) -> Result<Self, DisplayError> {
        display.init()?;

        Ok(Self {
            links,
            store,
            display,
            refresh: Cadence::new(refresh_interval),
            cycle_pause,
        })
    }

    /// One loop iteration without the trailing pause.
    pub async fn tick(&mut self) {
        for link in &mut self.links {
            let distance = link.poll().await;
            self.store.record(link.channel(), distance).await;

            if let Some(diagnostic) = link.take_diagnostic() {
                self.display.diagnostic(&diagnostic);
            }
        }

        let snapshot = self.store.snapshot().await;
        debug!("{snapshot}");

        if self.refresh.fire(Instant::now()) {
            self.display.show(&snapshot);
        }
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            sensors = self.links.len(),
            cycle_pause_ms = self.cycle_pause.as_millis() as u64,
            refresh_interval_ms = self.refresh.period().as_millis() as u64,
            "Aggregator started"
        );

        loop {
            self.tick().await;

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Aggregator shutting down");
                    break;
                }
                _ = sleep(self.cycle_pause) => {}
            }
        }
    }
}
