use std::sync::Arc;

use sonar_core::{Channel, Distance, PushPayload, Snapshot};
use tokio::sync::Mutex;

/// Latest distance of every channel, shared between the polling loop and
/// the HTTP handlers.
///
/// Every operation holds the lock for one short critical section, so a
/// push is applied as a whole and a snapshot never mixes two pushes.
#[derive(Clone, Default)]
pub struct AggregateStore {
    inner: Arc<Mutex<Snapshot>>,
}

impl AggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite one channel with a freshly polled value.
    pub async fn record(&self, channel: Channel, distance: Distance) {
        let mut slots = self.inner.lock().await;
        slots.set(channel, distance);
    }

    /// Overwrite the channels carried by `payload`, leaving the rest.
    /// Returns how many slots were written.
    pub async fn apply_push(&self, payload: &PushPayload) -> usize {
        let mut slots = self.inner.lock().await;

        let mut written = 0;
        for (channel, distance) in payload.fields() {
            slots.set(channel, distance);
            written += 1;
        }
        written
    }

    pub async fn snapshot(&self) -> Snapshot {
        *self.inner.lock().await
    }
}
