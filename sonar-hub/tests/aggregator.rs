use std::sync::{Arc, Mutex};
use std::time::Duration;

use sonar_core::{Channel, Distance, RawFrame, Snapshot};
use sonar_edge::{Diagnostic, MockUart, SensorLink};
use sonar_hub::{AggregateStore, Aggregator, DisplayError, DisplaySink};

const REFRESH: Duration = Duration::from_millis(1000);
const PAUSE: Duration = Duration::from_millis(100);

#[derive(Clone, Default)]
struct RecordingDisplay {
    shown: Arc<Mutex<Vec<Snapshot>>>,
    diagnostics: Arc<Mutex<Vec<String>>>,
    fail_init: bool,
}

impl DisplaySink for RecordingDisplay {
    fn init(&mut self) -> Result<(), DisplayError> {
        if self.fail_init {
            return Err(DisplayError::InitFailed("no display at 0x3C".into()));
        }
        Ok(())
    }

    fn show(&mut self, snapshot: &Snapshot) {
        self.shown.lock().unwrap().push(*snapshot);
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic.to_string());
    }
}

fn links(left: &MockUart, right: &MockUart) -> Vec<SensorLink> {
    let timeout = Duration::from_millis(500);
    vec![
        SensorLink::new(Channel::Left, Box::new(left.clone()), timeout),
        SensorLink::new(Channel::Right, Box::new(right.clone()), timeout),
    ]
}

#[tokio::test(start_paused = true)]
async fn tick_records_local_channels() {
    let (left, right) = (MockUart::new(), MockUart::new());
    left.respond_with(&RawFrame::for_millimeters(1234).bytes());
    right.respond_with(&RawFrame::for_millimeters(456).bytes());

    let store = AggregateStore::new();
    let display = RecordingDisplay::default();
    let mut aggregator = Aggregator::new(
        links(&left, &right),
        store.clone(),
        Box::new(display.clone()),
        REFRESH,
        PAUSE,
    )
    .unwrap();

    aggregator.tick().await;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.get(Channel::Left), Distance::from_cm(123));
    assert_eq!(snapshot.get(Channel::Right), Distance::from_cm(45));
    assert_eq!(snapshot.get(Channel::Front), Distance::Unavailable);
    assert!(display.diagnostics.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_poll_overwrites_previous_value() {
    let (left, right) = (MockUart::new(), MockUart::new());
    left.respond_with(&RawFrame::for_millimeters(1000).bytes());
    left.respond_with(&[0xFF, 0x04, 0xD2, 0x07]);
    right.respond_with(&RawFrame::for_millimeters(1000).bytes());
    right.respond_with(&RawFrame::for_millimeters(2000).bytes());

    let store = AggregateStore::new();
    let display = RecordingDisplay::default();
    let mut aggregator = Aggregator::new(
        links(&left, &right),
        store.clone(),
        Box::new(display.clone()),
        REFRESH,
        PAUSE,
    )
    .unwrap();

    aggregator.tick().await;
    aggregator.tick().await;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.get(Channel::Left), Distance::Unavailable);
    assert_eq!(snapshot.get(Channel::Right), Distance::from_cm(200));

    let diagnostics = display.diagnostics.lock().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].starts_with("Left: checksum mismatch"));
}

#[tokio::test(start_paused = true)]
async fn local_polling_keeps_pushed_channels() {
    let (left, right) = (MockUart::new(), MockUart::new());
    let store = AggregateStore::new();
    store.record(Channel::Front, Distance::from_cm(42)).await;

    let mut aggregator = Aggregator::new(
        links(&left, &right),
        store.clone(),
        Box::new(RecordingDisplay::default()),
        REFRESH,
        PAUSE,
    )
    .unwrap();

    aggregator.tick().await;

    assert_eq!(store.snapshot().await.get(Channel::Front), Distance::from_cm(42));
}

#[tokio::test(start_paused = true)]
async fn display_refreshes_once_per_interval() {
    let (left, right) = (MockUart::new(), MockUart::new());
    for _ in 0..20 {
        left.respond_with(&RawFrame::for_millimeters(3000).bytes());
        right.respond_with(&RawFrame::for_millimeters(3000).bytes());
    }

    let display = RecordingDisplay::default();
    let mut aggregator = Aggregator::new(
        links(&left, &right),
        AggregateStore::new(),
        Box::new(display.clone()),
        REFRESH,
        PAUSE,
    )
    .unwrap();

    // 15 iterations 100 ms apart span 1.4 s: exactly one refresh
    for _ in 0..15 {
        aggregator.tick().await;
        tokio::time::sleep(PAUSE).await;
    }

    let shown = display.shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].get(Channel::Left), Distance::from_cm(300));
}

#[tokio::test]
async fn display_init_failure_is_fatal() {
    let (left, right) = (MockUart::new(), MockUart::new());
    let display = RecordingDisplay {
        fail_init: true,
        ..Default::default()
    };

    let result = Aggregator::new(
        links(&left, &right),
        AggregateStore::new(),
        Box::new(display),
        REFRESH,
        PAUSE,
    );

    assert!(matches!(result, Err(DisplayError::InitFailed(_))));
}
