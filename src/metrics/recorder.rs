//! In-memory recording sink for tests.

use super::{MetricEvent, MetricKind, MetricsSink, TagSet};
use std::sync::{Arc, Mutex};

/// Sink that captures every emission in memory.
///
/// Tests clone the sink into the code under test, then inspect or drain the
/// captured events.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<MetricEvent>>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every captured event.
    #[must_use]
    pub fn events(&self) -> Vec<MetricEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns captured events with the given metric name.
    #[must_use]
    pub fn events_named(&self, name: &str) -> Vec<MetricEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.name == name)
            .collect()
    }

    /// Returns the number of captured events with the given metric name.
    #[must_use]
    pub fn count_named(&self, name: &str) -> usize {
        self.events_named(name).len()
    }

    /// Removes and returns every captured event.
    #[must_use]
    pub fn drain(&self) -> Vec<MetricEvent> {
        self.events
            .lock()
            .map(|mut events| events.drain(..).collect())
            .unwrap_or_default()
    }

    fn record(&self, name: &str, kind: MetricKind, value: f64, tags: TagSet) {
        if let Ok(mut events) = self.events.lock() {
            events.push(MetricEvent {
                name: name.to_owned(),
                kind,
                value,
                tags,
            });
        }
    }
}

impl MetricsSink for RecordingSink {
    fn increment(&self, name: &str, delta: u64, tags: TagSet) {
        // u64 -> f64 is lossless for any delta this application emits.
        self.record(name, MetricKind::Counter, delta as f64, tags);
    }

    fn gauge(&self, name: &str, value: f64, tags: TagSet) {
        self.record(name, MetricKind::Gauge, value, tags);
    }

    fn histogram(&self, name: &str, value: f64, tags: TagSet) {
        self.record(name, MetricKind::Histogram, value, tags);
    }
}
