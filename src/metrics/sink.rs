//! The metrics sink port.

use serde::Serialize;

/// The kind of a metric emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Monotonic counter.
    Counter,
    /// Latest-value gauge.
    Gauge,
    /// Distribution sample.
    Histogram,
}

/// Unordered string-key/string-value annotations attached to one emission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagSet(Vec<(String, String)>);

impl TagSet {
    /// Creates an empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a tag, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// Returns `true` when no tags are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the value of the named tag, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }
}

/// An ephemeral metric emission record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEvent {
    /// Metric name, dot-separated.
    pub name: String,
    /// Counter, gauge, or histogram.
    pub kind: MetricKind,
    /// Emitted value.
    pub value: f64,
    /// Tags attached by the caller.
    pub tags: TagSet,
}

/// A capability that accepts metric emissions and forwards them to a
/// monitoring backend, best-effort.
///
/// All three operations are non-blocking from the caller's perspective and
/// return nothing; implementations swallow transport errors internally.
pub trait MetricsSink: Send + Sync {
    /// Adds `delta` to the monotonic counter identified by `name` + `tags`.
    fn increment(&self, name: &str, delta: u64, tags: TagSet);

    /// Sets the latest value of the named gauge.
    fn gauge(&self, name: &str, value: f64, tags: TagSet);

    /// Records a sample into the named distribution.
    fn histogram(&self, name: &str, value: f64, tags: TagSet);
}

/// Sink used when metrics are disabled; drops every emission.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn increment(&self, _name: &str, _delta: u64, _tags: TagSet) {}

    fn gauge(&self, _name: &str, _value: f64, _tags: TagSet) {}

    fn histogram(&self, _name: &str, _value: f64, _tags: TagSet) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_set_preserves_pairs_and_lookup() {
        let tags = TagSet::new()
            .with("priority", "high")
            .with("status", "pending");

        assert!(!tags.is_empty());
        assert_eq!(tags.get("priority"), Some("high"));
        assert_eq!(tags.get("status"), Some("pending"));
        assert_eq!(tags.get("missing"), None);
        assert_eq!(tags.iter().count(), 2);
    }

    #[test]
    fn empty_tag_set_reports_empty() {
        assert!(TagSet::new().is_empty());
        assert_eq!(TagSet::new().get("anything"), None);
    }
}
