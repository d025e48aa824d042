//! Metrics sink capability and its transports.
//!
//! Every emission is fire-and-forget: failure to deliver a metric must never
//! fail or delay the business operation that triggered it. The sink is an
//! explicitly injected capability; nothing in the crate reaches for a global
//! metrics client.

mod recorder;
mod sink;
mod statsd;

pub use recorder::RecordingSink;
pub use sink::{MetricEvent, MetricKind, MetricsSink, NullSink, TagSet};
pub use statsd::DogstatsdSink;
