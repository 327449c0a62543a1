//! Observability module
//!
//! In-process operational metrics (request counts, latency, error kinds).

pub mod metrics;

pub use metrics::{Counter, Histogram, Metrics, MetricsCollector};
