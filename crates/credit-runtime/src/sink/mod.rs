//! Side-effect sinks
//!
//! Both sinks are best-effort collaborators: the handler attempts every write
//! before responding, but a failure never changes the response.
//!
//! - metrics: monitoring observations (`MetricsSink`)
//! - prometheus_sink: `MetricsSink` backed by a Prometheus registry
//! - store: keyed blob storage (`ObjectStore`)
//! - audit: timestamp-partitioned CSV audit log on top of an `ObjectStore`

pub mod audit;
pub mod metrics;
pub mod prometheus_sink;
pub mod store;

pub use prometheus_sink::PrometheusSink;
pub use audit::{partition_key, AuditLogWriter, DEFAULT_AUDIT_PREFIX, TIMESTAMP_FORMAT};
pub use metrics::{
    publish_prediction_metrics, MetricDatum, MetricUnit, MetricsSink, NoopSink,
    DEFAULT_NAMESPACE, INPUT_FEATURE_METRIC, PREDICTION_METRIC,
};
pub use store::{FileSystemStore, MemoryStore, ObjectStore};
