//! Credit Runtime - Execution layer for the credit score endpoint
//!
//! This crate wires the pure encoder from `credit-core` to its collaborators:
//! - model: model artifact loading and prediction
//! - sink: metrics and audit log sinks (best-effort side effects)
//! - handler: envelope detection and per-request orchestration
//! - observability: in-process operational metrics

pub mod error;
pub mod handler;
pub mod model;
pub mod observability;
pub mod sink;

// Re-export main types
pub use error::{ModelError, Result, RuntimeError, SinkError};
pub use handler::{HandlerResponse, InvocationContext, RequestHandler, RequestHandlerBuilder};
pub use model::{LoadedModel, Model, ModelProvider, TreeEnsembleModel};
pub use observability::{Counter, Histogram, Metrics, MetricsCollector};
pub use sink::{
    AuditLogWriter, FileSystemStore, MemoryStore, MetricDatum, MetricUnit, MetricsSink,
    NoopSink, ObjectStore, PrometheusSink,
};
