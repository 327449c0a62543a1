//! Service initialization
//!
//! Turns a [`ServerConfig`] into a ready request handler: checks the model
//! artifacts are present, loads them, and wires the metrics and audit sinks
//! selected by configuration.

use crate::config::{AuditBackend, MetricsBackend, ServerConfig};
use anyhow::{Context, Result};
use credit_runtime::{
    AuditLogWriter, FileSystemStore, MemoryStore, MetricsCollector, MetricsSink, ModelProvider,
    NoopSink, ObjectStore, PrometheusSink, RequestHandler,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything the HTTP layer needs
#[derive(Clone)]
pub struct Service {
    pub handler: Arc<RequestHandler>,
    /// Present when observations are exported to Prometheus
    pub prometheus: Option<Arc<PrometheusSink>>,
}

/// Initialize the inference service
pub async fn init_service(config: &ServerConfig) -> Result<Service> {
    ensure_artifact("model artifact", &config.model_path)?;
    ensure_artifact("model metadata", &config.metadata_path)?;

    let loaded = ModelProvider::load(&config.model_path, &config.metadata_path)
        .await
        .context("Failed to load model")?;
    info!("✓ Model version {} ready", loaded.metadata.version);

    let collector = Arc::new(MetricsCollector::new());
    let (metrics_sink, prometheus) = match config.metrics.backend {
        MetricsBackend::Prometheus => {
            let sink = Arc::new(PrometheusSink::new());
            (sink.clone() as Arc<dyn MetricsSink>, Some(sink))
        }
        MetricsBackend::Memory => (collector.clone() as Arc<dyn MetricsSink>, None),
        MetricsBackend::Disabled => {
            warn!("Metrics disabled, prediction observations will be discarded");
            (Arc::new(NoopSink) as Arc<dyn MetricsSink>, None)
        }
    };

    let store: Arc<dyn ObjectStore> = match &config.audit.backend {
        AuditBackend::FileSystem { root } => {
            info!("Audit log partitions under {}", root.display());
            Arc::new(FileSystemStore::new(root))
        }
        AuditBackend::Memory => {
            warn!("Audit log kept in memory, records are lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let handler = RequestHandler::from_loaded(loaded)
        .with_metrics_sink(metrics_sink)
        .with_namespace(config.metrics.namespace.clone())
        .with_audit_log(AuditLogWriter::new(store).with_prefix(config.audit.prefix.clone()))
        .with_collector(collector)
        .build();

    Ok(Service {
        handler: Arc::new(handler),
        prometheus,
    })
}

fn ensure_artifact(what: &str, path: &Path) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!("{} not found at {}", what, path.display());
    }
    Ok(())
}
