//! Per-request orchestration
//!
//! Processing is strictly sequential: extract record, encode, predict,
//! publish metrics, append audit record, respond. Metrics and audit failures
//! are logged and swallowed; encoding and model failures become structured
//! error responses and skip both side effects.

use super::envelope::{extract_record, Envelope};
use super::response::HandlerResponse;
use crate::error::{ModelError, Result, RuntimeError};
use crate::model::{LoadedModel, Model};
use crate::observability::{Metrics, MetricsCollector};
use crate::sink::{
    publish_prediction_metrics, AuditLogWriter, MemoryStore, MetricsSink, NoopSink,
    DEFAULT_NAMESPACE, TIMESTAMP_FORMAT,
};
use chrono::{Local, NaiveDateTime};
use credit_core::{encode, AuditRecord, FeatureRecord, ModelMetadata, RiskCategory};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

/// Per-invocation context supplied by the caller
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Request handler
///
/// Holds the read-only model and metadata plus the side-effect sinks. Cheap to
/// share behind an `Arc`; invocations hold no state across calls.
pub struct RequestHandler {
    model: Arc<dyn Model>,
    metadata: Arc<ModelMetadata>,
    metrics_sink: Arc<dyn MetricsSink>,
    namespace: String,
    audit_log: AuditLogWriter,
    collector: Arc<MetricsCollector>,
}

impl RequestHandler {
    pub fn builder(model: Arc<dyn Model>, metadata: ModelMetadata) -> RequestHandlerBuilder {
        RequestHandlerBuilder::new(model, metadata)
    }

    pub fn from_loaded(loaded: LoadedModel) -> RequestHandlerBuilder {
        RequestHandlerBuilder::new(loaded.model, loaded.metadata)
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Operational metrics (requests, latency, error kinds)
    pub fn collector(&self) -> &Arc<MetricsCollector> {
        &self.collector
    }

    /// Handle one invocation event
    pub async fn handle(&self, event: Value, context: InvocationContext) -> HandlerResponse {
        let envelope = Envelope::detect(&event);
        let span = info_span!(
            "invoke",
            request_id = %context.request_id,
            envelope = envelope.as_str()
        );

        async move {
            let start = Instant::now();
            self.collector.counter("requests_total").inc();

            let outcome = self.process(&event).await;
            self.collector
                .record_execution_time("invoke", start.elapsed());

            match outcome {
                Ok(prediction) => {
                    info!(
                        prediction,
                        risk_category = RiskCategory::from_label(prediction).as_str(),
                        "Prediction served"
                    );
                    HandlerResponse::prediction(prediction, self.metadata.version.clone())
                }
                Err(e) => {
                    self.collector.record_error(e.kind());
                    warn!(error = %e, status = e.status_code(), "Request rejected");
                    HandlerResponse::error(e.status_code(), e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Handle an event with a fresh context
    pub async fn handle_event(&self, event: Value) -> HandlerResponse {
        self.handle(event, InvocationContext::default()).await
    }

    async fn process(&self, event: &Value) -> Result<i64> {
        let record = extract_record(event)?;
        let vector = encode(&record)?;

        let prediction = self
            .model
            .predict(std::slice::from_ref(&vector))?
            .into_iter()
            .next()
            .ok_or(ModelError::EmptyOutput)?;
        debug!(prediction, "Model prediction");

        self.publish_metrics(&record, prediction).await;
        self.write_audit(record, prediction, Local::now().naive_local())
            .await;

        Ok(prediction)
    }

    async fn publish_metrics(&self, record: &FeatureRecord, prediction: i64) {
        if let Err(e) =
            publish_prediction_metrics(self.metrics_sink.as_ref(), &self.namespace, record, prediction)
                .await
        {
            self.collector.record_error("metrics_sink");
            warn!(error = %e, "Failed to publish prediction metrics");
        }
    }

    async fn write_audit(&self, record: FeatureRecord, prediction: i64, now: NaiveDateTime) {
        let audit = AuditRecord::new(
            record,
            prediction,
            now.format(TIMESTAMP_FORMAT).to_string(),
            self.metadata.version.clone(),
        );
        match self.audit_log.append(&audit, now).await {
            Ok(key) => debug!(key = %key, "Audit record appended"),
            Err(e) => {
                self.collector.record_error("audit_sink");
                warn!(error = %e, "Failed to append audit record");
            }
        }
    }
}

/// Builder for [`RequestHandler`]
///
/// Defaults: metrics discarded, audit log kept in memory under `data/`.
pub struct RequestHandlerBuilder {
    model: Arc<dyn Model>,
    metadata: ModelMetadata,
    metrics_sink: Arc<dyn MetricsSink>,
    namespace: String,
    audit_log: Option<AuditLogWriter>,
    collector: Option<Arc<MetricsCollector>>,
}

impl RequestHandlerBuilder {
    pub fn new(model: Arc<dyn Model>, metadata: ModelMetadata) -> Self {
        Self {
            model,
            metadata,
            metrics_sink: Arc::new(NoopSink),
            namespace: DEFAULT_NAMESPACE.to_string(),
            audit_log: None,
            collector: None,
        }
    }

    pub fn with_metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics_sink = sink;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_audit_log(mut self, writer: AuditLogWriter) -> Self {
        self.audit_log = Some(writer);
        self
    }

    pub fn with_collector(mut self, collector: Arc<MetricsCollector>) -> Self {
        self.collector = Some(collector);
        self
    }

    pub fn build(self) -> RequestHandler {
        RequestHandler {
            model: self.model,
            metadata: Arc::new(self.metadata),
            metrics_sink: self.metrics_sink,
            namespace: self.namespace,
            audit_log: self
                .audit_log
                .unwrap_or_else(|| AuditLogWriter::new(Arc::new(MemoryStore::new()))),
            collector: self.collector.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use crate::sink::{MetricDatum, ObjectStore};
    use async_trait::async_trait;
    use credit_core::EncodedVector;
    use serde_json::json;

    /// Always predicts the configured label
    struct FixedModel(i64);

    impl Model for FixedModel {
        fn predict(&self, rows: &[EncodedVector]) -> std::result::Result<Vec<i64>, ModelError> {
            Ok(rows.iter().map(|_| self.0).collect())
        }
    }

    struct EmptyModel;

    impl Model for EmptyModel {
        fn predict(&self, _rows: &[EncodedVector]) -> std::result::Result<Vec<i64>, ModelError> {
            Ok(Vec::new())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl MetricsSink for FailingSink {
        async fn put_metric(&self, _datum: MetricDatum) -> std::result::Result<(), SinkError> {
            Err(SinkError::Unavailable("metrics endpoint down".to_string()))
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn get(&self, _key: &str) -> std::result::Result<Option<Vec<u8>>, SinkError> {
            Err(SinkError::Unavailable("bucket unreachable".to_string()))
        }

        async fn put(&self, _key: &str, _bytes: Vec<u8>) -> std::result::Result<(), SinkError> {
            Err(SinkError::Unavailable("bucket unreachable".to_string()))
        }
    }

    fn payload() -> Value {
        json!({
            "idade": 35,
            "renda_anual": 85000.0,
            "salario_liquido_mensal": 5500.0,
            "qtd_contas_bancarias": 3,
            "qtd_cartoes_credito": 2,
            "taxa_juros": 2.5,
            "qtd_emprestimos": 1,
            "dias_atraso_pagamento": 0,
            "qtd_pagamentos_atrasados": 0,
            "variacao_limite_credito": 500.0,
            "qtd_consultas_credito": 2,
            "divida_pendente": 1500.0,
            "percentual_utilizacao_credito": 35.5,
            "total_emprestimos_mensal": 800.0,
            "valor_investido_mensal": 1200.0,
            "saldo_mensal": 3000.0,
            "tempo_historico_credito_meses": 72,
            "ocupacao": "Engineer",
            "pagamento_valor_minimo": "Yes",
            "comportamento_pagamento": "Low_spent_Medium_value_payments",
            "tipos_emprestimos": "Personal Loan"
        })
    }

    fn handler(model: Arc<dyn Model>) -> RequestHandler {
        RequestHandler::builder(model, ModelMetadata::with_version("5")).build()
    }

    #[tokio::test]
    async fn test_success_response() {
        let response = handler(Arc::new(FixedModel(1)))
            .handle_event(json!({"data": payload()}))
            .await;

        assert_eq!(response.status_code, 200);
        let body = response.prediction_body().unwrap();
        assert_eq!(body.prediction, 1);
        assert_eq!(body.version, "5");
    }

    #[tokio::test]
    async fn test_encoding_error_is_400_and_skips_side_effects() {
        let store = Arc::new(MemoryStore::new());
        let collector = Arc::new(MetricsCollector::new());
        let handler = RequestHandler::builder(Arc::new(FixedModel(1)), ModelMetadata::with_version("5"))
            .with_metrics_sink(collector.clone())
            .with_audit_log(AuditLogWriter::new(store.clone()))
            .build();

        let response = handler.handle_event(json!({"data": {"ocupacao": "Engineer"}})).await;

        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("Missing required field: idade"));
        assert!(store.is_empty().await);
        assert!(collector.counter_names().is_empty());
        assert!(collector.histogram_names().is_empty());
    }

    #[tokio::test]
    async fn test_empty_model_output_is_500() {
        let response = handler(Arc::new(EmptyModel))
            .handle_event(json!({"data": payload()}))
            .await;
        assert_eq!(response.status_code, 500);
    }

    #[tokio::test]
    async fn test_sink_failures_do_not_abort_response() {
        let handler = RequestHandler::builder(Arc::new(FixedModel(2)), ModelMetadata::with_version("5"))
            .with_metrics_sink(Arc::new(FailingSink))
            .with_audit_log(AuditLogWriter::new(Arc::new(FailingStore)))
            .build();

        let response = handler.handle_event(json!({"data": payload()})).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.prediction_body().unwrap().prediction, 2);
        assert_eq!(handler.collector().counter("errors_metrics_sink").get(), 1);
        assert_eq!(handler.collector().counter("errors_audit_sink").get(), 1);
    }

    #[tokio::test]
    async fn test_operational_metrics() {
        let handler = handler(Arc::new(FixedModel(0)));

        handler.handle_event(json!({"data": payload()})).await;
        handler.handle_event(json!({})).await;

        assert_eq!(handler.collector().counter("requests_total").get(), 2);
        assert_eq!(handler.collector().histogram("invoke_duration").count(), 2);
        assert_eq!(handler.collector().counter("errors_missing_field").get(), 1);
    }

    #[tokio::test]
    async fn test_audit_written_with_prediction_and_version() {
        let store = Arc::new(MemoryStore::new());
        let handler = RequestHandler::builder(Arc::new(FixedModel(2)), ModelMetadata::with_version("11"))
            .with_audit_log(AuditLogWriter::new(store.clone()))
            .build();

        handler.handle_event(json!({"data": payload()})).await;

        let keys = store.keys().await;
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("data/real_data_"));

        let content = String::from_utf8(store.get(&keys[0]).await.unwrap().unwrap()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("idade,renda_anual,"));
        assert!(lines[0].ends_with(",credit_score,timestamp,model_version"));
        assert!(lines[1].starts_with("35,85000.0,"));
        assert!(lines[1].ends_with(",11"));
    }

    #[test]
    fn test_default_context_has_request_id() {
        let a = InvocationContext::default();
        let b = InvocationContext::default();
        assert!(!a.request_id.is_empty());
        assert_ne!(a.request_id, b.request_id);
    }
}
