//! Prometheus-backed metrics sink
//!
//! Observations are rendered into a private registry and exposed in the text
//! exposition format. `Count` observations increment a counter; all other
//! units set a gauge. Metric vectors are created lazily per
//! (name, dimension names) pair on first observation.

use super::metrics::{MetricDatum, MetricUnit, MetricsSink};
use crate::error::SinkError;
use async_trait::async_trait;
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use std::sync::Mutex;

/// Metrics sink rendering into a Prometheus registry
pub struct PrometheusSink {
    registry: Registry,
    counters: Mutex<HashMap<String, CounterVec>>,
    gauges: Mutex<HashMap<String, GaugeVec>>,
}

impl PrometheusSink {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            counters: Mutex::new(HashMap::new()),
            gauges: Mutex::new(HashMap::new()),
        }
    }

    /// Gather all metrics and encode them in Prometheus text format
    pub fn gather(&self) -> Result<String, SinkError> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            SinkError::Unavailable(format!("Prometheus encoder produced invalid UTF-8: {}", e))
        })
    }

    fn counter_vec(&self, name: &str, labels: &[&str]) -> Result<CounterVec, SinkError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| SinkError::Unavailable("counter registry lock poisoned".to_string()))?;
        let key = format!("{}|{}", name, labels.join(","));
        if let Some(existing) = counters.get(&key) {
            return Ok(existing.clone());
        }
        let vec = CounterVec::new(Opts::new(name, format!("{} observations", name)), labels)?;
        self.registry.register(Box::new(vec.clone()))?;
        counters.insert(key, vec.clone());
        Ok(vec)
    }

    fn gauge_vec(&self, name: &str, labels: &[&str]) -> Result<GaugeVec, SinkError> {
        let mut gauges = self
            .gauges
            .lock()
            .map_err(|_| SinkError::Unavailable("gauge registry lock poisoned".to_string()))?;
        let key = format!("{}|{}", name, labels.join(","));
        if let Some(existing) = gauges.get(&key) {
            return Ok(existing.clone());
        }
        let vec = GaugeVec::new(Opts::new(name, format!("Last {} observation", name)), labels)?;
        self.registry.register(Box::new(vec.clone()))?;
        gauges.insert(key, vec.clone());
        Ok(vec)
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsSink for PrometheusSink {
    async fn put_metric(&self, datum: MetricDatum) -> Result<(), SinkError> {
        let name = metric_name(&datum.namespace, &datum.metric_name);
        let label_names: Vec<String> = datum
            .dimensions
            .iter()
            .map(|(k, _)| sanitize(k))
            .collect();
        let label_names: Vec<&str> = label_names.iter().map(String::as_str).collect();
        let label_values: Vec<&str> = datum.dimensions.iter().map(|(_, v)| v.as_str()).collect();

        match datum.unit {
            MetricUnit::Count => {
                if datum.value < 0.0 {
                    return Err(SinkError::Unavailable(format!(
                        "counter {} cannot decrease",
                        name
                    )));
                }
                self.counter_vec(&name, &label_names)?
                    .get_metric_with_label_values(label_values.as_slice())?
                    .inc_by(datum.value);
            }
            MetricUnit::None => {
                self.gauge_vec(&name, &label_names)?
                    .get_metric_with_label_values(label_values.as_slice())?
                    .set(datum.value);
            }
        }
        Ok(())
    }
}

/// `CreditScore/Model` + `prediction value` -> `CreditScore_Model_prediction_value`
fn metric_name(namespace: &str, metric: &str) -> String {
    let joined = if namespace.is_empty() {
        metric.to_string()
    } else {
        format!("{}_{}", namespace, metric)
    };
    sanitize(&joined)
}

fn sanitize(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
