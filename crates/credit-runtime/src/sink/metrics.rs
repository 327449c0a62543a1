//! Metrics sink contract

use crate::error::SinkError;
use crate::observability::{Metrics, MetricsCollector};
use async_trait::async_trait;
use credit_core::types::display_value;
use credit_core::{FeatureRecord, RiskCategory};

pub const DEFAULT_NAMESPACE: &str = "CreditScore/Model";
pub const PREDICTION_METRIC: &str = "prediction value";
pub const INPUT_FEATURE_METRIC: &str = "input feature";

/// Unit attached to an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    None,
    Count,
}

impl MetricUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricUnit::None => "None",
            MetricUnit::Count => "Count",
        }
    }
}

/// A single metric observation with dimensional tags
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDatum {
    pub namespace: String,
    pub metric_name: String,
    pub value: f64,
    pub unit: MetricUnit,
    /// Dimension name/value pairs, in emission order
    pub dimensions: Vec<(String, String)>,
}

impl MetricDatum {
    pub fn new(namespace: impl Into<String>, metric_name: impl Into<String>, value: f64) -> Self {
        Self {
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            value,
            unit: MetricUnit::None,
            dimensions: Vec::new(),
        }
    }

    pub fn with_unit(mut self, unit: MetricUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.push((name.into(), value.into()));
        self
    }

    /// Stable series identifier: `namespace/metric{dim=value,...}`
    pub fn series_key(&self) -> String {
        let dims: Vec<String> = self
            .dimensions
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}/{}{{{}}}", self.namespace, self.metric_name, dims.join(","))
    }
}

/// Destination for monitoring observations
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Record one observation
    async fn put_metric(&self, datum: MetricDatum) -> Result<(), SinkError>;
}

/// Sink that discards everything (metrics disabled)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait]
impl MetricsSink for NoopSink {
    async fn put_metric(&self, _datum: MetricDatum) -> Result<(), SinkError> {
        Ok(())
    }
}

/// In-process sink: `Count` observations accumulate on counters, everything
/// else is observed on histograms. Series are keyed by [`MetricDatum::series_key`].
#[async_trait]
impl MetricsSink for MetricsCollector {
    async fn put_metric(&self, datum: MetricDatum) -> Result<(), SinkError> {
        let key = datum.series_key();
        match datum.unit {
            MetricUnit::Count => {
                if datum.value < 0.0 || !datum.value.is_finite() {
                    return Err(SinkError::Unavailable(format!(
                        "count metric {} cannot take value {}",
                        key, datum.value
                    )));
                }
                self.counter(&key).add(datum.value as u64);
            }
            MetricUnit::None => self.histogram(&key).observe(datum.value),
        }
        Ok(())
    }
}

/// Observations emitted for one prediction.
///
/// One `prediction value` observation tagged with the risk category, then one
/// `input feature` count per record field tagged with the field name and its
/// stringified value. The per-value tagging is high-cardinality on purpose.
pub fn prediction_metrics(
    namespace: &str,
    record: &FeatureRecord,
    prediction: i64,
) -> Vec<MetricDatum> {
    let category = RiskCategory::from_label(prediction);
    let mut data = Vec::with_capacity(record.len() + 1);

    data.push(
        MetricDatum::new(namespace, PREDICTION_METRIC, prediction as f64)
            .with_dimension("risk_category", category.as_str()),
    );

    for (name, value) in record.iter() {
        data.push(
            MetricDatum::new(namespace, INPUT_FEATURE_METRIC, 1.0)
                .with_unit(MetricUnit::Count)
                .with_dimension("feature", name.as_str())
                .with_dimension("value", display_value(value)),
        );
    }

    data
}

/// Send all observations for one prediction, stopping at the first failure
pub async fn publish_prediction_metrics(
    sink: &dyn MetricsSink,
    namespace: &str,
    record: &FeatureRecord,
    prediction: i64,
) -> Result<(), SinkError> {
    for datum in prediction_metrics(namespace, record, prediction) {
        sink.put_metric(datum).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FeatureRecord {
        FeatureRecord::new()
            .with("idade", 35)
            .with("ocupacao", "Engineer")
    }

    #[test]
    fn test_prediction_metrics_shape() {
        let data = prediction_metrics(DEFAULT_NAMESPACE, &record(), 2);
        assert_eq!(data.len(), 3);

        assert_eq!(data[0].metric_name, PREDICTION_METRIC);
        assert_eq!(data[0].value, 2.0);
        assert_eq!(data[0].unit, MetricUnit::None);
        assert_eq!(
            data[0].dimensions,
            vec![("risk_category".to_string(), "Good".to_string())]
        );

        assert_eq!(data[1].metric_name, INPUT_FEATURE_METRIC);
        assert_eq!(data[1].unit, MetricUnit::Count);
        assert_eq!(
            data[1].dimensions,
            vec![
                ("feature".to_string(), "idade".to_string()),
                ("value".to_string(), "35".to_string())
            ]
        );
        assert_eq!(data[2].dimensions[1].1, "Engineer");
    }

    #[test]
    fn test_unmapped_prediction_tags_unknown() {
        let data = prediction_metrics(DEFAULT_NAMESPACE, &FeatureRecord::new(), 7);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].dimensions[0].1, "Unknown");
    }

    #[test]
    fn test_series_key() {
        let datum = MetricDatum::new("ns", "m", 1.0)
            .with_dimension("a", "1")
            .with_dimension("b", "x y");
        assert_eq!(datum.series_key(), "ns/m{a=1,b=x y}");
    }

    #[tokio::test]
    async fn test_collector_sink() {
        let collector = MetricsCollector::new();
        publish_prediction_metrics(&collector, DEFAULT_NAMESPACE, &record(), 0)
            .await
            .unwrap();
        publish_prediction_metrics(&collector, DEFAULT_NAMESPACE, &record(), 1)
            .await
            .unwrap();

        let feature = collector
            .counter("CreditScore/Model/input feature{feature=idade,value=35}")
            .get();
        assert_eq!(feature, 2);

        let poor = collector.histogram("CreditScore/Model/prediction value{risk_category=Poor}");
        assert_eq!(poor.count(), 1);
        assert_eq!(poor.last(), Some(0.0));
    }

    #[tokio::test]
    async fn test_collector_rejects_negative_count() {
        let collector = MetricsCollector::new();
        let datum = MetricDatum::new("ns", "m", -1.0).with_unit(MetricUnit::Count);
        assert!(collector.put_metric(datum).await.is_err());
    }

    #[tokio::test]
    async fn test_noop_sink() {
        assert!(publish_prediction_metrics(&NoopSink, "ns", &record(), 1)
            .await
            .is_ok());
    }
}
