//! Audit records
//!
//! One record is created per successful prediction: the raw feature record
//! with the prediction, creation time and model version appended. Records are
//! immutable once built.

use super::record::{display_value, FeatureRecord};
use serde::Serialize;

/// Column names appended after the feature columns
pub const AUDIT_EXTRA_COLUMNS: [&str; 3] = ["credit_score", "timestamp", "model_version"];

/// Raw request plus prediction, as persisted to the audit log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    #[serde(flatten)]
    record: FeatureRecord,
    credit_score: i64,
    /// Creation time at second precision (`%Y-%m-%d %H:%M:%S`)
    timestamp: String,
    model_version: String,
}

impl AuditRecord {
    pub fn new(
        record: FeatureRecord,
        credit_score: i64,
        timestamp: impl Into<String>,
        model_version: impl Into<String>,
    ) -> Self {
        Self {
            record,
            credit_score,
            timestamp: timestamp.into(),
            model_version: model_version.into(),
        }
    }

    pub fn record(&self) -> &FeatureRecord {
        &self.record
    }

    pub fn credit_score(&self) -> i64 {
        self.credit_score
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Column names: record keys in record order, then the appended columns
    pub fn header(&self) -> Vec<String> {
        self.record
            .keys()
            .cloned()
            .chain(AUDIT_EXTRA_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Row values aligned with [`AuditRecord::header`]
    pub fn values(&self) -> Vec<String> {
        self.record
            .iter()
            .map(|(_, v)| display_value(v))
            .chain([
                self.credit_score.to_string(),
                self.timestamp.clone(),
                self.model_version.clone(),
            ])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AuditRecord {
        let record = FeatureRecord::new()
            .with("idade", 35)
            .with("ocupacao", "Engineer");
        AuditRecord::new(record, 2, "2025-01-10 12:30:00", "7")
    }

    #[test]
    fn test_header_appends_columns() {
        assert_eq!(
            sample().header(),
            vec!["idade", "ocupacao", "credit_score", "timestamp", "model_version"]
        );
    }

    #[test]
    fn test_values_align_with_header() {
        let audit = sample();
        assert_eq!(
            audit.values(),
            vec!["35", "Engineer", "2", "2025-01-10 12:30:00", "7"]
        );
        assert_eq!(audit.header().len(), audit.values().len());
    }

    #[test]
    fn test_serialize_flattens_record() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["idade"], 35);
        assert_eq!(json["credit_score"], 2);
        assert_eq!(json["model_version"], "7");
    }
}
