//! Timestamp-partitioned audit log
//!
//! Each prediction is appended as one CSV line to a partition keyed by its
//! creation second. Appends are read-modify-write against the store: fetch the
//! partition, append, write back. There is no locking; concurrent writers to
//! the same partition race and the last full write wins.

use super::store::ObjectStore;
use crate::error::SinkError;
use chrono::NaiveDateTime;
use credit_core::AuditRecord;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_AUDIT_PREFIX: &str = "data";

/// Timestamp format of the `timestamp` column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Partition key for a creation time:
/// `<prefix>/real_data_<YYYYmmdd_HHMMSS>_credit_score_data.csv`
pub fn partition_key(prefix: &str, at: NaiveDateTime) -> String {
    let file = format!(
        "real_data_{}_credit_score_data.csv",
        at.format("%Y%m%d_%H%M%S")
    );
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        file
    } else {
        format!("{}/{}", prefix, file)
    }
}

/// Appends audit records to an [`ObjectStore`]
#[derive(Clone)]
pub struct AuditLogWriter {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl AuditLogWriter {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            prefix: DEFAULT_AUDIT_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Append a record to the partition for `at`; returns the partition key.
    ///
    /// A missing partition is the first-write signal: the header line is
    /// written before the record.
    pub async fn append(&self, record: &AuditRecord, at: NaiveDateTime) -> Result<String, SinkError> {
        let key = partition_key(&self.prefix, at);
        let line = csv_line(&record.values());

        let content = match self.store.get(&key).await? {
            Some(mut existing) => {
                debug!(key = %key, "Appending to existing audit partition");
                if !existing.is_empty() && !existing.ends_with(b"\n") {
                    existing.push(b'\n');
                }
                existing.extend_from_slice(line.as_bytes());
                existing
            }
            None => {
                debug!(key = %key, "Creating audit partition");
                let mut fresh = csv_line(&record.header()).into_bytes();
                fresh.extend_from_slice(line.as_bytes());
                fresh
            }
        };

        self.store.put(&key, content).await?;
        Ok(key)
    }
}

/// One CSV line terminated by `\n`
fn csv_line(fields: &[String]) -> String {
    let escaped: Vec<String> = fields.iter().map(|f| escape(f)).collect();
    let mut line = escaped.join(",");
    line.push('\n');
    line
}

fn escape(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
