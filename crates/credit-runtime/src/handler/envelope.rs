//! Invocation envelope detection
//!
//! Two shapes are accepted, decided by a single check:
//! - gateway: `{"body": "<json string with a data key>"}`
//! - direct: `{"data": {...}}`
//!
//! A missing `data` key yields an empty record, which then fails encoding
//! with `MissingField`.

use crate::error::{Result, RuntimeError};
use credit_core::FeatureRecord;
use serde_json::{Map, Value};

/// Detected invocation shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// HTTP gateway wrapper carrying a JSON-encoded `body`
    Gateway,
    /// Event carries `data` at the top level
    Direct,
}

impl Envelope {
    pub fn detect(event: &Value) -> Self {
        match event {
            Value::Object(map) if map.contains_key("body") => Envelope::Gateway,
            _ => Envelope::Direct,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Envelope::Gateway => "gateway",
            Envelope::Direct => "direct",
        }
    }
}

/// Extract the feature record from either envelope shape
pub fn extract_record(event: &Value) -> Result<FeatureRecord> {
    match Envelope::detect(event) {
        Envelope::Gateway => {
            let body = event.get("body").unwrap_or(&Value::Null);
            match body {
                Value::String(raw) => {
                    let document: Value = serde_json::from_str(raw).map_err(|e| {
                        RuntimeError::InvalidEnvelope(format!("body is not valid JSON: {}", e))
                    })?;
                    match document {
                        Value::Object(map) => data_of(&map),
                        other => Err(RuntimeError::InvalidEnvelope(format!(
                            "body must encode a JSON object, got {}",
                            type_name(&other)
                        ))),
                    }
                }
                // Some gateways deliver the body already decoded
                Value::Object(map) => data_of(map),
                _ => Ok(FeatureRecord::new()),
            }
        }
        Envelope::Direct => match event {
            Value::Object(map) => data_of(map),
            _ => Ok(FeatureRecord::new()),
        },
    }
}

fn data_of(document: &Map<String, Value>) -> Result<FeatureRecord> {
    match document.get("data") {
        None | Some(Value::Null) => Ok(FeatureRecord::new()),
        Some(Value::Object(fields)) => Ok(FeatureRecord::from(fields.clone())),
        Some(other) => Err(RuntimeError::InvalidEnvelope(format!(
            "data must be a JSON object, got {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
