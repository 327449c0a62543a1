//! Record -> vector encoder

use super::layout::{NumericKind, CATEGORICAL_FIELDS, NUMERIC_FIELDS, VECTOR_LEN};
use crate::error::{EncodingError, Result};
use crate::types::FeatureRecord;
use serde::Serialize;
use serde_json::Value;

/// One column of an encoded vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EncodedValue {
    Float(f64),
    Int(i64),
    Flag(bool),
}

impl EncodedValue {
    /// Numeric view consumed by models (flags become 0.0 / 1.0)
    pub fn as_f64(&self) -> f64 {
        match self {
            EncodedValue::Float(v) => *v,
            EncodedValue::Int(v) => *v as f64,
            EncodedValue::Flag(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Fixed-order encoded feature vector
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EncodedVector(Vec<EncodedValue>);

impl EncodedVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[EncodedValue] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<EncodedValue> {
        self.0.get(index).copied()
    }

    /// Dense numeric row
    pub fn to_f64_row(&self) -> Vec<f64> {
        self.0.iter().map(EncodedValue::as_f64).collect()
    }
}

impl From<Vec<EncodedValue>> for EncodedVector {
    fn from(values: Vec<EncodedValue>) -> Self {
        Self(values)
    }
}

/// Encode a raw record into the model's vector layout.
///
/// Every required key must be present. Numeric values are cast to their
/// field's semantic type. Categorical values are compared exactly
/// (case-sensitive) against each domain member; a value outside the domain
/// yields an all-false block, the same as the reference category.
pub fn encode(record: &FeatureRecord) -> Result<EncodedVector> {
    let mut values = Vec::with_capacity(VECTOR_LEN);

    for field in &NUMERIC_FIELDS {
        let raw = require(record, field.key)?;
        let value = match field.kind {
            NumericKind::Float => EncodedValue::Float(cast_float(field.key, raw)?),
            NumericKind::Int => EncodedValue::Int(cast_int(field.key, raw)?),
        };
        values.push(value);
    }

    for field in &CATEGORICAL_FIELDS {
        let raw = require(record, field.key)?;
        let category = raw.as_str();
        if category.map_or(true, |c| !field.domain.contains(&c)) {
            log::debug!(
                "Value {} for '{}' outside known domain, encoding as reference category '{}'",
                raw,
                field.key,
                field.reference
            );
        }
        values.extend(
            field
                .domain
                .iter()
                .map(|member| EncodedValue::Flag(category == Some(*member))),
        );
    }

    debug_assert_eq!(values.len(), VECTOR_LEN);
    Ok(EncodedVector(values))
}

fn require<'a>(record: &'a FeatureRecord, key: &str) -> Result<&'a Value> {
    record
        .get(key)
        .ok_or_else(|| EncodingError::MissingField(key.to_string()))
}

fn mismatch(key: &str, expected: NumericKind, found: &Value) -> EncodingError {
    EncodingError::TypeMismatch {
        field: key.to_string(),
        expected: expected.as_str(),
        found: found.to_string(),
    }
}

fn cast_float(key: &str, raw: &Value) -> Result<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(key, NumericKind::Float, raw))
}

fn cast_int(key: &str, raw: &Value) -> Result<i64> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64().or_else(|| {
            // Floats truncate toward zero
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(key, NumericKind::Int, raw))
}
