//! Error types for feature encoding

use thiserror::Error;

/// Encoding error
///
/// These are the only two ways a record can fail to encode. Unknown categorical
/// values are not errors; they fall back to the reference category.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// A required key is absent from the record
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A value could not be cast to the field's numeric type
    #[error("Type mismatch for field '{field}': expected {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },
}

impl EncodingError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            EncodingError::MissingField(field) => field,
            EncodingError::TypeMismatch { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, EncodingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = EncodingError::MissingField("idade".to_string());
        assert_eq!(err.to_string(), "Missing required field: idade");
        assert_eq!(err.field(), "idade");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = EncodingError::TypeMismatch {
            field: "renda_anual".to_string(),
            expected: "float",
            found: "\"abc\"".to_string(),
        };
        assert!(err.to_string().contains("renda_anual"));
        assert!(err.to_string().contains("expected float"));
        assert_eq!(err.field(), "renda_anual");
    }
}
