//! Credit Core - Domain types and feature encoding for the credit score endpoint
//!
//! This crate provides the pure, I/O-free part of the inference endpoint:
//! - Feature records as received from callers
//! - The fixed vector layout expected by the trained model
//! - The encoder mapping records onto that layout
//! - Prediction, metadata and audit record types
//! - Error types

pub mod encoding;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use encoding::{encode, feature_names, EncodedValue, EncodedVector, VECTOR_LEN};
pub use error::EncodingError;
pub use types::{AuditRecord, FeatureRecord, ModelMetadata, RiskCategory};
