//! Domain types for the credit score endpoint
//!
//! This module contains:
//! - Feature records (raw caller input)
//! - Risk categories derived from predicted class labels
//! - Model metadata loaded at startup
//! - Audit records persisted after each prediction

pub mod audit;
pub mod metadata;
pub mod prediction;
pub mod record;

pub use audit::AuditRecord;
pub use metadata::ModelMetadata;
pub use prediction::RiskCategory;
pub use record::{display_value, FeatureRecord};
