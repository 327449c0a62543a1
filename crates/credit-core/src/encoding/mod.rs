//! Feature encoding
//!
//! Maps a raw [`FeatureRecord`](crate::FeatureRecord) onto the fixed-length
//! vector the trained model consumes:
//! - layout: the field and category tables that define the vector
//! - encoder: the record -> vector transformation

pub mod encoder;
pub mod layout;

pub use encoder::{encode, EncodedValue, EncodedVector};
pub use layout::{
    feature_names, CategoricalField, NumericField, NumericKind, CATEGORICAL_FIELDS,
    NUMERIC_FIELDS, VECTOR_LEN,
};
