//! Request handling
//!
//! - envelope: detects the invocation shape and extracts the feature record
//! - response: the response envelope returned to the invoking platform
//! - service: per-request orchestration (encode, predict, side effects)

pub mod envelope;
pub mod response;
pub mod service;

pub use envelope::{extract_record, Envelope};
pub use response::{HandlerResponse, PredictionBody};
pub use service::{InvocationContext, RequestHandler, RequestHandlerBuilder};
