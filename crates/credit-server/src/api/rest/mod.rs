//! REST API implementation
//!
//! - types: application state and response types
//! - extractors: custom request extractors
//! - handlers: API endpoint handlers
//! - router: router creation and configuration

mod extractors;
mod handlers;
mod router;
pub mod types;

pub use extractors::{JsonExtractor, RequestId};
pub use router::create_router;
pub use types::{AppState, HealthResponse};
