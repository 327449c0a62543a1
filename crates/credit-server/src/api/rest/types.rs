//! REST API type definitions

use crate::bootstrap::Service;
use credit_runtime::{PrometheusSink, RequestHandler};
use serde::Serialize;
use std::sync::Arc;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<RequestHandler>,
    pub prometheus: Option<Arc<PrometheusSink>>,
}

impl From<Service> for AppState {
    fn from(service: Service) -> Self {
        Self {
            handler: service.handler,
            prometheus: service.prometheus,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_version: String,
}
