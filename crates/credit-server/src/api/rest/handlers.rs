//! API endpoint handlers

use super::extractors::{JsonExtractor, RequestId};
use super::types::*;
use crate::error::ServerError;
use axum::{
    body::Body,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use credit_runtime::{HandlerResponse, InvocationContext};
use serde_json::Value;
use tracing::{debug, error};

/// Health check endpoint
pub(super) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_version: state.handler.metadata().version.clone(),
    })
}

/// Platform-style invocation: the response envelope is returned as the body
pub(super) async fn invoke(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonExtractor(event): JsonExtractor<Value>,
) -> Json<HandlerResponse> {
    debug!(request_id = %request_id, "Received invocation");
    Json(
        state
            .handler
            .handle(event, InvocationContext::new(request_id))
            .await,
    )
}

/// Prediction endpoint: the response envelope becomes the HTTP response
pub(super) async fn predict(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonExtractor(event): JsonExtractor<Value>,
) -> Result<Response, ServerError> {
    debug!(request_id = %request_id, "Received prediction request");
    let response = state
        .handler
        .handle(event, InvocationContext::new(request_id))
        .await;
    into_http_response(response)
}

/// Prometheus text exposition
pub(super) async fn metrics(State(state): State<AppState>) -> Result<Response, ServerError> {
    let sink = state
        .prometheus
        .as_ref()
        .ok_or_else(|| ServerError::NotFound("Prometheus exporter is not enabled".to_string()))?;

    match sink.gather() {
        Ok(metrics_text) => Ok((
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4")],
            metrics_text,
        )
            .into_response()),
        Err(e) => {
            error!("Failed to get metrics: {}", e);
            Err(e.into())
        }
    }
}

pub(super) fn into_http_response(envelope: HandlerResponse) -> Result<Response, ServerError> {
    let status = StatusCode::from_u16(envelope.status_code).map_err(|e| {
        ServerError::InternalError(format!("invalid status {}: {}", envelope.status_code, e))
    })?;

    let mut builder = Response::builder().status(status);
    for (name, value) in &envelope.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Body::from(envelope.body))
        .map_err(|e| ServerError::InternalError(format!("failed to build response: {}", e)))
}
