//! Response envelope

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Successful prediction body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBody {
    pub prediction: i64,
    pub version: String,
}

/// Response returned to the invoking platform.
///
/// `body` is itself a JSON document encoded as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HandlerResponse {
    fn json(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// 200 response carrying the prediction and model version
    pub fn prediction(prediction: i64, version: impl Into<String>) -> Self {
        let body = json!({
            "prediction": prediction,
            "version": version.into(),
        });
        Self::json(200, body.to_string())
    }

    /// Structured error response
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        let body = json!({
            "error": message.into(),
            "status": status_code,
        });
        Self::json(status_code, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decode the body of a successful response
    pub fn prediction_body(&self) -> Option<PredictionBody> {
        if !self.is_success() {
            return None;
        }
        serde_json::from_str(&self.body).ok()
    }
}
