//! Model metadata sidecar
//!
//! Written next to the model artifact by the download tooling and read once at
//! process start. Read-only for the lifetime of the process.

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata describing the loaded model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Registered model name
    #[serde(default)]
    pub model_name: String,

    /// Registry version, reported in every prediction response
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,

    /// Training run identifier
    #[serde(default)]
    pub run_id: String,

    /// Artifact source URI
    #[serde(default)]
    pub source: String,

    /// Download time (`%Y-%m-%d %H:%M:%S`)
    #[serde(default)]
    pub downloaded_at: Option<String>,
}

impl ModelMetadata {
    /// Minimal metadata carrying only a version
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            model_name: String::new(),
            version: version.into(),
            run_id: String::new(),
            source: String::new(),
            downloaded_at: None,
        }
    }

    /// Parse the sidecar JSON document
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
