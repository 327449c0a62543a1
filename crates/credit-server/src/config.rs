//! Server configuration

use anyhow::Context;
use credit_runtime::sink::{DEFAULT_AUDIT_PREFIX, DEFAULT_NAMESPACE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where prediction metrics are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsBackend {
    /// Prometheus registry exposed at `/metrics`
    #[default]
    Prometheus,
    /// In-process collector only
    Memory,
    /// Observations are discarded
    Disabled,
}

/// Metrics sink configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub backend: MetricsBackend,

    /// Namespace attached to every observation
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            backend: MetricsBackend::default(),
            namespace: default_namespace(),
        }
    }
}

/// Audit log storage backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuditBackend {
    /// Partitions written as files under `root`
    FileSystem {
        #[serde(default = "default_audit_root")]
        root: PathBuf,
    },
    /// Partitions kept in process memory
    Memory,
}

fn default_audit_root() -> PathBuf {
    PathBuf::from("audit")
}

impl Default for AuditBackend {
    fn default() -> Self {
        AuditBackend::FileSystem {
            root: default_audit_root(),
        }
    }
}

/// Audit log configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub backend: AuditBackend,

    /// Logical path prepended to every partition key
    #[serde(default = "default_audit_prefix")]
    pub prefix: String,
}

fn default_audit_prefix() -> String {
    DEFAULT_AUDIT_PREFIX.to_string()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            backend: AuditBackend::default(),
            prefix: default_audit_prefix(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (HTTP)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tree ensemble artifact
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Metadata sidecar shipped with the artifact
    #[serde(default = "default_metadata_path")]
    pub metadata_path: PathBuf,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model/model.json")
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("model/model_metadata.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: default_model_path(),
            metadata_path: default_metadata_path(),
            metrics: MetricsConfig::default(),
            audit: AuditConfig::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `config/server.*` and `CREDIT_` environment variables
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();
        Self::load_from("config/server")
    }

    /// Load configuration from the file `name` (extension optional) overlaid
    /// with environment variables. A missing file yields the defaults; a file
    /// that fails to parse or deserialize is an error.
    pub fn load_from(name: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("CREDIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", name))?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Address to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
