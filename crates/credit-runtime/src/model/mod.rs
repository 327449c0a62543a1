//! Model provider
//!
//! The model artifact and its metadata sidecar are loaded once at startup and
//! shared read-only across invocations.

mod ensemble;

pub use ensemble::{Node, Tree, TreeEnsembleModel};

use crate::error::ModelError;
use credit_core::{EncodedVector, ModelMetadata, VECTOR_LEN};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// A loaded predictive model
pub trait Model: Send + Sync {
    /// Predict one class label per row
    fn predict(&self, rows: &[EncodedVector]) -> Result<Vec<i64>, ModelError>;
}

/// Model plus the metadata it was shipped with
#[derive(Clone)]
pub struct LoadedModel {
    pub model: Arc<dyn Model>,
    pub metadata: ModelMetadata,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Loads model artifacts from local files
pub struct ModelProvider;

impl ModelProvider {
    /// Load the tree ensemble artifact and its metadata sidecar.
    ///
    /// The artifact must be laid out for the encoder's vector width.
    pub async fn load(
        model_path: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
    ) -> Result<LoadedModel, ModelError> {
        let model_path = model_path.as_ref();
        let metadata_path = metadata_path.as_ref();

        let model_json = read(model_path).await?;
        let model = TreeEnsembleModel::from_json(&model_json).map_err(|e| match e {
            ModelError::Parse { source, .. } => ModelError::Parse {
                path: model_path.display().to_string(),
                source,
            },
            other => other,
        })?;

        if model.n_features() != VECTOR_LEN {
            return Err(ModelError::InvalidModel(format!(
                "artifact expects {} features, encoder produces {}",
                model.n_features(),
                VECTOR_LEN
            )));
        }

        let metadata_json = read(metadata_path).await?;
        let metadata =
            ModelMetadata::from_json(&metadata_json).map_err(|source| ModelError::Parse {
                path: metadata_path.display().to_string(),
                source,
            })?;

        info!(
            model_name = %metadata.model_name,
            version = %metadata.version,
            run_id = %metadata.run_id,
            trees = model.tree_count(),
            "Model loaded from {}",
            model_path.display()
        );

        Ok(LoadedModel {
            model: Arc::new(model),
            metadata,
        })
    }
}

async fn read(path: &Path) -> Result<String, ModelError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })
}
