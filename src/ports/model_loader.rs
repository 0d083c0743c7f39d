//! Model Artifact Loader Port - Resolves artifact identifiers to models.

use thiserror::Error;

use crate::domain::features::{SchemaMismatchError, SchemaVersion};
use crate::domain::risk::LoadedRiskModel;

/// Artifact loading failed. Always a fatal configuration error.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model artifact not found: {0}")]
    NotFound(String),

    #[error("failed to read model artifact {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to decode model artifact {path}: {message}")]
    Decode { path: String, message: String },

    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),
}

pub trait ModelArtifactLoader: Send + Sync {
    /// Loads `artifact_id` and validates it against `expected`.
    fn load(
        &self,
        artifact_id: &str,
        expected: SchemaVersion,
    ) -> Result<LoadedRiskModel, ModelLoadError>;
}
