//! Risk model configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::BASELINE_ARTIFACT_ID;
use crate::domain::features::{FeatureSchema, SchemaVersion};

/// Which artifact to score with, and the feature schema it must match.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    /// JSON or YAML artifact on disk, or `spectrum`; the bundled baseline when unset
    pub artifact_path: Option<String>,

    /// Feature schema the engineer produces and the artifact must declare
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl ModelConfig {
    pub fn schema_version(&self) -> SchemaVersion {
        SchemaVersion::new(self.schema_version)
    }

    /// Identifier handed to the artifact loader.
    pub fn artifact_id(&self) -> &str {
        match self.artifact_path.as_deref() {
            Some(path) if !path.trim().is_empty() => path,
            _ => BASELINE_ARTIFACT_ID,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        FeatureSchema::for_version(self.schema_version())
            .map(|_| ())
            .map_err(|_| ValidationError::UnsupportedSchemaVersion(self.schema_version))
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: None,
            schema_version: default_schema_version(),
        }
    }
}

fn default_schema_version() -> u32 {
    SchemaVersion::CURRENT.value()
}
