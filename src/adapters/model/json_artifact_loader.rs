//! File-based Model Artifact Loader
//!
//! Reads model artifacts as JSON (`.json`) or YAML (`.yaml`/`.yml`) from
//! disk and validates them against the feature schema before handing out a
//! scoring model. The identifier `baseline` resolves to the bundled demo
//! artifact and `spectrum` to the layered rule scorer, neither touching
//! the filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::features::{FeatureSchema, SchemaVersion};
use crate::domain::risk::{LoadedRiskModel, ModelArtifact, SpectrumArtifact};
use crate::ports::{ModelArtifactLoader, ModelLoadError, RiskModel};

/// Identifier of the artifact compiled into the crate.
pub const BASELINE_ARTIFACT_ID: &str = "baseline";

/// Identifier of the layered spectrum scorer.
pub const SPECTRUM_ARTIFACT_ID: &str = "spectrum";

static BASELINE_V1_JSON: &str = include_str!("../../../models/baseline_v1.json");

/// Loads the bundled baseline logistic model (demo weights).
pub fn baseline_model(expected: SchemaVersion) -> Result<LoadedRiskModel, ModelLoadError> {
    let artifact = decode(BASELINE_V1_JSON, ArtifactFormat::Json, BASELINE_ARTIFACT_ID)?;
    Ok(LoadedRiskModel::from_artifact(artifact, expected)?)
}

/// Builds the spectrum scorer bound to `expected`.
pub fn spectrum_model(expected: SchemaVersion) -> Result<LoadedRiskModel, ModelLoadError> {
    let schema = FeatureSchema::for_version(expected)?;
    let artifact = ModelArtifact::Spectrum(SpectrumArtifact::for_schema("spectrum-layered", schema));
    Ok(LoadedRiskModel::from_artifact(artifact, expected)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactFormat {
    Json,
    Yaml,
}

impl ArtifactFormat {
    /// Anything without a YAML extension is read as JSON.
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ArtifactFormat::Yaml
            }
            _ => ArtifactFormat::Json,
        }
    }
}

fn decode(content: &str, format: ArtifactFormat, source: &str) -> Result<ModelArtifact, ModelLoadError> {
    let decoded = match format {
        ArtifactFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        ArtifactFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    };
    decoded.map_err(|message| ModelLoadError::Decode {
        path: source.to_string(),
        message,
    })
}

/// Loads artifacts from the filesystem.
#[derive(Debug, Clone, Default)]
pub struct JsonArtifactLoader {
    /// Relative identifiers are resolved against this directory.
    base_path: Option<PathBuf>,
}

impl JsonArtifactLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative identifiers against `base_path`.
    pub fn with_base_path<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: Some(base_path.as_ref().to_path_buf()),
        }
    }

    fn resolve(&self, artifact_id: &str) -> PathBuf {
        let path = Path::new(artifact_id);
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ModelArtifactLoader for JsonArtifactLoader {
    fn load(
        &self,
        artifact_id: &str,
        expected: SchemaVersion,
    ) -> Result<LoadedRiskModel, ModelLoadError> {
        match artifact_id {
            BASELINE_ARTIFACT_ID => return baseline_model(expected),
            SPECTRUM_ARTIFACT_ID => return spectrum_model(expected),
            _ => {}
        }

        let path = self.resolve(artifact_id);
        let shown = path.display().to_string();

        if !path.exists() {
            return Err(ModelLoadError::NotFound(shown));
        }

        let content = fs::read_to_string(&path).map_err(|e| ModelLoadError::Io {
            path: shown.clone(),
            message: e.to_string(),
        })?;

        let artifact = decode(&content, ArtifactFormat::from_path(&path), &shown)?;
        let model = LoadedRiskModel::from_artifact(artifact, expected)?;

        info!(
            path = %shown,
            model_id = %model.metadata().model_id,
            model_version = %model.metadata().model_version,
            kind = model.metadata().kind.as_str(),
            "loaded risk model artifact"
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::{engineer_features, SchemaMismatchError, NORMALIZED_SEVERITY};
    use crate::domain::risk::ModelKind;
    use crate::domain::symptoms::{Demographics, StructuredSymptomRecord};
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn baseline_json() -> serde_json::Value {
        serde_json::from_str(BASELINE_V1_JSON).unwrap()
    }

    #[test]
    fn bundled_baseline_loads_and_scores() {
        let model = baseline_model(SchemaVersion::V1).unwrap();
        assert_eq!(model.metadata().kind, ModelKind::LogisticRegression);
        assert_eq!(model.metadata().feature_count, 32);

        let features =
            engineer_features(&StructuredSymptomRecord::low_confidence(), &Demographics::unknown())
                .unwrap();
        assert!(model.score(&features).unwrap().value() < 0.4);
    }

    #[test]
    fn baseline_identifier_skips_filesystem() {
        let loader = JsonArtifactLoader::with_base_path("/definitely/not/here");
        assert!(loader.load(BASELINE_ARTIFACT_ID, SchemaVersion::V1).is_ok());
    }

    #[test]
    fn spectrum_identifier_builds_layered_scorer() {
        let loader = JsonArtifactLoader::with_base_path("/definitely/not/here");
        let model = loader.load(SPECTRUM_ARTIFACT_ID, SchemaVersion::V1).unwrap();
        assert_eq!(model.metadata().kind, ModelKind::Spectrum);

        let features =
            engineer_features(&StructuredSymptomRecord::low_confidence(), &Demographics::unknown())
                .unwrap();
        assert!(model.score(&features).unwrap().value() < 0.4);
    }

    #[test]
    fn spectrum_artifact_loads_from_yaml() {
        let dir = TempDir::new().unwrap();
        let artifact = ModelArtifact::Spectrum(SpectrumArtifact::for_schema(
            "layered-on-disk",
            FeatureSchema::v1(),
        ));
        let path = write(&dir, "spectrum.yaml", &serde_yaml::to_string(&artifact).unwrap());

        let model = JsonArtifactLoader::new()
            .load(path.to_str().unwrap(), SchemaVersion::V1)
            .unwrap();
        assert_eq!(model.metadata().model_id, "layered-on-disk");
        assert_eq!(model.metadata().kind, ModelKind::Spectrum);
    }

    #[test]
    fn loads_json_from_base_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "model.json", BASELINE_V1_JSON);

        let loader = JsonArtifactLoader::with_base_path(dir.path());
        let model = loader.load("model.json", SchemaVersion::V1).unwrap();
        assert_eq!(model.metadata().model_id, "baseline-logistic");
    }

    #[test]
    fn loads_yaml_by_extension() {
        let dir = TempDir::new().unwrap();
        let yaml = serde_yaml::to_string(&baseline_json()).unwrap();
        let path = write(&dir, "model.yml", &yaml);

        let model = JsonArtifactLoader::new()
            .load(path.to_str().unwrap(), SchemaVersion::V1)
            .unwrap();
        assert_eq!(model.metadata().schema_version, SchemaVersion::V1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let loader = JsonArtifactLoader::with_base_path(dir.path());
        assert!(matches!(
            loader.load("absent.json", SchemaVersion::V1),
            Err(ModelLoadError::NotFound(_))
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.json", "{ not json");
        assert!(matches!(
            JsonArtifactLoader::new().load(path.to_str().unwrap(), SchemaVersion::V1),
            Err(ModelLoadError::Decode { .. })
        ));
    }

    #[test]
    fn reordered_features_are_a_schema_mismatch() {
        let mut json = baseline_json();
        let names = json["feature_names"].as_array_mut().unwrap();
        names.swap(0, 1);
        assert_eq!(names[0], NORMALIZED_SEVERITY);

        let dir = TempDir::new().unwrap();
        let path = write(&dir, "swapped.json", &json.to_string());
        let result = JsonArtifactLoader::new().load(path.to_str().unwrap(), SchemaVersion::V1);

        assert!(matches!(
            result,
            Err(ModelLoadError::SchemaMismatch(
                SchemaMismatchError::FeatureNameMismatch { position: 0, .. }
            ))
        ));
    }

    #[test]
    fn short_coefficients_are_a_schema_mismatch() {
        let mut json = baseline_json();
        json["coefficients"].as_array_mut().unwrap().pop();

        let dir = TempDir::new().unwrap();
        let path = write(&dir, "short.json", &json.to_string());
        let result = JsonArtifactLoader::new().load(path.to_str().unwrap(), SchemaVersion::V1);

        assert!(matches!(
            result,
            Err(ModelLoadError::SchemaMismatch(
                SchemaMismatchError::ParameterLength { .. }
            ))
        ));
    }

    #[test]
    fn requesting_unknown_schema_is_fatal() {
        assert!(matches!(
            baseline_model(SchemaVersion::new(2)),
            Err(ModelLoadError::SchemaMismatch(_))
        ));
    }
}
