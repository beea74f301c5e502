use std::path::{Path, PathBuf};

use burn::config::Config;

use crate::config::AppConfig;

use super::{Artifacts, ConfigurationError, ModelStore, MODEL_FILE, VECTORIZER_FILE};

/// Loads `model.json` and `vectorizer.json` exported by the training run
#[derive(Debug, Clone)]
pub struct JsonModelStore {
    model_path: PathBuf,
    vectorizer_path: PathBuf,
}

impl JsonModelStore {
    /// A store reading the default file names from `artifact_dir`
    pub fn new(artifact_dir: impl AsRef<Path>) -> Self {
        let artifact_dir = artifact_dir.as_ref();

        Self::with_paths(
            artifact_dir.join(MODEL_FILE),
            artifact_dir.join(VECTORIZER_FILE),
        )
    }

    /// A store reading the two given files
    pub fn with_paths(model_path: impl Into<PathBuf>, vectorizer_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            vectorizer_path: vectorizer_path.into(),
        }
    }

    /// A store for the artifact locations in the app config
    pub fn from_config(config: &AppConfig) -> Self {
        let artifact_dir = Path::new(&config.artifact_dir);

        Self::with_paths(
            artifact_dir.join(&config.model_file),
            artifact_dir.join(&config.vectorizer_file),
        )
    }
}

impl ModelStore for JsonModelStore {
    fn load(&self) -> Result<Artifacts, ConfigurationError> {
        let model = load_config(&self.model_path)?;
        let vocabulary = load_config(&self.vectorizer_path)?;

        log::info!(
            "Loaded artifacts from {} and {}",
            self.model_path.display(),
            self.vectorizer_path.display()
        );

        Ok(Artifacts::new(model, vocabulary))
    }
}

fn load_config<C: Config>(path: &Path) -> Result<C, ConfigurationError> {
    if !path.is_file() {
        return Err(ConfigurationError::Missing(path.to_path_buf()));
    }

    C::load(path).map_err(|e| ConfigurationError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "hashtag-sentiment-store-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("create scratch dir");

        dir
    }

    #[test]
    fn loads_both_artifacts() {
        let dir = scratch_dir("load");
        fs::write(
            dir.join(MODEL_FILE),
            r#"{"coef": [1.5, -2.0], "intercept": 0.25}"#,
        )
        .expect("write model");
        fs::write(
            dir.join(VECTORIZER_FILE),
            r#"{"vocabulary": {"love": 0, "hate": 1}, "idf": [1.0, 1.2], "norm": "l2"}"#,
        )
        .expect("write vectorizer");

        let artifacts = JsonModelStore::new(&dir).load().expect("artifacts load");

        assert_eq!(artifacts.model.coef, vec![1.5, -2.0]);
        assert_eq!(artifacts.model.intercept, 0.25);
        assert_eq!(artifacts.model.classes, vec![0, 1]);
        assert_eq!(artifacts.vocabulary.dim(), 2);
        assert_eq!(artifacts.vocabulary.vocabulary["hate"], 1);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_files_are_reported_by_path() {
        let dir = scratch_dir("missing");

        let result = JsonModelStore::new(&dir).load();

        match result {
            Err(ConfigurationError::Missing(path)) => assert_eq!(path, dir.join(MODEL_FILE)),
            other => panic!("expected a missing artifact, got {other:?}"),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn corrupt_json_is_invalid() {
        let dir = scratch_dir("corrupt");
        fs::write(dir.join(MODEL_FILE), "{ not json").expect("write model");

        let result = JsonModelStore::new(&dir).load();

        assert!(matches!(result, Err(ConfigurationError::Invalid { .. })));

        fs::remove_dir_all(dir).ok();
    }
}
