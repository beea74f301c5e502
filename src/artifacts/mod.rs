use std::path::PathBuf;

use derive_new::new;

use crate::{features::VectorizerConfig, models::ClassifierConfig};

/// Artifact stores
pub mod store;

pub use store::JsonModelStore;

/// Default file name of the classifier artifact
pub static MODEL_FILE: &str = "model.json";

/// Default file name of the vectorizer artifact
pub static VECTORIZER_FILE: &str = "vectorizer.json";

/// The pretrained classifier together with the vocabulary it was trained against
#[derive(new, Debug, Clone)]
pub struct Artifacts {
    /// Linear classifier weights
    pub model: ClassifierConfig,

    /// TF-IDF vocabulary
    pub vocabulary: VectorizerConfig,
}

/// A source of pretrained artifacts
pub trait ModelStore {
    /// Load both artifacts
    fn load(&self) -> Result<Artifacts, ConfigurationError>;
}

/// Artifacts already in memory act as their own store
impl ModelStore for Artifacts {
    fn load(&self) -> Result<Artifacts, ConfigurationError> {
        Ok(self.clone())
    }
}

/// Configuration Error
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    /// An artifact file does not exist
    #[error("artifact not found at {}", .0.display())]
    Missing(PathBuf),

    /// An artifact file could not be read or parsed
    #[error("unable to load artifact {}: {reason}", .path.display())]
    Invalid {
        /// The artifact path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// The vocabulary has no terms
    #[error("the vocabulary is empty")]
    EmptyVocabulary,

    /// Some weight vector does not match the vocabulary size
    #[error("vocabulary has {vectorizer} columns but {other} has {found}")]
    DimensionMismatch {
        /// Vocabulary size
        vectorizer: usize,
        /// The mismatched weights
        other: &'static str,
        /// Their length
        found: usize,
    },

    /// A vocabulary term points past the last column
    #[error("term {term:?} maps to column {index}, but there are only {dim} columns")]
    IndexOutOfRange {
        /// The term
        term: String,
        /// Its column
        index: usize,
        /// Vocabulary size
        dim: usize,
    },

    /// Two vocabulary terms share a column
    #[error("column {0} is assigned to more than one term")]
    DuplicateIndex(usize),

    /// The classifier is not binary
    #[error("expected exactly 2 classes, found {0}")]
    Classes(usize),

    /// Weights contain NaN or infinity
    #[error("{0} contain non-finite values")]
    NonFinite(&'static str),

    /// An n-gram range that is empty or starts at zero
    #[error("invalid n-gram range ({min}, {max})")]
    NgramRange {
        /// Smallest n-gram size
        min: usize,
        /// Largest n-gram size
        max: usize,
    },

    /// The token pattern does not compile
    #[error("invalid token pattern: {0}")]
    TokenPattern(#[from] regex::Error),
}
