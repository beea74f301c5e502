use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::artifacts::ConfigurationError;

use super::FeatureVector;

/// scikit-learn's default token pattern: two or more word characters
pub static DEFAULT_TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Row normalization applied after term weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Divide by the sum of absolute values
    L1,

    /// Divide by the Euclidean length
    L2,

    /// Leave the weights as they are
    #[serde(rename = "none")]
    Identity,
}

/// The pretrained TF-IDF vocabulary, as exported from the training run
#[derive(burn::config::Config, Debug)]
pub struct VectorizerConfig {
    /// Maps each term (or space-joined n-gram) to its feature column
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per feature column
    pub idf: Vec<f32>,

    /// Row normalization
    #[config(default = "Norm::L2")]
    pub norm: Norm,

    /// Whether term counts are weighted by `idf`
    #[config(default = true)]
    pub use_idf: bool,

    /// Replace term counts with `1 + ln(count)`
    #[config(default = false)]
    pub sublinear_tf: bool,

    /// Clip term counts to 1
    #[config(default = false)]
    pub binary: bool,

    /// Smallest n-gram size
    #[config(default = 1)]
    pub ngram_min: usize,

    /// Largest n-gram size
    #[config(default = 1)]
    pub ngram_max: usize,

    /// The regex tokens are extracted with
    #[config(default = "DEFAULT_TOKEN_PATTERN.to_string()")]
    pub token_pattern: String,
}

impl VectorizerConfig {
    /// The number of feature columns
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    /// Validate the vocabulary and build the encoder
    pub fn init(&self) -> Result<TfidfVectorizer, ConfigurationError> {
        let dim = self.dim();

        if dim == 0 {
            return Err(ConfigurationError::EmptyVocabulary);
        }

        if self.ngram_min == 0 || self.ngram_min > self.ngram_max {
            return Err(ConfigurationError::NgramRange {
                min: self.ngram_min,
                max: self.ngram_max,
            });
        }

        let mut assigned = vec![false; dim];

        for (term, &index) in &self.vocabulary {
            if index >= dim {
                return Err(ConfigurationError::IndexOutOfRange {
                    term: term.clone(),
                    index,
                    dim,
                });
            }

            if assigned[index] {
                return Err(ConfigurationError::DuplicateIndex(index));
            }

            assigned[index] = true;
        }

        let idf = if self.use_idf {
            if self.idf.len() != dim {
                return Err(ConfigurationError::DimensionMismatch {
                    vectorizer: dim,
                    other: "idf weights",
                    found: self.idf.len(),
                });
            }

            if self.idf.iter().any(|weight| !weight.is_finite()) {
                return Err(ConfigurationError::NonFinite("idf weights"));
            }

            Some(self.idf.clone())
        } else {
            None
        };

        let token_pattern = Regex::new(&self.token_pattern)?;

        Ok(TfidfVectorizer {
            vocabulary: self.vocabulary.clone(),
            idf,
            norm: self.norm,
            sublinear_tf: self.sublinear_tf,
            binary: self.binary,
            ngram_range: (self.ngram_min, self.ngram_max),
            token_pattern,
        })
    }
}

/// Encodes normalized text into TF-IDF feature vectors.
///
/// Mirrors scikit-learn's `TfidfVectorizer.transform` for a single document: lowercase, extract
/// tokens with the token pattern, count in-vocabulary n-grams, optionally clip or dampen the
/// counts, weight by idf and normalize the row.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f32>>,
    norm: Norm,
    sublinear_tf: bool,
    binary: bool,
    ngram_range: (usize, usize),
    token_pattern: Regex,
}

impl TfidfVectorizer {
    /// The number of feature columns
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    /// The feature column of a term, if it is in the vocabulary
    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Encode one document. Out-of-vocabulary terms are ignored, so this never fails; empty text
    /// gives the all-zero vector.
    pub fn encode(&self, text: &str) -> FeatureVector {
        let text = text.to_lowercase();
        let tokens = self
            .token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .collect::<Vec<_>>();

        let mut values = vec![0.0f32; self.dim()];

        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let column = if n == 1 {
                    self.column(window[0])
                } else {
                    self.column(&window.join(" "))
                };

                if let Some(column) = column {
                    values[column] += 1.0;
                }
            }
        }

        for value in values.iter_mut().filter(|value| **value > 0.0) {
            if self.binary {
                *value = 1.0;
            }

            if self.sublinear_tf {
                *value = 1.0 + value.ln();
            }
        }

        if let Some(idf) = &self.idf {
            for (value, weight) in values.iter_mut().zip(idf) {
                *value *= weight;
            }
        }

        let norm = match self.norm {
            Norm::L1 => values.iter().map(|value| value.abs()).sum::<f32>(),
            Norm::L2 => values.iter().map(|value| value * value).sum::<f32>().sqrt(),
            Norm::Identity => 1.0,
        };

        if norm > 0.0 && norm != 1.0 {
            for value in &mut values {
                *value /= norm;
            }
        }

        values.into()
    }
}
