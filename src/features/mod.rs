/// Feature vectors
pub mod vector;

/// TF-IDF encoding against a pretrained vocabulary
pub mod vectorizer;

pub use vector::FeatureVector;
pub use vectorizer::{Norm, TfidfVectorizer, VectorizerConfig};
