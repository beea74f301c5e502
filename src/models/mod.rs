/// Sentiment labels
pub mod label;

/// Linear classification over TF-IDF features
pub mod linear;

pub use label::Label;
pub use linear::{ClassifierConfig, LinearClassifier};
