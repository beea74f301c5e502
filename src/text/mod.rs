/// Raw text cleaning
pub mod normalizer;

/// Porter stemming
pub mod porter;

/// The English stopword list
pub mod stopwords;

pub use normalizer::TextNormalizer;
pub use porter::PorterStemmer;
