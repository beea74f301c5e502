use burn::tensor::backend::Backend;

use crate::{
    artifacts::{Artifacts, ConfigurationError, ModelStore},
    features::TfidfVectorizer,
    models::LinearClassifier,
    text::TextNormalizer,
};

use super::{PipelineError, PredictionResult, RawText};

/// Text in, labels out: normalize, encode, classify.
///
/// Built once from pretrained artifacts and never mutated afterwards, so a single instance can
/// be shared behind an `Arc` by every request.
#[derive(Debug)]
pub struct InferencePipeline<B: Backend> {
    normalizer: TextNormalizer,
    vectorizer: TfidfVectorizer,
    classifier: LinearClassifier<B>,
}

impl<B: Backend> InferencePipeline<B> {
    /// Pair a vectorizer with a classifier trained on the same vocabulary
    pub fn new(
        vectorizer: TfidfVectorizer,
        classifier: LinearClassifier<B>,
    ) -> Result<Self, ConfigurationError> {
        if vectorizer.dim() != classifier.dim() {
            return Err(ConfigurationError::DimensionMismatch {
                vectorizer: vectorizer.dim(),
                other: "classifier weights",
                found: classifier.dim(),
            });
        }

        Ok(Self {
            normalizer: TextNormalizer::new(),
            vectorizer,
            classifier,
        })
    }

    /// Validate loaded artifacts and build the pipeline on the given device
    pub fn from_artifacts(
        artifacts: &Artifacts,
        device: &B::Device,
    ) -> Result<Self, ConfigurationError> {
        let vectorizer = artifacts.vocabulary.init()?;
        let classifier = artifacts.model.init::<B>(device)?;

        Self::new(vectorizer, classifier)
    }

    /// Load the artifacts from a store and build the pipeline
    pub fn from_store<S: ModelStore + ?Sized>(
        store: &S,
        device: &B::Device,
    ) -> Result<Self, ConfigurationError> {
        let artifacts = store.load()?;

        let pipeline = Self::from_artifacts(&artifacts, device)?;

        log::info!(
            "Inference pipeline ready with {} features",
            pipeline.vectorizer.dim()
        );

        Ok(pipeline)
    }

    /// The text normalizer
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// The feature encoder
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// The classifier
    pub fn classifier(&self) -> &LinearClassifier<B> {
        &self.classifier
    }

    /// Classify a single text
    pub fn classify(&self, text: &str) -> PredictionResult {
        let cleaned_text = self.normalizer.normalize(text);
        let features = self.vectorizer.encode(&cleaned_text);
        let sentiment = self.classifier.predict(&features);

        PredictionResult::new(text.to_string(), sentiment, cleaned_text)
    }

    /// Classify a batch, preserving order.
    ///
    /// The whole batch fails on the first text that is not valid UTF-8; no partial results are
    /// returned.
    pub fn classify_batch(&self, texts: &[RawText]) -> Result<Vec<PredictionResult>, PipelineError> {
        let tweets = texts
            .iter()
            .enumerate()
            .map(|(index, text)| {
                text.to_str().map_err(|e| PipelineError::InvalidText {
                    index,
                    valid_up_to: e.valid_up_to(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cleaned = tweets
            .iter()
            .map(|tweet| self.normalizer.normalize(tweet))
            .collect::<Vec<_>>();

        let features = cleaned
            .iter()
            .map(|text| self.vectorizer.encode(text))
            .collect::<Vec<_>>();

        let labels = self.classifier.predict_batch(&features);

        log::debug!("Classified a batch of {} texts", labels.len());

        Ok(tweets
            .into_iter()
            .zip(cleaned)
            .zip(labels)
            .map(|((tweet, cleaned_text), sentiment)| {
                PredictionResult::new(tweet.to_string(), sentiment, cleaned_text)
            })
            .collect())
    }
}
