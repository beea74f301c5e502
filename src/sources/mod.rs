use std::{path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{config::AppConfig, pipelines::RawText};

/// The recent-search API
pub mod live;

/// The labelled sample corpus
pub mod fallback;

pub use fallback::{Corpus, FallbackSource, LabelledText};
pub use live::LiveSource;

/// Where texts for a hashtag come from
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Fetch raw texts mentioning `#hashtag`. The hashtag is passed without its leading `#`.
    async fn fetch(&self, hashtag: &str) -> Result<Vec<RawText>, UpstreamError>;

    /// A short name for logs
    fn name(&self) -> &str;
}

/// Available Sources
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SourceKind {
    /// Live when a bearer token is configured, otherwise the fallback corpus
    Auto,

    /// The recent-search API
    Live,

    /// The labelled sample corpus
    Fallback,
}

impl SourceKind {
    /// Get the unique string token that identifies this source
    pub fn as_str(&self) -> &str {
        match self {
            SourceKind::Auto => "auto",
            SourceKind::Live => "live",
            SourceKind::Fallback => "fallback",
        }
    }
}

impl TryFrom<&str> for SourceKind {
    type Error = SourceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Ok(SourceKind::Auto),
            "live" => Ok(SourceKind::Live),
            "fallback" => Ok(SourceKind::Fallback),
            _ => Err(SourceError::Unknown(value.to_string())),
        }
    }
}

impl TryFrom<String> for SourceKind {
    type Error = SourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SourceKind::try_from(value.as_str())
    }
}

/// Build the source selected in the app config
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn TextSource>, SourceError> {
    let source: Arc<dyn TextSource> = match SourceKind::try_from(config.source.as_str())? {
        SourceKind::Live => Arc::new(LiveSource::from_config(config)?),
        SourceKind::Fallback => Arc::new(FallbackSource::from_config(config)),
        SourceKind::Auto => {
            if config.bearer_token().is_some() {
                Arc::new(LiveSource::from_config(config)?)
            } else {
                log::warn!(
                    "No bearer token is set, serving texts from the sample corpus at {}",
                    config.fallback_corpus
                );

                Arc::new(FallbackSource::from_config(config))
            }
        }
    };

    log::info!("Using the {} text source", source.name());

    Ok(source)
}

/// Upstream Error, raised while fetching texts for a request
#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    /// The search API could not be reached or returned an unreadable body
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The search API answered with an error status
    #[error("search API returned {status}: {detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// The API's error detail
        detail: String,
    },

    /// The sample corpus could not be read
    #[error("unable to read the sample corpus at {}: {source}", .path.display())]
    Corpus {
        /// Corpus path
        path: PathBuf,
        /// The I/O failure
        source: std::io::Error,
    },

    /// The fetch did not finish in time
    #[error("fetching texts timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Source Error, raised while building a source
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// No source found for the given string
    #[error("no text source found for {0}")]
    Unknown(String),

    /// The live source needs a bearer token
    #[error("the live source requires a bearer token")]
    MissingToken,

    /// The bearer token cannot be sent as a header
    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    /// The search endpoint is not a valid URL
    #[error("invalid search endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The HTTP client could not be built
    #[error("unable to build the HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_source_kinds() {
        assert_eq!(SourceKind::try_from("auto").unwrap(), SourceKind::Auto);
        assert_eq!(SourceKind::try_from(" Live ").unwrap(), SourceKind::Live);
        assert_eq!(
            SourceKind::try_from("fallback".to_string()).unwrap(),
            SourceKind::Fallback
        );
        for kind in [SourceKind::Auto, SourceKind::Live, SourceKind::Fallback] {
            assert_eq!(SourceKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(matches!(
            SourceKind::try_from("firehose"),
            Err(SourceError::Unknown(_))
        ));
    }

    #[test]
    fn auto_without_a_token_uses_the_corpus() {
        let source = from_config(&AppConfig::new()).expect("source builds");

        assert_eq!(source.name(), "fallback");
    }

    #[test]
    fn auto_with_a_token_goes_live() {
        let config = AppConfig::new().with_bearer_token("abc123".to_string());

        let source = from_config(&config).expect("source builds");

        assert_eq!(source.name(), "live");
    }

    #[test]
    fn live_without_a_token_is_an_error() {
        let config = AppConfig::new().with_source("live".to_string());

        assert!(matches!(
            from_config(&config),
            Err(SourceError::MissingToken)
        ));
    }
}
