use std::path::{Path, PathBuf};

use async_trait::async_trait;
use derive_new::new;
use lazy_static::lazy_static;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use regex::bytes::{NoExpand, Regex};

use crate::{config::AppConfig, models::Label, pipelines::RawText, utils::files};

use super::{TextSource, UpstreamError};

lazy_static! {
    /// The literal placeholder corpus lines use for the requested hashtag
    static ref PLACEHOLDER: Regex = Regex::new(r"#\{hashtag\}").expect("valid placeholder pattern");
}

static POSITIVE_PREFIX: &[u8] = b"POS:";
static NEGATIVE_PREFIX: &[u8] = b"NEG:";

/// A sample text with its known sentiment
#[derive(new, Debug, Clone, PartialEq)]
pub struct LabelledText {
    /// The text
    pub text: RawText,

    /// The sentiment it was written with
    pub expected: Label,
}

/// The labelled sample corpus.
///
/// Each useful line starts with `POS:` or `NEG:`; every other line is ignored. Lines may
/// contain `#{hashtag}`, which is replaced with the requested hashtag.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<LabelledText>,
}

impl Corpus {
    /// Parse corpus lines
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let entries = lines
            .into_iter()
            .filter_map(|line| parse_line(line.as_ref()))
            .collect();

        Self { entries }
    }

    /// Read and parse a corpus file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, UpstreamError> {
        let path = path.as_ref();

        let lines = files::read_lines(path)
            .await
            .map_err(|source| UpstreamError::Corpus {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::from_lines(lines))
    }

    /// The labelled entries, placeholders untouched
    pub fn entries(&self) -> &[LabelledText] {
        &self.entries
    }

    /// Number of labelled entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the corpus has no labelled entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries with the placeholder replaced by `#hashtag`, in file order
    pub fn for_hashtag(&self, hashtag: &str) -> Vec<LabelledText> {
        let replacement = format!("#{hashtag}");

        self.entries
            .iter()
            .map(|entry| {
                let text = PLACEHOLDER
                    .replace_all(entry.text.as_bytes(), NoExpand(replacement.as_bytes()))
                    .into_owned();

                LabelledText::new(text.into(), entry.expected)
            })
            .collect()
    }
}

fn parse_line(line: &[u8]) -> Option<LabelledText> {
    let (expected, rest) = if let Some(rest) = line.strip_prefix(POSITIVE_PREFIX) {
        (Label::Positive, rest)
    } else if let Some(rest) = line.strip_prefix(NEGATIVE_PREFIX) {
        (Label::Negative, rest)
    } else {
        return None;
    };

    let start = rest
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(rest.len());

    Some(LabelledText::new(rest[start..].to_vec().into(), expected))
}

/// Serves shuffled texts from the labelled sample corpus, for running without API access
#[derive(Debug, Clone)]
pub struct FallbackSource {
    path: PathBuf,
    limit: usize,
    seed: Option<u64>,
}

impl FallbackSource {
    /// A source reading `path` and returning at most `limit` texts per fetch
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
            seed: None,
        }
    }

    /// Shuffle with a fixed seed, so fetches are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the fallback source described by the app config
    pub fn from_config(config: &AppConfig) -> Self {
        let source = Self::new(&config.fallback_corpus, config.fallback_limit);

        match config.fallback_seed {
            Some(seed) => source.with_seed(seed),
            None => source,
        }
    }
}

#[async_trait]
impl TextSource for FallbackSource {
    async fn fetch(&self, hashtag: &str) -> Result<Vec<RawText>, UpstreamError> {
        log::info!("Serving sample texts for #{hashtag}");

        let corpus = Corpus::load(&self.path).await?;

        let mut texts = corpus
            .for_hashtag(hashtag)
            .into_iter()
            .map(|entry| entry.text)
            .collect::<Vec<_>>();

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        texts.shuffle(&mut rng);
        texts.truncate(self.limit);

        Ok(texts)
    }

    fn name(&self) -> &str {
        "fallback"
    }
}
