use lazy_static::lazy_static;
use regex::Regex;

use super::{porter::PorterStemmer, stopwords};

lazy_static! {
    /// Tokens starting with `http` or `www`, up to the next whitespace
    static ref URL: Regex = Regex::new(r"http\S+|www\S+").expect("valid URL pattern");

    /// `@` followed by one or more word characters
    static ref MENTION: Regex = Regex::new(r"@\w+").expect("valid mention pattern");

    /// Runs of anything that is not an ASCII letter
    static ref NON_ALPHA: Regex = Regex::new(r"[^a-zA-Z]+").expect("valid letter pattern");
}

/// Cleans and stems raw social-media text into the token string the model was trained on.
///
/// The steps run in a fixed order, and changing it changes the output:
///
/// 1. remove URLs (`http...`, `www...`)
/// 2. remove `@mentions`
/// 3. drop the `#` of hashtags, keeping their text
/// 4. replace everything that is not an ASCII letter with a space
/// 5. lowercase and split on whitespace
/// 6. drop English stopwords and tokens of a single letter
/// 7. Porter-stem what is left
/// 8. join with single spaces
///
/// ```
/// use hashtag_sentiment::text::TextNormalizer;
///
/// let normalizer = TextNormalizer::new();
/// assert_eq!(normalizer.normalize("I love this! #great"), "love great");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNormalizer {
    stemmer: PorterStemmer,
}

impl TextNormalizer {
    /// Create a new normalizer
    pub const fn new() -> Self {
        Self {
            stemmer: PorterStemmer::new(),
        }
    }

    /// Normalize one raw text. Never fails; text without any letters yields an empty string.
    pub fn normalize(&self, raw: &str) -> String {
        let text = URL.replace_all(raw, "");
        let text = MENTION.replace_all(&text, "");
        let text = text.replace('#', "");
        let text = NON_ALPHA.replace_all(&text, " ").to_lowercase();

        text.split_whitespace()
            .filter(|token| token.len() > 1 && !stopwords::is_stopword(token))
            .map(|token| self.stemmer.stem(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
