use std::{borrow::Cow, fmt};

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::models::Label;

/// Raw social-media text as delivered by a source. The bytes are not guaranteed to be UTF-8.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct RawText(Vec<u8>);

impl RawText {
    /// The raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Borrow the text as UTF-8
    pub fn to_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.0)
    }

    /// The text with invalid sequences replaced, for display only
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl fmt::Debug for RawText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawText({:?})", self.to_string_lossy())
    }
}

impl From<String> for RawText {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl From<&str> for RawText {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for RawText {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// One classified text, as returned to clients
#[derive(new, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The original text
    pub tweet: String,

    /// The predicted label
    pub sentiment: Label,

    /// The normalized text the label was predicted from
    pub cleaned_text: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn serializes_with_client_field_names() {
        let result = PredictionResult::new(
            "I love this! #great".to_string(),
            Label::Positive,
            "love great".to_string(),
        );

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "tweet": "I love this! #great",
                "sentiment": "Positive",
                "cleaned_text": "love great",
            })
        );
    }

    #[test]
    fn raw_text_keeps_invalid_bytes() {
        let text = RawText::from(vec![b'o', b'k', 0xff]);

        assert_eq!(text.as_bytes(), &[b'o', b'k', 0xff]);
        assert!(text.to_str().is_err());
        assert_eq!(text.to_string_lossy(), "ok\u{fffd}");
    }
}
