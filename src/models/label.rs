use std::fmt;

use serde::{Deserialize, Serialize};

/// The class id the classifier uses for positive text
pub const POSITIVE_CLASS: i64 = 1;

/// Sentiment Label
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Positive sentiment
    Positive,

    /// Negative sentiment
    Negative,
}

impl Label {
    /// Map a classifier class id to a label. Only class `1` is positive.
    pub fn from_class(class: i64) -> Self {
        if class == POSITIVE_CLASS {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Get the string shown to clients for this label
    pub fn as_str(&self) -> &str {
        match self {
            Label::Positive => "Positive",
            Label::Negative => "Negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn only_class_one_is_positive() {
        assert_eq!(Label::from_class(1), Label::Positive);
        assert_eq!(Label::from_class(0), Label::Negative);
        assert_eq!(Label::from_class(-1), Label::Negative);
        assert_eq!(Label::from_class(4), Label::Negative);
    }

    #[test]
    fn serializes_as_its_name() {
        assert_eq!(
            serde_json::to_string(&Label::Positive).unwrap(),
            r#""Positive""#
        );
        assert_eq!(
            serde_json::from_str::<Label>(r#""Negative""#).unwrap(),
            Label::Negative
        );
        assert_eq!(Label::Negative.to_string(), "Negative");
    }
}
