use serde::Serialize;

use crate::models::Label;

/// Predictions scored against known labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// Positive texts predicted positive
    pub true_positive: usize,
    /// Negative texts predicted positive
    pub false_positive: usize,
    /// Negative texts predicted negative
    pub true_negative: usize,
    /// Positive texts predicted negative
    pub false_negative: usize,
}

impl Evaluation {
    /// Score `(expected, predicted)` pairs
    pub fn new(pairs: impl IntoIterator<Item = (Label, Label)>) -> Self {
        let mut evaluation = Self::default();

        for (expected, predicted) in pairs {
            evaluation.record(expected, predicted);
        }

        evaluation
    }

    /// Count one prediction
    pub fn record(&mut self, expected: Label, predicted: Label) {
        match (expected, predicted) {
            (Label::Positive, Label::Positive) => self.true_positive += 1,
            (Label::Negative, Label::Positive) => self.false_positive += 1,
            (Label::Negative, Label::Negative) => self.true_negative += 1,
            (Label::Positive, Label::Negative) => self.false_negative += 1,
        }
    }

    /// Number of scored predictions
    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Share of correct predictions, undefined without any
    pub fn accuracy(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some((self.true_positive + self.true_negative) as f64 / total as f64),
        }
    }

    /// Share of positive predictions that were right
    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// Share of positive texts that were found
    pub fn recall(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// The confusion matrix, rows by expected and columns by predicted label, negative first
    pub fn confusion(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn scores_predictions() {
        let evaluation = Evaluation::new([
            (Label::Positive, Label::Positive),
            (Label::Positive, Label::Negative),
            (Label::Negative, Label::Negative),
            (Label::Negative, Label::Negative),
            (Label::Negative, Label::Positive),
        ]);

        assert_eq!(evaluation.total(), 5);
        assert_eq!(evaluation.accuracy(), Some(0.6));
        assert_eq!(evaluation.precision(), Some(0.5));
        assert_eq!(evaluation.recall(), Some(0.5));
        assert_eq!(evaluation.confusion(), [[2, 1], [1, 1]]);
    }

    #[test]
    fn empty_evaluation_has_no_scores() {
        let evaluation = Evaluation::default();

        assert_eq!(evaluation.accuracy(), None);
        assert_eq!(evaluation.precision(), None);
        assert_eq!(evaluation.recall(), None);
    }
}
