use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{models::Label, pipelines::PredictionResult};

/// How many terms the most-common-words view keeps
pub const TOP_TERMS: usize = 20;

/// Summary statistics of one numeric column, with pandas `describe()` semantics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation, undefined for fewer than two values
    pub std: Option<f64>,
    /// Smallest value
    pub min: f64,
    /// First quartile
    pub q25: f64,
    /// Median
    pub q50: f64,
    /// Third quartile
    pub q75: f64,
    /// Largest value
    pub max: f64,
}

impl Summary {
    /// Describe a column; `None` when it is empty
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let squares = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>();

            (squares / (count - 1) as f64).sqrt()
        });

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linearly interpolated quantile of sorted, non-empty values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;

    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// Mean word and character counts of one sentiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentMeans {
    /// The sentiment
    pub sentiment: Label,
    /// Number of texts with it
    pub count: usize,
    /// Mean words in the cleaned text
    pub word_count: f64,
    /// Mean characters in the original text
    pub char_count: f64,
}

/// One analyzed text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// The original text
    pub tweet: String,
    /// Its predicted sentiment
    pub sentiment: Label,
    /// Words in the cleaned text
    pub word_count: usize,
    /// Characters in the original text
    pub char_count: usize,
}

/// Exploratory statistics over the classified texts of one hashtag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    /// The hashtag, without `#`
    pub hashtag: String,
    /// Number of texts
    pub total: usize,
    /// Texts predicted positive
    pub positive: usize,
    /// Texts predicted negative
    pub negative: usize,
    /// Table 1: word counts of the cleaned texts
    pub word_count: Option<Summary>,
    /// Table 1: character counts of the original texts
    pub char_count: Option<Summary>,
    /// Table 2: means per sentiment, ordered by sentiment name
    pub by_sentiment: Vec<SentimentMeans>,
    /// `(word count, texts)` sorted by word count
    pub word_count_distribution: Vec<(usize, usize)>,
    /// `(character count, texts)` sorted by character count
    pub char_count_distribution: Vec<(usize, usize)>,
    /// The most common cleaned terms, most frequent first
    pub top_terms: Vec<(String, usize)>,
    /// Per-text rows, in input order
    pub rows: Vec<ReportRow>,
}

impl SentimentReport {
    /// Compute the report for one hashtag's results
    pub fn new(hashtag: &str, results: &[PredictionResult]) -> Self {
        let rows = results
            .iter()
            .map(|result| ReportRow {
                tweet: result.tweet.clone(),
                sentiment: result.sentiment,
                word_count: result.cleaned_text.split_whitespace().count(),
                char_count: result.tweet.chars().count(),
            })
            .collect::<Vec<_>>();

        let positive = rows
            .iter()
            .filter(|row| row.sentiment == Label::Positive)
            .count();

        let words = rows.iter().map(|row| row.word_count as f64).collect::<Vec<_>>();
        let chars = rows.iter().map(|row| row.char_count as f64).collect::<Vec<_>>();

        Self {
            hashtag: hashtag.to_string(),
            total: rows.len(),
            positive,
            negative: rows.len() - positive,
            word_count: Summary::of(&words),
            char_count: Summary::of(&chars),
            by_sentiment: by_sentiment(&rows),
            word_count_distribution: value_counts(rows.iter().map(|row| row.word_count)),
            char_count_distribution: value_counts(rows.iter().map(|row| row.char_count)),
            top_terms: top_terms(results, TOP_TERMS),
            rows,
        }
    }
}

fn by_sentiment(rows: &[ReportRow]) -> Vec<SentimentMeans> {
    let mut groups: BTreeMap<&str, (Label, Vec<&ReportRow>)> = BTreeMap::new();

    for row in rows {
        groups
            .entry(row.sentiment.as_str())
            .or_insert_with(|| (row.sentiment, Vec::new()))
            .1
            .push(row);
    }

    groups
        .into_values()
        .map(|(sentiment, rows)| {
            let count = rows.len();
            let mean = |value: fn(&ReportRow) -> usize| {
                rows.iter().map(|row| value(row) as f64).sum::<f64>() / count as f64
            };

            SentimentMeans {
                sentiment,
                count,
                word_count: mean(|row| row.word_count),
                char_count: mean(|row| row.char_count),
            }
        })
        .collect()
}

fn value_counts(values: impl Iterator<Item = usize>) -> Vec<(usize, usize)> {
    let mut counts = BTreeMap::new();

    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts.into_iter().collect()
}

fn top_terms(results: &[PredictionResult], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for term in results
        .iter()
        .flat_map(|result| result.cleaned_text.split_whitespace())
    {
        *counts.entry(term).or_insert(0) += 1;
    }

    let mut terms = counts
        .into_iter()
        .map(|(term, count)| (term.to_string(), count))
        .collect::<Vec<_>>();

    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms.truncate(limit);

    terms
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn result(tweet: &str, sentiment: Label, cleaned_text: &str) -> PredictionResult {
        PredictionResult::new(tweet.to_string(), sentiment, cleaned_text.to_string())
    }

    fn sample() -> Vec<PredictionResult> {
        vec![
            result("love it", Label::Positive, "love great"),
            result("meh", Label::Negative, ""),
            result("awful awful day", Label::Negative, "aw aw day"),
            result("café", Label::Positive, "love"),
        ]
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_matches_pandas() {
        let summary = Summary::of(&[2.0, 0.0, 3.0, 1.0]).expect("non-empty");

        assert_eq!(summary.count, 4);
        assert!(close(summary.mean, 1.5));
        assert!(close(summary.std.expect("sample std"), (5.0f64 / 3.0).sqrt()));
        assert!(close(summary.min, 0.0));
        assert!(close(summary.q25, 0.75));
        assert!(close(summary.q50, 1.5));
        assert!(close(summary.q75, 2.25));
        assert!(close(summary.max, 3.0));
    }

    #[test]
    fn describe_edge_cases() {
        assert_eq!(Summary::of(&[]), None);

        let single = Summary::of(&[4.0]).expect("non-empty");
        assert_eq!(single.std, None);
        assert!(close(single.q25, 4.0));
        assert!(close(single.q75, 4.0));
    }

    #[test]
    fn counts_and_rows() {
        let report = SentimentReport::new("rust", &sample());

        assert_eq!(report.total, 4);
        assert_eq!(report.positive, 2);
        assert_eq!(report.negative, 2);
        assert_eq!(
            report
                .rows
                .iter()
                .map(|row| (row.word_count, row.char_count))
                .collect::<Vec<_>>(),
            vec![(2, 7), (0, 3), (3, 15), (1, 4)]
        );
    }

    #[test]
    fn means_by_sentiment_are_ordered_by_name() {
        let report = SentimentReport::new("rust", &sample());

        let means = report
            .by_sentiment
            .iter()
            .map(|m| (m.sentiment, m.count, m.word_count, m.char_count))
            .collect::<Vec<_>>();

        assert_eq!(
            means,
            vec![
                (Label::Negative, 2, 1.5, 9.0),
                (Label::Positive, 2, 1.5, 5.5),
            ]
        );
    }

    #[test]
    fn distributions_are_sorted_by_value() {
        let report = SentimentReport::new("rust", &sample());

        assert_eq!(
            report.word_count_distribution,
            vec![(0, 1), (1, 1), (2, 1), (3, 1)]
        );
        assert_eq!(
            report.char_count_distribution,
            vec![(3, 1), (4, 1), (7, 1), (15, 1)]
        );
    }

    #[test]
    fn top_terms_by_frequency_then_name() {
        let report = SentimentReport::new("rust", &sample());

        assert_eq!(
            report.top_terms,
            vec![
                ("aw".to_string(), 2),
                ("love".to_string(), 2),
                ("day".to_string(), 1),
                ("great".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_results() {
        let report = SentimentReport::new("rust", &[]);

        assert_eq!(report.total, 0);
        assert_eq!(report.word_count, None);
        assert!(report.by_sentiment.is_empty());
        assert!(report.top_terms.is_empty());
    }
}
