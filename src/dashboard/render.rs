use serde::Serialize;

use crate::models::Label;

use super::{Evaluation, SentimentReport, Summary};

/// Width of the longest bar in text charts
const BAR_WIDTH: usize = 40;

/// Longest original text shown in the data table
const TWEET_WIDTH: usize = 60;

static REPORT_TEMPLATE: &str = "\
Sentiment report for #{{ hashtag }}
{{ rule }}

Total texts:     {{ total }}
Positive texts:  {{ positive }}
Negative texts:  {{ negative }}

Sentiment chart
{% for bar in sentiment_chart %}  {{ bar }}
{% endfor %}
Table 1: Text statistics
{% for line in statistics %}  {{ line }}
{% endfor %}
Table 2: Average statistics by sentiment
{% for line in averages %}  {{ line }}
{% endfor %}
Word count distribution (cleaned text)
{% for bar in word_chart %}  {{ bar }}
{% endfor %}
Character count distribution (original text)
{% for bar in char_chart %}  {{ bar }}
{% endfor %}
Most common words
{% for bar in term_chart %}  {{ bar }}
{% endfor %}
Analyzed texts
{% for line in rows %}  {{ line }}
{% endfor %}";

static EVALUATION_TEMPLATE: &str = "\
Evaluated {{ total }} labelled texts
Accuracy:   {{ accuracy }}
Precision:  {{ precision }}
Recall:     {{ recall }}

                   predicted Negative  predicted Positive
expected Negative  {{ tn }}  {{ fp }}
expected Positive  {{ fn }}  {{ tp }}
";

#[derive(Serialize)]
struct ReportView {
    hashtag: String,
    rule: String,
    total: usize,
    positive: usize,
    negative: usize,
    sentiment_chart: Vec<String>,
    statistics: Vec<String>,
    averages: Vec<String>,
    word_chart: Vec<String>,
    char_chart: Vec<String>,
    term_chart: Vec<String>,
    rows: Vec<String>,
}

#[derive(Serialize)]
struct EvaluationView {
    total: usize,
    accuracy: String,
    precision: String,
    recall: String,
    tn: String,
    fp: String,
    #[serde(rename = "fn")]
    fn_: String,
    tp: String,
}

/// Render a report as plain text, with bar charts drawn in characters
pub fn render(report: &SentimentReport) -> Result<String, RenderError> {
    let title = format!("Sentiment report for #{}", report.hashtag);

    let view = ReportView {
        hashtag: report.hashtag.clone(),
        rule: "=".repeat(title.chars().count()),
        total: report.total,
        positive: report.positive,
        negative: report.negative,
        sentiment_chart: bars(&[
            (Label::Positive.to_string(), report.positive),
            (Label::Negative.to_string(), report.negative),
        ]),
        statistics: statistics(report.word_count.as_ref(), report.char_count.as_ref()),
        averages: averages(report),
        word_chart: bars(&labelled(&report.word_count_distribution)),
        char_chart: bars(&labelled(&report.char_count_distribution)),
        term_chart: bars(&report.top_terms),
        rows: rows(report),
    };

    render_template(REPORT_TEMPLATE, &view)
}

/// Render evaluation scores and the confusion matrix as plain text
pub fn render_evaluation(evaluation: &Evaluation) -> Result<String, RenderError> {
    let [[tn, fp], [fn_, tp]] = evaluation.confusion();

    let view = EvaluationView {
        total: evaluation.total(),
        accuracy: percent(evaluation.accuracy()),
        precision: percent(evaluation.precision()),
        recall: percent(evaluation.recall()),
        tn: format!("{tn:>18}"),
        fp: format!("{fp:>18}"),
        fn_: format!("{fn_:>18}"),
        tp: format!("{tp:>18}"),
    };

    render_template(EVALUATION_TEMPLATE, &view)
}

fn render_template<T: Serialize>(source: &str, view: &T) -> Result<String, RenderError> {
    let template = liquid::ParserBuilder::with_stdlib().build()?.parse(source)?;
    let globals = liquid::to_object(view)?;

    Ok(template.render(&globals)?)
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|value| format!("{:.1}%", value * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

fn labelled(distribution: &[(usize, usize)]) -> Vec<(String, usize)> {
    distribution
        .iter()
        .map(|(value, count)| (value.to_string(), *count))
        .collect()
}

fn bars(counts: &[(String, usize)]) -> Vec<String> {
    let label_width = counts
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let largest = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);

    counts
        .iter()
        .map(|(label, count)| {
            let width = if largest == 0 {
                0
            } else {
                (count * BAR_WIDTH).div_ceil(largest)
            };

            format!("{label:<label_width$} | {} {count}", "#".repeat(width))
        })
        .collect()
}

fn cell(summary: Option<&Summary>, pick: fn(&Summary) -> Option<f64>) -> String {
    summary
        .and_then(pick)
        .map(|value| format!("{value:>12.2}"))
        .unwrap_or_else(|| format!("{:>12}", "NaN"))
}

fn statistics(words: Option<&Summary>, chars: Option<&Summary>) -> Vec<String> {
    let mut lines = vec![format!("{:<6} {:>12} {:>12}", "", "word_count", "char_count")];

    let measures: [(&str, fn(&Summary) -> Option<f64>); 8] = [
        ("count", |s| Some(s.count as f64)),
        ("mean", |s| Some(s.mean)),
        ("std", |s| s.std),
        ("min", |s| Some(s.min)),
        ("25%", |s| Some(s.q25)),
        ("50%", |s| Some(s.q50)),
        ("75%", |s| Some(s.q75)),
        ("max", |s| Some(s.max)),
    ];

    for (name, pick) in measures {
        lines.push(format!(
            "{name:<6} {} {}",
            cell(words, pick),
            cell(chars, pick)
        ));
    }

    lines
}

fn averages(report: &SentimentReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<9} {:>12} {:>12}",
        "sentiment", "word_count", "char_count"
    )];

    for means in &report.by_sentiment {
        lines.push(format!(
            "{:<9} {:>12.2} {:>12.2}",
            means.sentiment.as_str(),
            means.word_count,
            means.char_count
        ));
    }

    lines
}

fn rows(report: &SentimentReport) -> Vec<String> {
    report
        .rows
        .iter()
        .map(|row| {
            format!(
                "[{:<8}] words {:>3}, chars {:>3}  {}",
                row.sentiment.as_str(),
                row.word_count,
                row.char_count,
                shorten(&row.tweet.replace('\n', " "), TWEET_WIDTH)
            )
        })
        .collect()
}

fn shorten(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short = text.chars().take(width - 3).collect::<String>();
        short.push_str("...");
        short
    }
}

/// Render Error
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The template failed to parse or render
    #[error("unable to render report: {0}")]
    Template(#[from] liquid::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::PredictionResult;

    fn report() -> SentimentReport {
        SentimentReport::new(
            "rust",
            &[
                PredictionResult::new(
                    "Loving #rust today".to_string(),
                    Label::Positive,
                    "love rust today".to_string(),
                ),
                PredictionResult::new(
                    "#rust compile times are awful".to_string(),
                    Label::Negative,
                    "rust compil time aw".to_string(),
                ),
                PredictionResult::new(
                    "great #rust docs".to_string(),
                    Label::Positive,
                    "great rust doc".to_string(),
                ),
            ],
        )
    }

    #[test]
    fn renders_every_section() {
        let text = render(&report()).expect("report renders");

        assert!(text.starts_with("Sentiment report for #rust\n"));
        assert!(text.contains("Total texts:     3"));
        assert!(text.contains("Positive texts:  2"));
        assert!(text.contains("Negative texts:  1"));
        assert!(text.contains("Table 1: Text statistics"));
        assert!(text.contains("Table 2: Average statistics by sentiment"));
        assert!(text.contains("Most common words"));
        assert!(text.contains("compile times are awful"));
    }

    #[test]
    fn longest_bar_fills_the_width() {
        let lines = bars(&[("a".to_string(), 4), ("bb".to_string(), 1), ("c".to_string(), 0)]);

        assert_eq!(lines[0], format!("a  | {} 4", "#".repeat(BAR_WIDTH)));
        assert_eq!(lines[1], format!("bb | {} 1", "#".repeat(BAR_WIDTH / 4)));
        assert_eq!(lines[2], "c  |  0");
    }

    #[test]
    fn long_texts_are_shortened() {
        assert_eq!(shorten("short", 10), "short");
        assert_eq!(shorten("a much longer text", 10), "a much ...");
    }

    #[test]
    fn renders_evaluations() {
        let evaluation = Evaluation::new([
            (Label::Positive, Label::Positive),
            (Label::Negative, Label::Positive),
        ]);

        let text = render_evaluation(&evaluation).expect("evaluation renders");

        assert!(text.contains("Evaluated 2 labelled texts"));
        assert!(text.contains("Accuracy:   50.0%"));
        assert!(text.contains("Recall:     100.0%"));
    }
}
