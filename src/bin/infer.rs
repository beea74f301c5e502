//! Command line tool for inference

use anyhow::{anyhow, Result};
use burn::backend::{ndarray::NdArrayDevice, NdArray};
use hashtag_sentiment::{
    artifacts::JsonModelStore,
    config::AppConfig,
    dashboard::{render_evaluation, Evaluation},
    pipelines::{InferencePipeline, PredictionResult, RawText},
    serving::clean_hashtag,
    sources::{self, Corpus, TextSource},
};
use pico_args::Arguments;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Usage: infer [OPTIONS] [TEXT]...

Classifies each TEXT. Without any, reads one text per line from standard input.

Options:
  -h, --help             Print help
  -c, --config PATH      Settings file (JSON or YAML)
  -a, --artifacts DIR    Directory holding model.json and vectorizer.json
  -t, --hashtag TAG      Classify texts fetched for TAG from the configured source
  -e, --evaluate PATH    Score predictions against a labelled corpus of POS:/NEG: lines
      --csv              Write results as CSV
";

/// Stands in for `#{hashtag}` when evaluating a corpus without `--hashtag`
const EVALUATION_HASHTAG: &str = "sample";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// Settings file
    config: Option<String>,

    /// Artifact directory override
    artifacts: Option<String>,

    /// Fetch texts for this hashtag
    hashtag: Option<String>,

    /// Labelled corpus to evaluate against
    evaluate: Option<String>,

    /// Write CSV instead of text blocks
    csv: bool,

    /// Texts given on the command line
    texts: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut pargs = Arguments::from_env();

    let mut args = Args {
        help: pargs.contains(["-h", "--help"]),
        config: pargs.opt_value_from_str(["-c", "--config"])?,
        artifacts: pargs.opt_value_from_str(["-a", "--artifacts"])?,
        hashtag: pargs.opt_value_from_str(["-t", "--hashtag"])?,
        evaluate: pargs.opt_value_from_str(["-e", "--evaluate"])?,
        csv: pargs.contains("--csv"),
        texts: Vec::new(),
    };

    for text in pargs.finish() {
        let text = text
            .into_string()
            .map_err(|text| anyhow!("argument is not valid UTF-8: {:?}", text))?;

        args.texts.push(text);
    }

    Ok(args)
}

async fn read_stdin() -> Result<Vec<RawText>> {
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
    let mut texts = Vec::new();

    while let Some(mut line) = lines.next_segment().await? {
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        if !line.is_empty() {
            texts.push(line.into());
        }
    }

    Ok(texts)
}

fn print_results(results: &[PredictionResult], csv: bool) -> Result<()> {
    if csv {
        let mut writer = csv::Writer::from_writer(std::io::stdout());

        for result in results {
            writer.serialize(result)?;
        }

        writer.flush()?;

        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!(
            "\n=== Item {i} ===\
             \n- Text: {}\
             \n- Cleaned: {}\
             \n- Sentiment: {}\
             \n================",
            result.tweet, result.cleaned_text, result.sentiment
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    let mut config = AppConfig::resolve(args.config.as_deref())?;

    if let Some(artifacts) = args.artifacts {
        config.artifact_dir = artifacts;
    }

    let device = NdArrayDevice::Cpu;

    let pipeline =
        InferencePipeline::<NdArray>::from_store(&JsonModelStore::from_config(&config), &device)?;

    let hashtag = match args.hashtag.as_deref() {
        Some(raw) => Some(clean_hashtag(raw).ok_or_else(|| anyhow!("No hashtag provided."))?),
        None => None,
    };

    if let Some(path) = args.evaluate {
        let corpus = Corpus::load(&path).await?;
        let entries = corpus.for_hashtag(hashtag.unwrap_or(EVALUATION_HASHTAG));

        let texts = entries
            .iter()
            .map(|entry| entry.text.clone())
            .collect::<Vec<_>>();
        let results = pipeline.classify_batch(&texts)?;

        let evaluation = Evaluation::new(
            entries
                .iter()
                .zip(&results)
                .map(|(entry, result)| (entry.expected, result.sentiment)),
        );

        print!("{}", render_evaluation(&evaluation)?);

        return Ok(());
    }

    let texts = if let Some(hashtag) = hashtag {
        sources::from_config(&config)?.fetch(hashtag).await?
    } else if !args.texts.is_empty() {
        args.texts.into_iter().map(RawText::from).collect()
    } else {
        read_stdin().await?
    };

    let results = pipeline.classify_batch(&texts)?;

    print_results(&results, args.csv)
}
