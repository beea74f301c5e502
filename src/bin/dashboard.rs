//! Sentiment reports for hashtags, fetched from a running prediction server

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use futures::future::join_all;
use hashtag_sentiment::{
    dashboard::{client::DEFAULT_SERVER, render, PredictClient, SentimentReport},
    serving::clean_hashtag,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: dashboard [OPTIONS] HASHTAG...

Arguments:
  HASHTAG              One or more hashtags, with or without '#' (e.g., 'python')

Options:
  -h, --help           Print help
  -s, --server URL     The prediction server (default 'http://127.0.0.1:5000')
  -t, --timeout SECS   Request timeout in seconds (default 30)
  -o, --output DIR     Write each report to DIR/<hashtag>.txt instead of printing it
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// Server base URL
    server: Option<String>,

    /// Request timeout in seconds
    timeout: Option<u64>,

    /// Directory reports are written to
    output: Option<PathBuf>,

    /// Hashtags to report on
    hashtags: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut pargs = Arguments::from_env();

    let mut args = Args {
        help: pargs.contains(["-h", "--help"]),
        server: pargs.opt_value_from_str(["-s", "--server"])?,
        timeout: pargs.opt_value_from_str(["-t", "--timeout"])?,
        output: pargs.opt_value_from_os_str(["-o", "--output"], |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?,
        hashtags: Vec::new(),
    };

    while let Some(hashtag) = pargs.opt_free_from_str::<String>()? {
        args.hashtags.push(hashtag);
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    if args.help || args.hashtags.is_empty() {
        println!("{}", HELP);
        return Ok(());
    }

    let server = args.server.as_deref().unwrap_or(DEFAULT_SERVER);
    let timeout = Duration::from_secs(args.timeout.unwrap_or(30));
    let client = PredictClient::new(server, timeout)?;

    if let Some(output) = &args.output {
        tokio::fs::create_dir_all(output)
            .await
            .with_context(|| format!("failed to create {}", output.display()))?;
    }

    let fetches = args.hashtags.iter().map(|raw| {
        let client = &client;

        async move {
            let hashtag = clean_hashtag(raw).unwrap_or_default().to_string();
            let results = client.fetch(&hashtag).await;

            (hashtag, results)
        }
    });

    let mut failed = 0;

    for (hashtag, results) in join_all(fetches).await {
        let results = match results {
            Ok(results) => results,
            Err(err) => {
                log::error!("#{hashtag}: {err}");
                failed += 1;
                continue;
            }
        };

        let text = render(&SentimentReport::new(&hashtag, &results))?;

        match &args.output {
            Some(output) => {
                let path = output.join(format!("{hashtag}.txt"));

                tokio::fs::write(&path, text)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;

                log::info!("Wrote the report for #{hashtag} to {}", path.display());
            }
            None => println!("{text}"),
        }
    }

    if failed > 0 {
        return Err(anyhow::anyhow!(
            "{failed} of {} hashtags could not be analyzed",
            args.hashtags.len()
        ));
    }

    Ok(())
}
