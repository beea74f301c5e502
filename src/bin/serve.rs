//! HTTP server for hashtag sentiment predictions

use std::net::SocketAddr;

use anyhow::{Context, Result};
use hashtag_sentiment::{
    artifacts::JsonModelStore,
    config::AppConfig,
    serving::{self, AppState, Readiness},
    sources,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: serve [OPTIONS]

Options:
  -h, --help             Print help
  -c, --config PATH      Settings file (JSON or YAML)
  -b, --bind ADDR        Address to listen on (e.g., '127.0.0.1:5000')
  -a, --artifacts DIR    Directory holding model.json and vectorizer.json
  -s, --source KIND      Where texts come from: 'auto', 'live' or 'fallback'
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// Settings file
    config: Option<String>,

    /// Listen address override
    bind: Option<String>,

    /// Artifact directory override
    artifacts: Option<String>,

    /// Text source override
    source: Option<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let args = Args {
        help: pargs.contains(["-h", "--help"]),
        config: pargs.opt_value_from_str(["-c", "--config"])?,
        bind: pargs.opt_value_from_str(["-b", "--bind"])?,
        artifacts: pargs.opt_value_from_str(["-a", "--artifacts"])?,
        source: pargs.opt_value_from_str(["-s", "--source"])?,
    };

    Ok(args)
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

    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    if let Some(artifacts) = args.artifacts {
        config.artifact_dir = artifacts;
    }

    if let Some(source) = args.source {
        config.source = source;
    }

    // A failed load keeps the server up, rejecting predictions until restarted
    let readiness = Readiness::load(&JsonModelStore::from_config(&config));
    let source = sources::from_config(&config)?;

    let state = AppState::new(readiness, source, config.fetch_timeout());

    let addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    serving::serve(listener, state)
        .await
        .context("server shutdown")?;

    Ok(())
}
