#![allow(dead_code)]

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use hashtag_sentiment::{
    artifacts::JsonModelStore,
    pipelines::RawText,
    serving::{self, AppState, Readiness},
    sources::{TextSource, UpstreamError},
};
use tokio::{net::TcpListener, sync::Mutex};

pub fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn fixture_store() -> JsonModelStore {
    JsonModelStore::new(fixtures())
}

/// Returns the same texts for every hashtag and remembers what it was asked for
#[derive(Default)]
pub struct StaticSource {
    texts: Vec<RawText>,
    pub requested: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new(texts: Vec<RawText>) -> Self {
        Self {
            texts,
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextSource for StaticSource {
    async fn fetch(&self, hashtag: &str) -> Result<Vec<RawText>, UpstreamError> {
        self.requested.lock().await.push(hashtag.to_string());

        Ok(self.texts.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Always fails like an unauthorized search API
pub struct FailingSource;

#[async_trait]
impl TextSource for FailingSource {
    async fn fetch(&self, _hashtag: &str) -> Result<Vec<RawText>, UpstreamError> {
        Err(UpstreamError::Api {
            status: 401,
            detail: "Unauthorized".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Never answers in time
pub struct SlowSource;

#[async_trait]
impl TextSource for SlowSource {
    async fn fetch(&self, _hashtag: &str) -> Result<Vec<RawText>, UpstreamError> {
        tokio::time::sleep(Duration::from_secs(30)).await;

        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Serve a state on an ephemeral port
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind an ephemeral port");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(serving::serve(listener, state));

    addr
}

/// Serve the fixture pipeline with the given source
pub async fn spawn_ready(source: Arc<dyn TextSource>, timeout: Duration) -> SocketAddr {
    let readiness = Readiness::load(&fixture_store());
    assert!(readiness.pipeline().is_some(), "fixture artifacts load");

    spawn_server(AppState::new(readiness, source, timeout)).await
}
