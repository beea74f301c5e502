use std::{sync::Arc, time::Duration};

use axum::{
    routing::{get, post},
    Router,
};
use burn::backend::NdArray;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::{artifacts::ModelStore, pipelines::InferencePipeline, sources::TextSource};

/// Request handlers
pub mod handlers;

/// The backend predictions run on
pub type ServingBackend = NdArray;

/// The pipeline shared by all requests
pub type SharedPipeline = Arc<InferencePipeline<ServingBackend>>;

/// Error message when the artifacts failed to load
pub static MODEL_UNAVAILABLE: &str = "Model or Vectorizer is not loaded on the server.";

/// Error message for a missing or blank hashtag
pub static NO_HASHTAG: &str = "No hashtag provided.";

/// Whether the server can answer predictions
#[derive(Debug, Clone)]
pub enum Readiness {
    /// Artifacts loaded
    Ready(SharedPipeline),

    /// Artifacts failed to load; every prediction is rejected
    Unavailable(String),
}

impl Readiness {
    /// Build the pipeline from a store. A failure is logged and kept, not raised, so the server
    /// can still start and report it.
    pub fn load<S: ModelStore + ?Sized>(store: &S) -> Self {
        match InferencePipeline::from_store(store, &Default::default()) {
            Ok(pipeline) => Readiness::Ready(Arc::new(pipeline)),
            Err(err) => {
                log::error!("Predictions are disabled: {err}");

                Readiness::Unavailable(err.to_string())
            }
        }
    }

    /// The pipeline, when ready
    pub fn pipeline(&self) -> Option<&SharedPipeline> {
        match self {
            Readiness::Ready(pipeline) => Some(pipeline),
            Readiness::Unavailable(_) => None,
        }
    }
}

/// State shared by the handlers
#[derive(Clone)]
pub struct AppState {
    readiness: Arc<Readiness>,
    source: Arc<dyn TextSource>,
    fetch_timeout: Duration,
}

impl AppState {
    /// Create the handler state
    pub fn new(readiness: Readiness, source: Arc<dyn TextSource>, fetch_timeout: Duration) -> Self {
        Self {
            readiness: Arc::new(readiness),
            source,
            fetch_timeout,
        }
    }

    /// The current readiness
    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }
}

/// The body of a prediction request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashtagRequest {
    /// The hashtag, with or without its leading `#`
    #[serde(default)]
    pub hashtag: Option<String>,
}

/// The body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A human readable message
    pub error: String,
}

/// Strip surrounding whitespace and leading `#` signs, rejecting what is left if blank
pub fn clean_hashtag(raw: &str) -> Option<&str> {
    let hashtag = raw.trim().trim_start_matches('#').trim();

    if hashtag.is_empty() {
        None
    } else {
        Some(hashtag)
    }
}

/// The HTTP routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/predict-hashtag", post(handlers::predict_hashtag))
        .with_state(state)
}

/// Serve the routes on a bound listener until the process stops
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("Listening on http://{addr}");
    }

    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::artifacts::JsonModelStore;

    #[test]
    fn cleans_hashtags() {
        assert_eq!(clean_hashtag("rust"), Some("rust"));
        assert_eq!(clean_hashtag("#rust"), Some("rust"));
        assert_eq!(clean_hashtag("  ##rust "), Some("rust"));
        assert_eq!(clean_hashtag(""), None);
        assert_eq!(clean_hashtag(" # "), None);
        assert_eq!(clean_hashtag("###"), None);
    }

    #[test]
    fn missing_artifacts_leave_the_server_unavailable() {
        let readiness = Readiness::load(&JsonModelStore::new("/definitely/not/here"));

        assert!(readiness.pipeline().is_none());
        assert!(matches!(readiness, Readiness::Unavailable(reason) if reason.contains("not found")));
    }
}
