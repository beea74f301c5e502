use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{pipelines::PredictionResult, sources::UpstreamError};

use super::{
    clean_hashtag, AppState, ErrorBody, HashtagRequest, Readiness, MODEL_UNAVAILABLE, NO_HASHTAG,
};

type ErrorResponse = (StatusCode, Json<ErrorBody>);

/// Health check body
#[derive(Debug, Serialize)]
pub struct Health {
    /// "ok" or "unavailable"
    pub status: &'static str,

    /// Why predictions are disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /healthz`: 200 when predictions are possible, 503 otherwise
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.readiness() {
        Readiness::Ready(_) => (
            StatusCode::OK,
            Json(Health {
                status: "ok",
                error: None,
            }),
        ),
        Readiness::Unavailable(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Health {
                status: "unavailable",
                error: Some(reason.clone()),
            }),
        ),
    }
}

/// `POST /predict-hashtag`: fetch texts for the hashtag and classify them, in source order
pub async fn predict_hashtag(
    State(state): State<AppState>,
    payload: Result<Json<HashtagRequest>, JsonRejection>,
) -> Result<Json<Vec<PredictionResult>>, ErrorResponse> {
    let pipeline = state
        .readiness()
        .pipeline()
        .cloned()
        .ok_or_else(|| internal_error(MODEL_UNAVAILABLE))?;

    let Json(request) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;

    let hashtag = request
        .hashtag
        .as_deref()
        .and_then(clean_hashtag)
        .ok_or_else(|| bad_request(NO_HASHTAG))?
        .to_string();

    let texts = match tokio::time::timeout(state.fetch_timeout, state.source.fetch(&hashtag)).await
    {
        Ok(Ok(texts)) => texts,
        Ok(Err(err)) => return Err(bad_gateway(err)),
        Err(_) => return Err(bad_gateway(UpstreamError::Timeout(state.fetch_timeout))),
    };

    let results = tokio::task::spawn_blocking(move || pipeline.classify_batch(&texts))
        .await
        .map_err(|err| internal_error(anyhow!("classification task failed: {err}")))?
        .map_err(internal_error)?;

    log::info!("Classified {} texts for #{hashtag}", results.len());

    Ok(Json(results))
}

fn error_response(status: StatusCode, message: impl ToString) -> ErrorResponse {
    let error = message.to_string();

    if status.is_server_error() {
        log::error!("{status}: {error}");
    } else {
        log::debug!("{status}: {error}");
    }

    (status, Json(ErrorBody { error }))
}

fn bad_request(message: impl ToString) -> ErrorResponse {
    error_response(StatusCode::BAD_REQUEST, message)
}

fn internal_error(message: impl ToString) -> ErrorResponse {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn bad_gateway(err: UpstreamError) -> ErrorResponse {
    error_response(StatusCode::BAD_GATEWAY, err)
}
