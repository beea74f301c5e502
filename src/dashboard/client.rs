use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::{
    pipelines::PredictionResult,
    serving::{ErrorBody, HashtagRequest},
};

/// Default address of the prediction server
pub static DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Calls `POST /predict-hashtag` on a running server
#[derive(Debug, Clone)]
pub struct PredictClient {
    client: Client,
    endpoint: Url,
}

impl PredictClient {
    /// A client for the server at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint = Url::parse(base_url)?.join("/predict-hashtag")?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    /// The prediction endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch classified texts for a hashtag
    pub async fn fetch(&self, hashtag: &str) -> Result<Vec<PredictionResult>, ClientError> {
        if hashtag.trim().is_empty() {
            return Err(ClientError::EmptyHashtag);
        }

        let request = HashtagRequest {
            hashtag: Some(hashtag.to_string()),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_connect() {
                    ClientError::Unreachable(err)
                } else {
                    ClientError::Http(err)
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Client Error
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Nothing to ask for
    #[error("Please enter a hashtag.")]
    EmptyHashtag,

    /// The server is not running or not reachable
    #[error("Failed to connect to the backend: {0}")]
    Unreachable(reqwest::Error),

    /// The server answered with an error
    #[error("Error from backend ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// The server's `error` message
        message: String,
    },

    /// Any other transport or decoding failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server address is not a valid URL
    #[error("invalid server address: {0}")]
    Address(#[from] url::ParseError),
}
