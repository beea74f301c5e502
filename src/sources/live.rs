use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};
use serde::Deserialize;
use url::Url;

use crate::{config::AppConfig, pipelines::RawText};

use super::{SourceError, TextSource, UpstreamError};

/// The smallest page the search API accepts
pub const MIN_RESULTS: usize = 10;

/// The largest page the search API accepts
pub const MAX_RESULTS: usize = 100;

/// Fetches recent texts for a hashtag from the v2 recent-search API
#[derive(Debug, Clone)]
pub struct LiveSource {
    client: Client,
    endpoint: Url,
    max_results: usize,
}

impl LiveSource {
    /// Build a client for `endpoint` that authenticates with `bearer_token`
    pub fn new(
        endpoint: &str,
        bearer_token: &str,
        max_results: usize,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let bearer_token = bearer_token.trim();
        if bearer_token.is_empty() {
            return Err(SourceError::MissingToken);
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {bearer_token}"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
            max_results: max_results.clamp(MIN_RESULTS, MAX_RESULTS),
        })
    }

    /// Build the live source described by the app config
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let bearer_token = config.bearer_token().ok_or(SourceError::MissingToken)?;

        Self::new(
            &config.search_endpoint,
            bearer_token,
            config.max_results,
            config.fetch_timeout(),
        )
    }

    /// The number of results requested per search
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// The search URL for a hashtag: original English posts only
    pub fn search_url(&self, hashtag: &str) -> Url {
        let mut url = self.endpoint.clone();

        url.query_pairs_mut()
            .append_pair("query", &format!("#{hashtag} -is:retweet lang:en"))
            .append_pair("max_results", &self.max_results.to_string());

        url
    }
}

/// The single text returned when a search has no matches
pub fn no_results_placeholder(hashtag: &str) -> String {
    format!("No recent tweets found for #{hashtag}.")
}

#[derive(Deserialize)]
struct SearchResponse {
    data: Option<Vec<Post>>,
}

#[derive(Deserialize)]
struct Post {
    text: String,
}

#[derive(Deserialize)]
struct ApiProblem {
    detail: Option<String>,
    title: Option<String>,
}

/// The most useful message in an API error body
fn problem_detail(body: &str) -> String {
    serde_json::from_str::<ApiProblem>(body)
        .ok()
        .and_then(|problem| problem.detail.or(problem.title))
        .unwrap_or_else(|| {
            let body = body.trim();

            if body.is_empty() {
                "Unknown error".to_string()
            } else {
                body.to_string()
            }
        })
}

#[async_trait]
impl TextSource for LiveSource {
    async fn fetch(&self, hashtag: &str) -> Result<Vec<RawText>, UpstreamError> {
        log::info!("Searching recent posts for #{hashtag}");

        let response = self.client.get(self.search_url(hashtag)).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = problem_detail(&body);

            log::error!("Search API returned {status}: {detail}");

            return Err(UpstreamError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let body: SearchResponse = response.json().await?;

        Ok(match body.data {
            Some(posts) => posts.into_iter().map(|post| post.text.into()).collect(),
            None => vec![no_results_placeholder(hashtag).into()],
        })
    }

    fn name(&self) -> &str {
        "live"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn source(max_results: usize) -> LiveSource {
        LiveSource::new(
            "https://api.example.com/2/tweets/search/recent",
            "token",
            max_results,
            Duration::from_secs(1),
        )
        .expect("source builds")
    }

    #[test]
    fn search_url_carries_the_query() {
        let url = source(50).search_url("rust");

        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

        assert_eq!(
            pairs,
            vec![
                ("query".to_string(), "#rust -is:retweet lang:en".to_string()),
                ("max_results".to_string(), "50".to_string()),
            ]
        );
        assert_eq!(url.path(), "/2/tweets/search/recent");
    }

    #[test]
    fn max_results_are_clamped() {
        assert_eq!(source(1).max_results(), MIN_RESULTS);
        assert_eq!(source(500).max_results(), MAX_RESULTS);
        assert_eq!(source(42).max_results(), 42);
    }

    #[test]
    fn rejects_blank_tokens_and_bad_endpoints() {
        assert!(matches!(
            LiveSource::new("https://api.example.com", " ", 50, Duration::from_secs(1)),
            Err(SourceError::MissingToken)
        ));
        assert!(matches!(
            LiveSource::new("not a url", "token", 50, Duration::from_secs(1)),
            Err(SourceError::Endpoint(_))
        ));
    }

    #[test]
    fn placeholder_names_the_hashtag() {
        assert_eq!(
            no_results_placeholder("rust"),
            "No recent tweets found for #rust."
        );
    }

    #[test]
    fn problem_detail_prefers_the_api_message() {
        assert_eq!(
            problem_detail(r#"{"title": "Unauthorized", "detail": "Bad token"}"#),
            "Bad token"
        );
        assert_eq!(problem_detail(r#"{"title": "Unauthorized"}"#), "Unauthorized");
        assert_eq!(problem_detail("rate limited"), "rate limited");
        assert_eq!(problem_detail(""), "Unknown error");
    }
}
