//! TavilySearch -- concrete [`SearchProvider`] implementation for the
//! Tavily search API.
//!
//! Sends queries to `/search` with bearer authentication and maps each
//! result to a [`SourceExcerpt`]. The API key is wrapped in
//! [`secrecy::SecretString`] and is never logged or included in `Debug`
//! output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use newsroom_core::collab::SearchProvider;
use newsroom_types::config::SearchConfig;
use newsroom_types::content::SourceExcerpt;
use newsroom_types::error::CollaboratorError;

/// Tavily web search provider.
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl TavilySearch {
    /// Create a new Tavily provider with the production base URL.
    pub fn new(api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.tavily.com".to_string(),
        }
    }

    /// Create a provider with the base URL taken from configuration.
    pub fn from_config(config: &SearchConfig, api_key: SecretString) -> Self {
        Self::new(api_key).with_base_url(config.base_url.clone())
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// TavilySearch intentionally does NOT derive Debug to prevent accidental
// exposure of internal state. The SecretString field ensures the API key is
// never printed, but we also omit Debug entirely for defense-in-depth.

impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Result<Vec<SourceExcerpt>, CollaboratorError> {
        let body = TavilyRequest { query };
        let url = self.url("/search");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(format!("search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => CollaboratorError::AuthenticationFailed,
                429 => CollaboratorError::RateLimited,
                _ => CollaboratorError::Api {
                    status: status.as_u16(),
                    message: error_body,
                },
            });
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::UnexpectedShape(format!("search response: {e}")))?;

        tracing::debug!(query = %query, results = parsed.results.len(), "search completed");

        Ok(parsed
            .results
            .into_iter()
            .map(|r| SourceExcerpt {
                content: r.content,
                url: r.url,
            })
            .collect())
    }
}

/// Request body for the Tavily `/search` endpoint.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
}

/// Response body from the Tavily `/search` endpoint.
///
/// Only the fields the pipeline consumes are modeled; everything else in
/// the payload is ignored.
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    content: String,
    url: String,
}
