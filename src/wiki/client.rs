//! HTTP client for the Wikipedia REST and action APIs.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{ExtractResponse, PrefixSearchResponse, SummaryResponse};
use crate::config::Config;
use crate::models::{ArticleSummary, SearchResult};

/// Prefix search never returns more than this many candidates.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Thumbnail edge requested from the prefix search endpoint.
const SEARCH_THUMB_SIZE: &str = "160";

const USER_AGENT: &str = concat!("rabbit-hole/", env!("CARGO_PKG_VERSION"));

/// Wikipedia client errors.
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Wikipedia returned {0}")]
    Status(StatusCode),

    #[error("Unexpected response: {0}")]
    Malformed(String),
}

/// HTTP client for one Wikipedia language edition.
#[derive(Debug, Clone)]
pub struct WikiClient {
    base_url: String,
    client: Client,
}

impl WikiClient {
    /// Create a client for an explicit base URL such as `https://en.wikipedia.org`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.wiki_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn action_url(&self) -> String {
        format!("{}/w/api.php", self.base_url)
    }

    /// Check the status and decode the body, keeping decode failures apart from transport ones.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WikiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(WikiError::Status(status));
        }
        response.json().await.map_err(|e| {
            if e.is_decode() {
                WikiError::Malformed(e.to_string())
            } else {
                WikiError::Http(e)
            }
        })
    }

    /// Fetch the canonical summary of an article.
    pub async fn summary(&self, title: &str) -> Result<ArticleSummary, WikiError> {
        let url = format!(
            "{}/api/rest_v1/page/summary/{}",
            self.base_url,
            summary_path_segment(title)
        );
        let response = self.client.get(&url).send().await?;
        let data: SummaryResponse = self.handle_response(response).await?;
        Ok(data.into())
    }

    /// Fetch the full plain-text extract of an article.
    ///
    /// Returns `Ok(None)` when the page exists in the response but carries no
    /// extract, which is how Wikipedia reports missing titles.
    pub async fn full_text(&self, title: &str) -> Result<Option<String>, WikiError> {
        let response = self
            .client
            .get(self.action_url())
            .query(&[
                ("format", "json"),
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("titles", title),
            ])
            .send()
            .await?;
        let data: ExtractResponse = self.handle_response(response).await?;

        let page = data
            .query
            .and_then(|q| q.pages.into_values().next())
            .ok_or_else(|| WikiError::Malformed("no page in extract response".to_string()))?;
        Ok(page.extract)
    }

    /// Prefix search that reports failures.
    ///
    /// An empty query short-circuits to an empty list without a request.
    pub async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>, WikiError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.action_url())
            .query(&[
                ("format", "json"),
                ("formatversion", "2"),
                ("action", "query"),
                ("prop", "pageimages|description"),
                ("uselang", "content"),
                ("generator", "prefixsearch"),
                ("pilicense", "any"),
                ("piprop", "thumbnail"),
                ("pithumbsize", SEARCH_THUMB_SIZE),
                ("gpssearch", query),
            ])
            .send()
            .await?;
        let data: PrefixSearchResponse = self.handle_response(response).await?;

        let results: Vec<SearchResult> = data
            .query
            .map(|q| q.pages.into_iter().map(SearchResult::from).collect())
            .unwrap_or_default();
        Ok(rank_results(results))
    }

    /// Best-effort prefix search. Failures are logged and yield no results.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.try_search(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Wikipedia search error for {:?}: {}", query, e);
                Vec::new()
            }
        }
    }
}

/// Path segment for the REST summary endpoint: spaces become underscores, then
/// the title is percent-encoded.
pub fn summary_path_segment(title: &str) -> String {
    urlencoding::encode(&title.replace(' ', "_")).into_owned()
}

/// Order results by server rank and keep the first [`MAX_SEARCH_RESULTS`].
///
/// The sort is stable: entries sharing a rank keep the order the server sent them in.
pub fn rank_results(mut results: Vec<SearchResult>) -> Vec<SearchResult> {
    results.sort_by_key(|r| r.index);
    results.truncate(MAX_SEARCH_RESULTS);
    results
}
