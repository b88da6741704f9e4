use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config;
use super::{
    Provider, ProviderResult, is_absolute_http_url, missing_credential, truncate_chars,
    truncate_error,
};

const API_BASE: &str = "https://google.serper.dev";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_RESULTS: usize = 8;
const SNIPPET_MAX_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum WebSearchError {
    #[error("web search rate limit exceeded")]
    RateLimited,

    #[error("web search API error (HTTP {code}): {message}")]
    Api { code: u16, message: String },

    #[error("web search request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

/// Web mention via general search. Only entries with a well-formed absolute
/// http(s) link are kept.
#[derive(Debug, PartialEq)]
pub struct WebMention {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

pub struct WebSearchAdapter {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl WebSearchAdapter {
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self {
            http,
            api_key,
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: Some("test-key".to_string()),
            base_url: base_url.to_string(),
        }
    }

    /// Never fails: missing key, rate limits, and transport errors all land
    /// as explanatory section text.
    pub async fn run(&self, query: &str) -> ProviderResult {
        let Some(api_key) = &self.api_key else {
            return missing_credential(Provider::WebSearch, config::SERPER_API_KEY, "web search");
        };

        match self.search(api_key, query).await {
            Ok(mentions) if mentions.is_empty() => ProviderResult::warning(
                Provider::WebSearch,
                format!("no web mentions found for \"{query}\"."),
            ),
            Ok(mentions) => ProviderResult::success(Provider::WebSearch, format_mentions(&mentions)),
            Err(WebSearchError::RateLimited) => ProviderResult::warning(
                Provider::WebSearch,
                "web search rate limit exceeded. Try again later.".to_string(),
            ),
            Err(e) => {
                warn!(error = %e, "web search failed");
                ProviderResult::error(Provider::WebSearch, truncate_error(&e))
            }
        }
    }

    async fn search(&self, api_key: &str, query: &str) -> Result<Vec<WebMention>, WebSearchError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("X-API-KEY", api_key)
            .header("User-Agent", crate::USER_AGENT)
            .json(&serde_json::json!({ "q": query, "num": MAX_RESULTS }))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("web search rate limited");
            return Err(WebSearchError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(WebSearchError::Api {
                code: status.as_u16(),
                message: truncate_chars(&text, 100),
            });
        }

        let body: SearchResponse = response.json().await?;
        debug!(results = body.organic.len(), "web search complete");
        Ok(collect_mentions(body))
    }
}

fn collect_mentions(body: SearchResponse) -> Vec<WebMention> {
    body.organic
        .into_iter()
        .take(MAX_RESULTS)
        .filter_map(|r| {
            let link = r.link?;
            if !is_absolute_http_url(&link) {
                return None;
            }
            Some(WebMention {
                title: r.title.unwrap_or_else(|| "(untitled)".to_string()),
                snippet: truncate_chars(&r.snippet.unwrap_or_default(), SNIPPET_MAX_CHARS),
                link,
            })
        })
        .collect()
}

fn format_mentions(mentions: &[WebMention]) -> String {
    let mut out = String::new();
    for m in mentions {
        out.push_str(&format!("- {}\n  {}\n  {}\n", m.title, m.snippet, m.link));
    }
    out
}
