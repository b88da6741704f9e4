use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config;
use super::{
    Provider, ProviderResult, is_absolute_http_url, missing_credential, truncate_chars,
    truncate_error,
};

const API_BASE: &str = "https://newsapi.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const PAGE_SIZE: usize = 8;
const DESCRIPTION_MAX_CHARS: usize = 200;
const WINDOW_DAYS: i64 = 7;

/// Placeholder title NewsAPI substitutes for retracted articles.
const REMOVED_SENTINEL: &str = "[Removed]";

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("news API rate limit exceeded")]
    RateLimited,

    #[error("news API requires a plan upgrade for this request")]
    UpgradeRequired,

    #[error("news API error (HTTP {code}): {message}")]
    Api { code: u16, message: String },

    #[error("news request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    source: Option<ArticleSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

pub struct NewsAdapter {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsAdapter {
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

    pub async fn run(&self, query: &str) -> ProviderResult {
        let Some(api_key) = &self.api_key else {
            return missing_credential(Provider::News, config::NEWSAPI_API_KEY, "news search");
        };

        match self.search(api_key, query).await {
            Ok(body) if body.is_empty() => ProviderResult::warning(
                Provider::News,
                format!("no recent news articles found for \"{query}\"."),
            ),
            Ok(body) => ProviderResult::success(Provider::News, body),
            Err(NewsError::RateLimited) => ProviderResult::warning(
                Provider::News,
                "news API rate limit exceeded. Try again later.".to_string(),
            ),
            Err(NewsError::UpgradeRequired) => ProviderResult::warning(
                Provider::News,
                "news API plan does not cover this time window. Skipping news search.".to_string(),
            ),
            Err(e) => {
                warn!(error = %e, "news search failed");
                ProviderResult::error(Provider::News, truncate_error(&e))
            }
        }
    }

    async fn search(&self, api_key: &str, query: &str) -> Result<String, NewsError> {
        let url = format!("{}/v2/everything", self.base_url);
        let from = (Utc::now() - chrono::Duration::days(WINDOW_DAYS))
            .format("%Y-%m-%d")
            .to_string();
        let page_size = PAGE_SIZE.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("from", from.as_str()),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
            ])
            .header("X-Api-Key", api_key)
            .header("User-Agent", crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            429 => {
                warn!("news API rate limited");
                return Err(NewsError::RateLimited);
            }
            426 => return Err(NewsError::UpgradeRequired),
            _ if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(NewsError::Api {
                    code: status.as_u16(),
                    message: truncate_chars(&text, 100),
                });
            }
            _ => {}
        }

        let body: EverythingResponse = response.json().await?;
        debug!(articles = body.articles.len(), "news search complete");
        Ok(format_articles(body.articles))
    }
}

fn format_articles(articles: Vec<Article>) -> String {
    let mut out = String::new();
    for article in articles.into_iter().take(PAGE_SIZE) {
        let Some(url) = article.url.as_deref() else {
            continue;
        };
        if !is_absolute_http_url(url) {
            continue;
        }
        let title = article.title.as_deref().unwrap_or("(untitled)");
        if title == REMOVED_SENTINEL {
            continue;
        }

        let source = article
            .source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("unknown source");
        let description =
            truncate_chars(article.description.as_deref().unwrap_or(""), DESCRIPTION_MAX_CHARS);

        out.push_str(&format!("- [{source}] {title}\n  {description}\n  {url}\n"));
    }
    out
}
