use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Provider, ProviderResult, truncate_chars, truncate_error};

const API_BASE: &str = "https://api.twitter.com/1.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_TWEETS: usize = 20;
const TEXT_MAX_CHARS: usize = 200;
const WINDOW_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum TwitterError {
    #[error("tweet search returned HTTP {0}")]
    Status(u16),

    #[error("tweet search request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    statuses: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id_str: Option<String>,
    text: Option<String>,
    full_text: Option<String>,
    user: Option<TweetUser>,
}

#[derive(Debug, Deserialize)]
struct TweetUser {
    screen_name: Option<String>,
}

/// Best-effort tweet lookup. The underlying search surface is unauthenticated
/// and rate-limited aggressively, so failure is the steady state here and is
/// always reported as a Warning, never an Error.
pub struct TwitterAdapter {
    http: Client,
    base_url: String,
}

impl TwitterAdapter {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    pub async fn run(&self, query: &str) -> ProviderResult {
        match self.search(query).await {
            Ok(body) if body.is_empty() => ProviderResult::warning(
                Provider::Twitter,
                format!("no recent tweets found for \"{query}\"."),
            ),
            Ok(body) => ProviderResult::success(Provider::Twitter, body),
            Err(e) => {
                debug!(error = %e, "tweet search unavailable (expected for this platform)");
                ProviderResult::warning(
                    Provider::Twitter,
                    format!("tweet search unavailable: {}", truncate_error(&e)),
                )
            }
        }
    }

    async fn search(&self, query: &str) -> Result<String, TwitterError> {
        let url = format!("{}/search/tweets.json", self.base_url);
        let since = (Utc::now() - chrono::Duration::days(WINDOW_DAYS))
            .format("%Y-%m-%d")
            .to_string();
        let scoped = format!("{query} since:{since}");
        let count = MAX_TWEETS.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[("q", scoped.as_str()), ("count", count.as_str())])
            .header("User-Agent", crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "tweet search rejected");
            return Err(TwitterError::Status(status.as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        debug!(tweets = body.statuses.len(), "tweet search complete");
        Ok(format_tweets(body.statuses))
    }
}

fn format_tweets(tweets: Vec<Tweet>) -> String {
    let mut out = String::new();
    for tweet in tweets.into_iter().take(MAX_TWEETS) {
        let handle = tweet
            .user
            .as_ref()
            .and_then(|u| u.screen_name.as_deref())
            .unwrap_or("unknown");
        // 280-char tweets arrive in `full_text`; legacy payloads use `text`.
        let text = tweet
            .full_text
            .as_deref()
            .or(tweet.text.as_deref())
            .unwrap_or("");
        let link = tweet
            .id_str
            .as_deref()
            .map(|id| format!("https://twitter.com/{handle}/status/{id}"))
            .unwrap_or_default();

        out.push_str(&format!(
            "- @{handle}: {}\n  {link}\n",
            truncate_chars(text, TEXT_MAX_CHARS)
        ));
    }
    out
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::providers::ProviderStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn run_success_lists_tweets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/tweets.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "statuses": [
                    {"id_str": "99", "text": "Acme Corp shipped", "user": {"screen_name": "dev"}}
                ]
            })))
            .mount(&server)
            .await;

        let adapter = TwitterAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Success);
        assert!(result.body.contains("@dev: Acme Corp shipped"));
        assert!(result.body.contains("https://twitter.com/dev/status/99"));
    }

    #[tokio::test]
    async fn run_any_http_failure_is_warning() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/tweets.json"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let adapter = TwitterAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Warning);
        assert!(result.body.contains("tweet search unavailable"));
    }

    #[tokio::test]
    async fn run_garbage_body_is_warning() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/tweets.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&server)
            .await;

        let adapter = TwitterAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Warning);
    }
}
