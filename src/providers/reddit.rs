use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{self, RedditCredentials};
use super::{Provider, ProviderResult, truncate_chars, truncate_error};

const AUTH_BASE: &str = "https://www.reddit.com";
const API_BASE: &str = "https://oauth.reddit.com";
const SITE_BASE: &str = "https://www.reddit.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_POSTS: usize = 10;
const TITLE_MAX_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum RedditError {
    #[error("reddit auth failed (HTTP {0})")]
    Auth(u16),

    #[error("reddit auth returned no token")]
    NoToken,

    #[error("reddit search returned HTTP {0}")]
    Status(u16),

    #[error("reddit request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: Option<ListingData>,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Option<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    subreddit: Option<String>,
    title: Option<String>,
    score: Option<i64>,
    num_comments: Option<i64>,
    permalink: Option<String>,
}

pub struct RedditAdapter {
    http: Client,
    credentials: Option<RedditCredentials>,
    auth_base: String,
    api_base: String,
}

impl RedditAdapter {
    pub fn new(http: Client, credentials: Option<RedditCredentials>) -> Self {
        Self {
            http,
            credentials,
            auth_base: AUTH_BASE.to_string(),
            api_base: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            credentials: Some(RedditCredentials {
                client_id: "test-id".to_string(),
                client_secret: "test-secret".to_string(),
                user_agent: "brand-radar tests".to_string(),
            }),
            auth_base: base_url.to_string(),
            api_base: base_url.to_string(),
        }
    }

    pub async fn run(&self, query: &str) -> ProviderResult {
        let Some(creds) = &self.credentials else {
            return missing_reddit_credentials();
        };

        match self.search(creds, query).await {
            Ok(body) if body.is_empty() => ProviderResult::warning(
                Provider::Reddit,
                format!("no recent Reddit posts found for \"{query}\"."),
            ),
            Ok(body) => ProviderResult::success(Provider::Reddit, body),
            Err(e) => {
                warn!(error = %e, "reddit search failed");
                ProviderResult::warning(
                    Provider::Reddit,
                    format!("Reddit search unavailable: {}", truncate_error(&e)),
                )
            }
        }
    }

    async fn search(&self, creds: &RedditCredentials, query: &str) -> Result<String, RedditError> {
        let token = self.fetch_token(creds).await?;

        let url = format!("{}/search", self.api_base);
        let limit = MAX_POSTS.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("sort", "new"),
                ("t", "week"),
                ("limit", limit.as_str()),
            ])
            .bearer_auth(&token)
            .header("User-Agent", &creds.user_agent)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedditError::Status(status.as_u16()));
        }

        let listing: Listing = response.json().await?;
        let posts: Vec<Post> = listing
            .data
            .map(|d| d.children.into_iter().filter_map(|c| c.data).collect())
            .unwrap_or_default();
        debug!(posts = posts.len(), "reddit search complete");
        Ok(format_posts(posts))
    }

    /// Application-only OAuth: the id/secret pair is exchanged for a
    /// short-lived bearer token before every search.
    async fn fetch_token(&self, creds: &RedditCredentials) -> Result<String, RedditError> {
        let url = format!("{}/api/v1/access_token", self.auth_base);
        let response = self
            .http
            .post(&url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .header("User-Agent", &creds.user_agent)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedditError::Auth(status.as_u16()));
        }

        let body: TokenResponse = response.json().await?;
        body.access_token
            .filter(|t| !t.is_empty())
            .ok_or(RedditError::NoToken)
    }
}

fn missing_reddit_credentials() -> ProviderResult {
    tracing::debug!("reddit credentials not found, skipping provider");
    ProviderResult::warning(
        Provider::Reddit,
        format!(
            "{} / {} not found. Skipping Reddit search.",
            config::REDDIT_CLIENT_ID,
            config::REDDIT_CLIENT_SECRET
        ),
    )
}

fn format_posts(posts: Vec<Post>) -> String {
    let mut out = String::new();
    for post in posts.into_iter().take(MAX_POSTS) {
        let Some(permalink) = post.permalink.as_deref() else {
            continue;
        };
        let subreddit = post.subreddit.as_deref().unwrap_or("unknown");
        let title = truncate_chars(post.title.as_deref().unwrap_or("(untitled)"), TITLE_MAX_CHARS);
        let score = post.score.unwrap_or(0);
        let comments = post.num_comments.unwrap_or(0);

        // The listing carries a site-relative permalink; a bare relative
        // link is useless downstream, so rebuild the absolute URL here.
        let url = absolute_permalink(permalink);
        out.push_str(&format!(
            "- r/{subreddit}: {title} ({score} points, {comments} comments)\n  {url}\n"
        ));
    }
    out
}

fn absolute_permalink(permalink: &str) -> String {
    if permalink.starts_with("http://") || permalink.starts_with("https://") {
        return permalink.to_string();
    }
    let path = permalink.strip_prefix('/').unwrap_or(permalink);
    format!("{SITE_BASE}/{path}")
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::providers::ProviderStatus;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/v1/access_token"))
            .and(body_string_contains("client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-abc", "token_type": "bearer", "expires_in": 3600
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn run_success_builds_absolute_urls() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"children": [
                    {"data": {"subreddit": "startups", "title": "Acme Corp thread",
                              "score": 10, "num_comments": 3,
                              "permalink": "/r/startups/comments/zzz/acme/"}}
                ]}
            })))
            .mount(&server)
            .await;

        let adapter = RedditAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Success);
        assert!(result.body.contains("https://www.reddit.com/r/startups/comments/zzz/acme/"));
    }

    #[tokio::test]
    async fn run_auth_rejection_is_warning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/access_token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let adapter = RedditAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Warning);
        assert!(result.body.contains("Reddit search unavailable"));
        assert!(result.body.contains("401"));
    }

    #[tokio::test]
    async fn run_search_rejection_is_warning() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let adapter = RedditAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Warning);
    }

    #[tokio::test]
    async fn run_without_credentials_skips_with_warning() {
        let adapter = RedditAdapter::new(Client::new(), None);
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Warning);
        assert!(result.body.contains("REDDIT_CLIENT_ID"));
        assert!(result.body.contains("not found. Skipping"));
    }

    #[tokio::test]
    async fn run_empty_listing_is_no_results_warning() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"children": []}
            })))
            .mount(&server)
            .await;

        let adapter = RedditAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Warning);
        assert!(result.body.contains("no recent Reddit posts"));
    }
}
