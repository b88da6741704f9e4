use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config;
use super::{Provider, ProviderResult, missing_credential, truncate_chars, truncate_error};

const API_BASE: &str = "https://api.apify.com";
/// Actor ID for a hosted LinkedIn posts scraper.
const LINKEDIN_SCRAPER: &str = "harvestapi~linkedin-post-search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

#[derive(Debug, thiserror::Error)]
pub enum LinkedInError {
    #[error("scraping service request timed out")]
    Timeout,

    #[error("scraping service rate limit exceeded")]
    RateLimited,

    #[error("scraping service error (HTTP {code}): {message}")]
    Api { code: u16, message: String },

    #[error("scraping service request failed: {0}")]
    Network(reqwest::Error),
}

impl From<reqwest::Error> for LinkedInError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LinkedInError::Timeout
        } else {
            LinkedInError::Network(e)
        }
    }
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    data: Option<RunData>,
}

#[derive(Debug, Deserialize)]
struct RunData {
    id: Option<String>,
}

/// Triggers an asynchronous LinkedIn collection job on the scraping service.
/// Fire and forget: the adapter acknowledges submission and never waits for
/// or returns actual LinkedIn content.
pub struct LinkedInAdapter {
    http: Client,
    api_token: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl LinkedInAdapter {
    pub fn new(http: Client, api_token: Option<String>) -> Self {
        Self {
            http,
            api_token,
            base_url: API_BASE.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_token: Some("test-token".to_string()),
            base_url: base_url.to_string(),
            timeout: Duration::from_millis(250),
        }
    }

    pub async fn run(&self, query: &str) -> ProviderResult {
        let Some(token) = &self.api_token else {
            return missing_credential(
                Provider::LinkedIn,
                config::APIFY_API_TOKEN,
                "LinkedIn collection",
            );
        };

        match self.trigger_job(token, query).await {
            Ok(run_id) => ProviderResult::success(
                Provider::LinkedIn,
                format!(
                    "LinkedIn collection job submitted for \"{query}\" (run {run_id}). \
                     Results are gathered asynchronously and are not part of this report."
                ),
            ),
            Err(LinkedInError::Timeout) => ProviderResult::warning(
                Provider::LinkedIn,
                "scraping service did not respond in time. LinkedIn job not submitted.".to_string(),
            ),
            Err(LinkedInError::RateLimited) => ProviderResult::warning(
                Provider::LinkedIn,
                "scraping service rate limit exceeded. Try again later.".to_string(),
            ),
            Err(e @ LinkedInError::Api { .. }) => {
                warn!(error = %e, "linkedin job submission rejected");
                ProviderResult::error(Provider::LinkedIn, truncate_error(&e))
            }
            Err(e) => {
                warn!(error = %e, "linkedin job submission failed");
                ProviderResult::error(
                    Provider::LinkedIn,
                    format!("could not reach scraping service: {}", truncate_error(&e)),
                )
            }
        }
    }

    async fn trigger_job(&self, token: &str, query: &str) -> Result<String, LinkedInError> {
        let url = format!("{}/v2/acts/{}/runs", self.base_url, LINKEDIN_SCRAPER);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header("User-Agent", crate::USER_AGENT)
            .json(&serde_json::json!({ "searchQuery": query, "maxPosts": 20 }))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("scraping service rate limited");
            return Err(LinkedInError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LinkedInError::Api {
                code: status.as_u16(),
                message: truncate_chars(&text, 100),
            });
        }

        let body: RunResponse = response.json().await?;
        let run_id = body
            .data
            .and_then(|d| d.id)
            .unwrap_or_else(|| "unknown".to_string());
        debug!(%run_id, "linkedin collection job accepted");
        Ok(run_id)
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::providers::ProviderStatus;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn runs_path() -> String {
        format!("/v2/acts/{LINKEDIN_SCRAPER}/runs")
    }

    #[tokio::test]
    async fn run_accepted_job_is_success_ack() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(runs_path()))
            .and(body_string_contains("Acme Corp"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": "run-777", "status": "READY"}
            })))
            .mount(&server)
            .await;

        let adapter = LinkedInAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Success);
        assert!(result.body.contains("job submitted"));
        assert!(result.body.contains("run-777"));
    }

    #[tokio::test]
    async fn run_429_yields_rate_limit_warning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(runs_path()))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let adapter = LinkedInAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Warning);
        assert!(result.body.contains("rate limit"));
    }

    #[tokio::test]
    async fn run_4xx_rejection_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(runs_path()))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad actor input"))
            .mount(&server)
            .await;

        let adapter = LinkedInAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Error);
        assert!(result.body.contains("HTTP 400"));
    }

    #[tokio::test]
    async fn run_timeout_yields_distinct_warning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(runs_path()))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"data": {"id": "late"}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let adapter = LinkedInAdapter::with_base_url(Client::new(), &server.uri());
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Warning);
        assert!(result.body.contains("did not respond in time"));
    }

    #[tokio::test]
    async fn run_without_token_skips_with_warning() {
        let adapter = LinkedInAdapter::new(Client::new(), None);
        let result = adapter.run("Acme Corp").await;

        assert_eq!(result.status, ProviderStatus::Warning);
        assert!(result.body.contains("APIFY_API_TOKEN not found. Skipping"));
    }
}
