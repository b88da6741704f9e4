//! Provider adapters: one per mention source, all behind the same
//! `run(query) -> ProviderResult` contract. An adapter never fails the
//! aggregation — every failure becomes explanatory text in its own section.

pub(crate) mod facebook;
pub(crate) mod linkedin;
pub(crate) mod news;
pub(crate) mod reddit;
pub(crate) mod twitter;
pub(crate) mod web;

/// Mention sources in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    WebSearch,
    News,
    Twitter,
    Reddit,
    LinkedIn,
    Facebook,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::WebSearch,
        Provider::News,
        Provider::Twitter,
        Provider::Reddit,
        Provider::LinkedIn,
        Provider::Facebook,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Provider::WebSearch => "Web Search",
            Provider::News => "News",
            Provider::Twitter => "Twitter/X",
            Provider::Reddit => "Reddit",
            Provider::LinkedIn => "LinkedIn",
            Provider::Facebook => "Facebook",
        }
    }
}

/// Outcome class for a provider section.
///
/// `Warning` is expected degradation (missing credential, rate limit, no
/// matches); `Error` is an unexpected transport or protocol failure. Both
/// still render as a normal section in the combined report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Success,
    Warning,
    Error,
}

/// One provider's contribution for one query. Created fresh per invocation,
/// never mutated.
#[derive(Debug)]
pub struct ProviderResult {
    pub provider: Provider,
    pub status: ProviderStatus,
    pub body: String,
}

impl ProviderResult {
    pub fn success(provider: Provider, body: String) -> Self {
        Self {
            provider,
            status: ProviderStatus::Success,
            body,
        }
    }

    pub fn warning(provider: Provider, reason: String) -> Self {
        Self {
            provider,
            status: ProviderStatus::Warning,
            body: format!("Warning: {reason}"),
        }
    }

    pub fn error(provider: Provider, reason: String) -> Self {
        Self {
            provider,
            status: ProviderStatus::Error,
            body: format!("Error: {reason}"),
        }
    }
}

/// Skip marker for an absent credential. Absence is a normal outcome, not a
/// failure: the provider degrades to a Warning section and siblings continue.
pub(crate) fn missing_credential(provider: Provider, var: &str, what: &str) -> ProviderResult {
    tracing::debug!(%var, provider = provider.label(), "credential not found, skipping provider");
    ProviderResult::warning(provider, format!("{var} not found. Skipping {what}."))
}

/// Truncate to at most `max` characters on a char boundary, appending an
/// ellipsis when anything was cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Diagnostics shown in report sections are capped so one noisy upstream
/// cannot bloat the document.
pub(crate) fn truncate_error(e: &impl std::fmt::Display) -> String {
    truncate_chars(&e.to_string(), 100)
}

/// Only well-formed absolute http(s) URLs make it into a report.
pub(crate) fn is_absolute_http_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
