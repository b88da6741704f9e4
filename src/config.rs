use std::env;

pub const SERPER_API_KEY: &str = "SERPER_API_KEY";
pub const NEWSAPI_API_KEY: &str = "NEWSAPI_API_KEY";
pub const APIFY_API_TOKEN: &str = "APIFY_API_TOKEN";
pub const REDDIT_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const REDDIT_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const REDDIT_USER_AGENT: &str = "REDDIT_USER_AGENT";

/// API credentials for the providers, resolved once per invocation.
///
/// Every field is optional: a missing credential degrades that provider to a
/// Warning section instead of aborting the aggregation. Tests construct this
/// directly with fakes; only `from_env` touches process state.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub serper_api_key: Option<String>,
    pub newsapi_api_key: Option<String>,
    pub apify_api_token: Option<String>,
    pub reddit: Option<RedditCredentials>,
}

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        let reddit = match (env_var(REDDIT_CLIENT_ID), env_var(REDDIT_CLIENT_SECRET)) {
            (Some(client_id), Some(client_secret)) => Some(RedditCredentials {
                client_id,
                client_secret,
                user_agent: env_var(REDDIT_USER_AGENT)
                    .unwrap_or_else(|| crate::USER_AGENT.to_string()),
            }),
            _ => None,
        };

        Self {
            serper_api_key: env_var(SERPER_API_KEY),
            newsapi_api_key: env_var(NEWSAPI_API_KEY),
            apify_api_token: env_var(APIFY_API_TOKEN),
            reddit,
        }
    }
}

/// Empty and whitespace-only values count as unset.
fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_credentials_are_all_absent() {
        let creds = Credentials::default();
        assert!(creds.serper_api_key.is_none());
        assert!(creds.newsapi_api_key.is_none());
        assert!(creds.apify_api_token.is_none());
        assert!(creds.reddit.is_none());
    }
}
