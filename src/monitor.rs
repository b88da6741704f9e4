//! Fan-out over the six providers for one query.
//!
//! The adapters are independent and share no state, so they run concurrently;
//! the report is only assembled once all six have answered. A provider
//! failure never fails the aggregation — it becomes that provider's section.

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::Credentials;
use crate::providers::facebook::FacebookAdapter;
use crate::providers::linkedin::LinkedInAdapter;
use crate::providers::news::NewsAdapter;
use crate::providers::reddit::RedditAdapter;
use crate::providers::twitter::TwitterAdapter;
use crate::providers::web::WebSearchAdapter;
use crate::report::AggregatedReport;

pub struct Monitor {
    web: WebSearchAdapter,
    news: NewsAdapter,
    twitter: TwitterAdapter,
    reddit: RedditAdapter,
    linkedin: LinkedInAdapter,
    facebook: FacebookAdapter,
}

impl Monitor {
    pub fn new(http: Client, credentials: Credentials) -> Self {
        Self {
            web: WebSearchAdapter::new(http.clone(), credentials.serper_api_key),
            news: NewsAdapter::new(http.clone(), credentials.newsapi_api_key),
            twitter: TwitterAdapter::new(http.clone()),
            reddit: RedditAdapter::new(http.clone(), credentials.reddit),
            linkedin: LinkedInAdapter::new(http, credentials.apify_api_token),
            facebook: FacebookAdapter::new(),
        }
    }

    /// Collect mentions from every provider and combine them into one report.
    /// Infallible: worst case is a document of six degradation notices.
    pub async fn aggregate(&self, query: &str) -> AggregatedReport {
        info!(%query, "aggregating brand mentions");

        let (web, news, twitter, reddit, linkedin, facebook) = futures::join!(
            self.web.run(query),
            self.news.run(query),
            self.twitter.run(query),
            self.reddit.run(query),
            self.linkedin.run(query),
            self.facebook.run(query),
        );

        let results = vec![web, news, twitter, reddit, linkedin, facebook];
        for result in &results {
            debug!(
                provider = result.provider.label(),
                status = ?result.status,
                "provider finished"
            );
        }

        AggregatedReport::new(query, Utc::now(), results)
    }
}
