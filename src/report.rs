//! Report assembly: six provider sections in a fixed order plus a footer.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::providers::{Provider, ProviderResult};

/// The combined mention report for one query. Immutable once built; holds
/// exactly one result per provider, already in report order.
#[derive(Debug)]
pub struct AggregatedReport {
    pub query: String,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<ProviderResult>,
}

impl AggregatedReport {
    pub fn new(query: &str, generated_at: DateTime<Utc>, results: Vec<ProviderResult>) -> Self {
        debug_assert_eq!(results.len(), Provider::ALL.len());
        debug_assert!(
            results
                .iter()
                .zip(Provider::ALL)
                .all(|(r, p)| r.provider == p),
            "results must arrive in report order"
        );
        Self {
            query: query.to_string(),
            generated_at,
            results,
        }
    }

    /// Render the plain-text document. Deterministic: identical results and
    /// timestamp produce byte-identical output.
    pub fn render(&self) -> String {
        let mut out = format!("# Brand mentions: {}\n\n", self.query);

        for result in &self.results {
            out.push_str(&format!("## {}\n\n", result.provider.label()));
            out.push_str(result.body.trim_end());
            out.push_str("\n\n");
        }

        out.push_str("---\n\n");
        out.push_str(&format!("Query: {}\n", self.query));
        out.push_str(&format!(
            "Generated: {}\n",
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out.push_str(
            "Note: social platform coverage is best effort; some platforms may be \
             incomplete or unavailable.\n",
        );

        out
    }
}
