use super::{Provider, ProviderResult};

/// Facebook is a deliberate no-op: post search requires platform permissions
/// ordinary API apps are not granted, so the section carries a fixed notice
/// instead of scraped content.
pub struct FacebookAdapter;

impl FacebookAdapter {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, _query: &str) -> ProviderResult {
        ProviderResult::warning(
            Provider::Facebook,
            "Facebook is not scraped: post search requires special platform permissions. \
             No data collected for this platform."
                .to_string(),
        )
    }
}

impl Default for FacebookAdapter {
    fn default() -> Self {
        Self::new()
    }
}
