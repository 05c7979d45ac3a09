use campusfix_models::v0::Analytics;
use campusfix_result::Result;

mod reference;
mod rest;

#[async_trait]
pub trait AbstractAnalytics: Sync + Send {
    /// Fetch aggregate counts over every issue
    async fn fetch_analytics(&self) -> Result<Analytics>;
}
