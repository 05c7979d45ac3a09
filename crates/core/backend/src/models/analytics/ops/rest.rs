use campusfix_models::v0::Analytics;
use campusfix_result::Result;

use crate::RestBackend;

use super::AbstractAnalytics;

#[async_trait]
impl AbstractAnalytics for RestBackend {
    /// Fetch aggregate counts over every issue
    async fn fetch_analytics(&self) -> Result<Analytics> {
        self.json(self.client().get(self.url("/analytics"))).await
    }
}
