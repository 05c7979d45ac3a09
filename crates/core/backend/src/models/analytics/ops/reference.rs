use campusfix_models::v0::Analytics;
use campusfix_result::Result;

use crate::{aggregate, ReferenceBackend};

use super::AbstractAnalytics;

#[async_trait]
impl AbstractAnalytics for ReferenceBackend {
    /// Fetch aggregate counts over every issue
    async fn fetch_analytics(&self) -> Result<Analytics> {
        self.begin_request("GET /analytics").await?;
        self.require_login().await?;

        Ok(aggregate(self.issues.lock().await.values()))
    }
}
