use campusfix_models::v0::SafetyReport;
use campusfix_result::Result;

use crate::{NewSafetyReport, RestBackend};

use super::AbstractSafety;

#[async_trait]
impl AbstractSafety for RestBackend {
    /// File an anonymous safety report
    async fn insert_safety_report(&self, report: NewSafetyReport) -> Result<SafetyReport> {
        let form = report.into_form()?;
        self.json(
            self.client()
                .post(self.url("/safety/reports"))
                .multipart(form),
        )
        .await
    }

    /// Fetch every safety report, newest first (administrators only)
    async fn fetch_safety_reports(&self) -> Result<Vec<SafetyReport>> {
        self.json(self.client().get(self.url("/safety/reports")))
            .await
    }

    /// Fetch the latest safety reports, newest first
    async fn fetch_community_reports(&self) -> Result<Vec<SafetyReport>> {
        self.json(self.client().get(self.url("/safety/community")))
            .await
    }
}
