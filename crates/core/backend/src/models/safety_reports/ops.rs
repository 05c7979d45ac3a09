use campusfix_models::v0::SafetyReport;
use campusfix_result::Result;

use crate::NewSafetyReport;

mod reference;
mod rest;

#[async_trait]
pub trait AbstractSafety: Sync + Send {
    /// File an anonymous safety report
    async fn insert_safety_report(&self, report: NewSafetyReport) -> Result<SafetyReport>;

    /// Fetch every safety report, newest first (administrators only)
    async fn fetch_safety_reports(&self) -> Result<Vec<SafetyReport>>;

    /// Fetch the latest safety reports, newest first
    async fn fetch_community_reports(&self) -> Result<Vec<SafetyReport>>;
}
