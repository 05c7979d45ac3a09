use campusfix_models::v0::SafetyReport;
use campusfix_result::Result;

use crate::{drivers::now, NewSafetyReport, ReferenceBackend, COMMUNITY_FEED_LIMIT};

use super::AbstractSafety;

impl ReferenceBackend {
    async fn newest_reports(&self, limit: usize) -> Vec<SafetyReport> {
        self.safety_reports
            .lock()
            .await
            .values()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AbstractSafety for ReferenceBackend {
    /// File an anonymous safety report
    async fn insert_safety_report(&self, report: NewSafetyReport) -> Result<SafetyReport> {
        self.begin_request("POST /safety/reports").await?;

        if campusfix_models::is_blank(&report.description)
            || campusfix_models::is_blank(&report.location)
        {
            return Err(create_error!(FailedValidation {
                error: "description, location".to_string()
            }));
        }

        let media_url = match report.media {
            Some(media) => Some(self.store_upload("uploads", media).await),
            None => None,
        };

        let created = SafetyReport {
            id: self.generate_id(),
            description: report.description,
            location: report.location,
            media_url,
            is_nsfw: false,
            created_at: now(),
            status: "Open".to_string(),
            is_critical: true,
        };

        self.safety_reports
            .lock()
            .await
            .insert(created.id, created.clone());

        Ok(created)
    }

    /// Fetch every safety report, newest first (administrators only)
    async fn fetch_safety_reports(&self) -> Result<Vec<SafetyReport>> {
        self.begin_request("GET /safety/reports").await?;

        if !self.is_admin().await {
            return Err(create_error!(NotPrivileged));
        }

        Ok(self.newest_reports(usize::MAX).await)
    }

    /// Fetch the latest safety reports, newest first
    async fn fetch_community_reports(&self) -> Result<Vec<SafetyReport>> {
        self.begin_request("GET /safety/community").await?;
        Ok(self.newest_reports(COMMUNITY_FEED_LIMIT).await)
    }
}
