use campusfix_models::v0::{
    DataEditIssueStatus, HeatmapPoint, IssueOut, IssueStatus, SortBy, StatusResponse,
    UpvoteResponse,
};
use campusfix_result::Result;

use crate::util::triage;
use crate::{drivers::now, triage_issue, NewIssue, ReferenceBackend};

use super::AbstractIssues;

#[async_trait]
impl AbstractIssues for ReferenceBackend {
    /// Fetch every issue in the given order
    async fn fetch_issues(&self, sort: SortBy) -> Result<Vec<IssueOut>> {
        self.begin_request("GET /issues").await?;
        self.require_login().await?;

        let mut issues: Vec<IssueOut> = self.issues.lock().await.values().cloned().collect();
        match sort {
            SortBy::Priority => issues.sort_by(|a, b| {
                b.priority_score
                    .total_cmp(&a.priority_score)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            SortBy::Newest => issues.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            }),
        }

        Ok(issues)
    }

    /// Create a new issue
    async fn insert_issue(&self, issue: NewIssue) -> Result<IssueOut> {
        self.begin_request("POST /issues").await?;
        self.require_login().await?;

        if campusfix_models::is_blank(&issue.description)
            || campusfix_models::is_blank(&issue.location)
        {
            return Err(create_error!(FailedValidation {
                error: "description, location".to_string()
            }));
        }

        let image_url = match issue.image {
            Some(image) => Some(self.store_upload("images", image).await),
            None => None,
        };

        let created = triage_issue(
            self.generate_id(),
            issue.description,
            issue.location,
            image_url,
            now(),
        );

        self.issues.lock().await.insert(created.id, created.clone());
        Ok(created)
    }

    /// Upvote an issue
    async fn upvote_issue(&self, id: i64) -> Result<UpvoteResponse> {
        self.begin_request("POST /issues/:id/upvote").await?;
        self.require_login().await?;

        let mut issues = self.issues.lock().await;
        let issue = issues
            .get_mut(&id)
            .ok_or_else(|| create_error!(UnknownIssue))?;

        issue.upvotes += 1;
        issue.priority_score = triage::priority(issue.upvotes, issue.severity);

        Ok(UpvoteResponse {
            message: Some("Upvoted successfully".to_string()),
            upvotes: issue.upvotes,
            new_priority: Some(issue.priority_score),
        })
    }

    /// Change the status of an issue
    async fn update_issue_status(
        &self,
        id: i64,
        data: &DataEditIssueStatus,
    ) -> Result<StatusResponse> {
        self.begin_request("PATCH /issues/:id/status").await?;
        self.require_login().await?;

        let mut issues = self.issues.lock().await;
        let issue = issues
            .get_mut(&id)
            .ok_or_else(|| create_error!(UnknownIssue))?;

        if issue.status != data.status {
            issue.status = data.status;
            issue.timeline.push(match data.status {
                IssueStatus::Resolved => "Resolved".to_string(),
                status => format!("Marked {status}"),
            });
        }

        if let Some(url) = &data.resolution_image_url {
            issue.resolution_image_url = Some(url.clone());
        }

        Ok(StatusResponse {
            message: Some("Status updated".to_string()),
            status: issue.status,
        })
    }

    /// Fetch the location of every issue
    async fn fetch_heatmap(&self) -> Result<Vec<HeatmapPoint>> {
        self.begin_request("GET /heatmap").await?;
        self.require_login().await?;

        Ok(self
            .issues
            .lock()
            .await
            .values()
            .map(|issue| HeatmapPoint {
                id: issue.id,
                location: issue.location.clone(),
                severity: issue.severity,
            })
            .collect())
    }
}
