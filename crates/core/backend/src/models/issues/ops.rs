use campusfix_models::v0::{
    DataEditIssueStatus, HeatmapPoint, IssueOut, SortBy, StatusResponse, UpvoteResponse,
};
use campusfix_result::Result;

use crate::NewIssue;

mod reference;
mod rest;

#[async_trait]
pub trait AbstractIssues: Sync + Send {
    /// Fetch every issue in the given order
    async fn fetch_issues(&self, sort: SortBy) -> Result<Vec<IssueOut>>;

    /// Create a new issue
    async fn insert_issue(&self, issue: NewIssue) -> Result<IssueOut>;

    /// Upvote an issue
    async fn upvote_issue(&self, id: i64) -> Result<UpvoteResponse>;

    /// Change the status of an issue
    async fn update_issue_status(
        &self,
        id: i64,
        data: &DataEditIssueStatus,
    ) -> Result<StatusResponse>;

    /// Fetch the location of every issue
    async fn fetch_heatmap(&self) -> Result<Vec<HeatmapPoint>>;
}
