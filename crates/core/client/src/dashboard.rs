use campusfix_models::v0::{HeatmapPoint, Issue, IssueStatus};
use campusfix_result::Result;

use crate::view::{sort_issues, IssueFilter};
use crate::{AnalyticsStore, IssueStore};

/// Administrator view over issues and their aggregate counts
#[derive(Clone)]
pub struct Dashboard {
    pub issues: IssueStore,
    pub analytics: AnalyticsStore,
}

impl Dashboard {
    pub fn new(issues: IssueStore, analytics: AnalyticsStore) -> Dashboard {
        Dashboard { issues, analytics }
    }

    /// Refresh issues and analytics together
    pub async fn load(&self) -> Result<()> {
        let (issues, analytics) =
            futures::join!(self.issues.refresh(), self.analytics.refresh());

        issues.and(analytics)
    }

    /// Change the status of an issue and bring the counts up to date
    pub async fn update_status(&self, id: i64, status: IssueStatus) -> Result<()> {
        self.issues.update_status(id, status).await?;

        if let Err(error) = self.analytics.refresh().await {
            info!("Analytics are stale after updating issue {id}: {error}");
        }

        Ok(())
    }

    /// Issues matching a filter, in the store's current order
    pub fn visible(&self, filter: &IssueFilter) -> Vec<Issue> {
        let mut issues = filter.apply(&self.issues.snapshot());
        sort_issues(&mut issues, self.issues.sort());
        issues
    }

    /// Location of every issue, for the campus map
    pub async fn heatmap(&self) -> Result<Vec<HeatmapPoint>> {
        self.issues.backend().fetch_heatmap().await
    }
}

#[cfg(test)]
mod tests {
    use campusfix_backend::{AbstractIssues, NewIssue};
    use campusfix_models::v0::{IssueStatus, SortBy};

    use crate::test_util::signed_in;
    use crate::view::IssueFilter;
    use crate::{AnalyticsStore, Dashboard, IssueStore, DEFAULT_REFRESH_TIMEOUT};

    #[tokio::test]
    async fn resolving_updates_counts() {
        let (reference, backend) = signed_in(true).await;
        let dashboard = Dashboard::new(
            IssueStore::new(backend.clone(), SortBy::Priority, DEFAULT_REFRESH_TIMEOUT),
            AnalyticsStore::new(backend),
        );

        let mut ids = vec![];
        for description in ["wifi keeps dropping", "water cooler leak"] {
            let issue = reference
                .insert_issue(NewIssue {
                    description: description.to_string(),
                    location: "Hall 1".to_string(),
                    image: None,
                })
                .await
                .unwrap();
            ids.push(issue.id);
        }

        dashboard.load().await.unwrap();
        assert_eq!(dashboard.analytics.snapshot().total_issues, 2);
        assert_eq!(dashboard.analytics.snapshot().resolved_issues, 0);

        dashboard
            .update_status(ids[0], IssueStatus::Resolved)
            .await
            .unwrap();

        let analytics = dashboard.analytics.snapshot();
        assert_eq!(analytics.resolved_issues, 1);
        assert_eq!(analytics.active(), 1);
        assert_eq!(
            dashboard.issues.get(ids[0]).unwrap().status,
            IssueStatus::Resolved
        );

        let resolved = dashboard.visible(&IssueFilter {
            status: Some(IssueStatus::Resolved),
            ..Default::default()
        });
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, ids[0]);

        let heatmap = dashboard.heatmap().await.unwrap();
        assert_eq!(heatmap.len(), 2);
    }

    #[tokio::test]
    async fn load_reports_failures() {
        let (reference, backend) = signed_in(true).await;
        let dashboard = Dashboard::new(
            IssueStore::new(backend.clone(), SortBy::Priority, DEFAULT_REFRESH_TIMEOUT),
            AnalyticsStore::new(backend),
        );

        reference.fail_next_requests(1);
        assert!(dashboard.load().await.is_err());
        assert!(dashboard.load().await.is_ok());
    }
}
