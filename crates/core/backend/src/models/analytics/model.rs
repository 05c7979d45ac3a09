use campusfix_models::v0::{Analytics, IssueOut, IssueStatus};

/// Aggregate a set of issues the way the server does
pub(crate) fn aggregate<'a>(issues: impl IntoIterator<Item = &'a IssueOut>) -> Analytics {
    let mut analytics = Analytics::default();

    for issue in issues {
        analytics.total_issues += 1;
        match issue.status {
            IssueStatus::New | IssueStatus::Open => analytics.pending += 1,
            IssueStatus::InProgress => analytics.in_progress += 1,
            IssueStatus::Resolved => analytics.resolved_issues += 1,
        }

        *analytics
            .by_category
            .entry(issue.category.clone())
            .or_default() += 1;
    }

    analytics
}
