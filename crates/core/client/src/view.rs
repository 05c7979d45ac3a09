//! Presentation helpers shared by the student list and the admin dashboard.

use campusfix_models::v0::{Issue, IssueStatus, SortBy};

/// Order issues for display
///
/// `Priority` puts the highest score first, `Newest` the latest report.
/// Ties fall back to the id so the order is stable between renders.
pub fn sort_issues(issues: &mut [Issue], sort: SortBy) {
    match sort {
        SortBy::Priority => issues.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortBy::Newest => issues.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        }),
    }
}

/// Admin dashboard filters, an empty filter matches everything
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IssueFilter {
    pub category: Option<String>,
    pub status: Option<IssueStatus>,
}

impl IssueFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        let category = match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category == issue.category,
            _ => true,
        };

        category && self.status.map_or(true, |status| status == issue.status)
    }

    pub fn apply(&self, issues: &[Issue]) -> Vec<Issue> {
        issues
            .iter()
            .filter(|issue| self.matches(issue))
            .cloned()
            .collect()
    }
}
