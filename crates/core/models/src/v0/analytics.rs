use std::collections::HashMap;

auto_derived!(
    /// Aggregate counts for the admin dashboard
    #[derive(Default)]
    pub struct Analytics {
        /// Number of issues reported
        #[cfg_attr(feature = "serde", serde(default))]
        pub total_issues: u64,
        /// Number of issues waiting for triage
        #[cfg_attr(feature = "serde", serde(default))]
        pub pending: u64,
        /// Number of issues being worked on
        #[cfg_attr(feature = "serde", serde(default))]
        pub in_progress: u64,
        /// Number of resolved issues
        #[cfg_attr(feature = "serde", serde(default, alias = "resolved"))]
        pub resolved_issues: u64,
        /// Number of issues per category
        #[cfg_attr(feature = "serde", serde(default))]
        pub by_category: HashMap<String, u64>,
    }
);

impl Analytics {
    /// Issues that are not resolved yet
    pub fn active(&self) -> u64 {
        self.total_issues.saturating_sub(self.resolved_issues)
    }
}
