use std::fmt;
use std::str::FromStr;

#[cfg(feature = "validator")]
use validator::{Validate, ValidationError};

auto_derived!(
    /// Issue as it is sent over the wire
    pub struct IssueOut {
        /// Unique Id
        pub id: i64,
        /// Full description of the issue
        pub description: String,
        /// Where the issue is
        pub location: String,
        /// Path (or URL) of the attached photo
        #[cfg_attr(feature = "serde", serde(default))]
        pub image_url: Option<String>,
        /// Category assigned by the server
        #[cfg_attr(feature = "serde", serde(default = "default_category"))]
        pub category: String,
        /// Severity assigned by the server
        #[cfg_attr(feature = "serde", serde(default))]
        pub severity: Severity,
        /// Short summary generated by the server
        #[cfg_attr(feature = "serde", serde(default))]
        pub summary: Option<String>,
        /// Number of upvotes
        #[cfg_attr(feature = "serde", serde(default))]
        pub upvotes: u32,
        /// Ranking computed by the server
        #[cfg_attr(feature = "serde", serde(default))]
        pub priority_score: f64,
        /// Current status
        #[cfg_attr(feature = "serde", serde(default))]
        pub status: IssueStatus,
        /// Path (or URL) of the photo taken after resolution
        #[cfg_attr(feature = "serde", serde(default))]
        pub resolution_image_url: Option<String>,
        /// Events in the life of this issue
        #[cfg_attr(feature = "serde", serde(default))]
        pub timeline: Vec<String>,
        /// When this issue was reported
        pub created_at: String,
    }

    /// Issue as presented to the client
    pub struct Issue {
        /// Unique Id
        pub id: i64,
        /// Full description of the issue
        pub text: String,
        /// Short summary generated by the server
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        pub summary: Option<String>,
        /// Where the issue is
        pub location: String,
        /// Category assigned by the server
        pub category: String,
        /// Severity assigned by the server
        pub severity: Severity,
        /// Current status
        pub status: IssueStatus,
        /// Ranking computed by the server
        pub priority: f64,
        /// Number of upvotes
        pub upvotes: u32,
        /// Absolute URL of the attached photo
        pub image: Option<String>,
        /// Absolute URL of the photo taken after resolution
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        pub resolution_image: Option<String>,
        /// Events in the life of this issue
        pub timeline: Vec<String>,
        /// When this issue was reported
        pub created_at: String,
    }

    /// Severity of an issue
    #[derive(Eq, Hash, Copy, Default)]
    pub enum Severity {
        #[default]
        #[cfg_attr(feature = "serde", serde(alias = "low", alias = "LOW"))]
        Low,
        #[cfg_attr(feature = "serde", serde(alias = "medium", alias = "MEDIUM"))]
        Medium,
        #[cfg_attr(feature = "serde", serde(alias = "high", alias = "HIGH"))]
        High,
        #[cfg_attr(feature = "serde", serde(alias = "critical", alias = "CRITICAL"))]
        Critical,
    }

    /// Status of an issue
    #[derive(Eq, Hash, Copy, Default)]
    pub enum IssueStatus {
        /// Reported and waiting for triage
        #[default]
        #[cfg_attr(feature = "serde", serde(alias = "new", alias = "pending"))]
        New,
        /// Acknowledged by an administrator
        #[cfg_attr(feature = "serde", serde(alias = "open"))]
        Open,
        /// Being worked on
        #[cfg_attr(
            feature = "serde",
            serde(rename = "In Progress", alias = "in_progress")
        )]
        InProgress,
        /// Fixed
        #[cfg_attr(feature = "serde", serde(alias = "resolved"))]
        Resolved,
    }

    /// Order in which the server returns issues
    #[derive(Eq, Hash, Copy, Default)]
    #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
    pub enum SortBy {
        /// Highest priority first
        #[default]
        Priority,
        /// Most recently reported first
        Newest,
    }

    /// Server acknowledgement of an upvote
    pub struct UpvoteResponse {
        #[cfg_attr(feature = "serde", serde(default))]
        pub message: Option<String>,
        /// Upvote count after this upvote
        #[cfg_attr(feature = "serde", serde(default))]
        pub upvotes: u32,
        /// Priority recomputed by the server
        #[cfg_attr(feature = "serde", serde(default))]
        pub new_priority: Option<f64>,
    }

    /// Server acknowledgement of a status change
    pub struct StatusResponse {
        #[cfg_attr(feature = "serde", serde(default))]
        pub message: Option<String>,
        /// Status after the change
        pub status: IssueStatus,
    }

    /// # Status Data
    pub struct DataEditIssueStatus {
        /// New status of the issue
        pub status: IssueStatus,
        /// Photo taken after resolution
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        pub resolution_image_url: Option<String>,
    }

    /// Location and severity of an issue, for the campus map
    pub struct HeatmapPoint {
        pub id: i64,
        pub location: String,
        #[cfg_attr(feature = "serde", serde(default))]
        pub severity: Severity,
    }
);

/// # Report Data
///
/// Text fields of a new issue, before any photo is attached.
#[cfg_attr(feature = "validator", derive(Validate))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataReportIssue {
    /// Short title, sent as a bracketed prefix of the description
    pub summary: Option<String>,
    /// What is wrong
    #[cfg_attr(feature = "validator", validate(custom(function = "validate_not_blank")))]
    pub description: String,
    /// Where it is
    #[cfg_attr(feature = "validator", validate(custom(function = "validate_not_blank")))]
    pub location: String,
}

impl DataReportIssue {
    /// Description as sent to the server, prefixed with `[summary]` when one is given
    pub fn full_description(&self) -> String {
        match self.summary.as_deref().map(str::trim) {
            Some(summary) if !summary.is_empty() => format!("[{summary}] {}", self.description),
            _ => self.description.clone(),
        }
    }
}

/// Reject empty or whitespace-only values
#[cfg(feature = "validator")]
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if crate::is_blank(value) {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

#[cfg(feature = "serde")]
fn default_category() -> String {
    "General".to_string()
}

impl Issue {
    /// Translate a wire issue into the client shape
    ///
    /// Relative image paths are resolved against `base_url`.
    pub fn from_wire(issue: IssueOut, base_url: &str) -> Issue {
        Issue {
            id: issue.id,
            text: issue.description,
            summary: issue.summary,
            location: issue.location,
            category: issue.category,
            severity: issue.severity,
            status: issue.status,
            priority: issue.priority_score,
            upvotes: issue.upvotes,
            image: issue.image_url.map(|url| absolute_url(base_url, &url)),
            resolution_image: issue
                .resolution_image_url
                .map(|url| absolute_url(base_url, &url)),
            timeline: issue.timeline,
            created_at: issue.created_at,
        }
    }
}

/// Prefix a server-relative path with the API base URL
pub fn absolute_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

impl Severity {
    /// Weight used by the server when ranking issues
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::New => "New",
            IssueStatus::Open => "Open",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "new" | "pending" => Ok(IssueStatus::New),
            "open" => Ok(IssueStatus::Open),
            "in progress" => Ok(IssueStatus::InProgress),
            "resolved" => Ok(IssueStatus::Resolved),
            other => Err(format!("unknown status `{other}`")),
        }
    }
}

impl SortBy {
    /// Value of the `sort_by` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Priority => "priority",
            SortBy::Newest => "newest",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "priority" => Ok(SortBy::Priority),
            "newest" => Ok(SortBy::Newest),
            other => Err(format!("unknown sort order `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire() -> IssueOut {
        IssueOut {
            id: 4,
            description: "[Broken Tap] leak".to_string(),
            location: "A201".to_string(),
            image_url: Some("/static/images/tap.jpg".to_string()),
            category: "Plumbing".to_string(),
            severity: Severity::Medium,
            summary: Some("[Broken Tap] leak...".to_string()),
            upvotes: 3,
            priority_score: 26.0,
            status: IssueStatus::New,
            resolution_image_url: None,
            timeline: vec!["Reported".to_string()],
            created_at: "2024-03-01T10:00:00".to_string(),
        }
    }

    #[test]
    fn translates_wire_fields() {
        let issue = Issue::from_wire(wire(), "http://localhost:8000/");
        assert_eq!(issue.text, "[Broken Tap] leak");
        assert_eq!(issue.priority, 26.0);
        assert_eq!(
            issue.image.as_deref(),
            Some("http://localhost:8000/static/images/tap.jpg")
        );
        assert_eq!(issue.resolution_image, None);
    }

    #[test]
    fn keeps_absolute_image_urls() {
        let mut wire = wire();
        wire.image_url = Some("https://cdn.example.com/a.jpg".to_string());
        let issue = Issue::from_wire(wire, "http://localhost:8000");
        assert_eq!(issue.image.as_deref(), Some("https://cdn.example.com/a.jpg"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialises_sparse_server_issue() {
        let issue: IssueOut = serde_json::from_str(
            r#"{
                "id": 1,
                "description": "light flickers",
                "location": "Library",
                "severity": "low",
                "status": "In Progress",
                "created_at": "2024-03-01T10:00:00"
            }"#,
        )
        .unwrap();

        assert_eq!(issue.category, "General");
        assert_eq!(issue.severity, Severity::Low);
        assert_eq!(issue.status, IssueStatus::InProgress);
        assert_eq!(issue.upvotes, 0);
        assert!(issue.timeline.is_empty());
        assert!(issue.image_url.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialises_status_with_server_names() {
        let body = serde_json::to_value(DataEditIssueStatus {
            status: IssueStatus::InProgress,
            resolution_image_url: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "status": "In Progress" }));
    }

    #[test]
    fn prefixes_summary() {
        let data = DataReportIssue {
            summary: Some("Broken Tap".to_string()),
            description: "leak".to_string(),
            location: "A201".to_string(),
        };
        assert_eq!(data.full_description(), "[Broken Tap] leak");
    }

    #[test]
    fn skips_blank_summary() {
        let data = DataReportIssue {
            summary: Some("   ".to_string()),
            description: "leak".to_string(),
            location: "A201".to_string(),
        };
        assert_eq!(data.full_description(), "leak");
    }

    #[cfg(feature = "validator")]
    #[test]
    fn rejects_blank_fields() {
        let data = DataReportIssue {
            summary: None,
            description: "leak".to_string(),
            location: "  ".to_string(),
        };
        let errors = data.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("location"));
        assert!(!fields.contains_key("description"));
    }

    #[test]
    fn parses_status_names() {
        assert_eq!("in_progress".parse::<IssueStatus>(), Ok(IssueStatus::InProgress));
        assert_eq!("Resolved".parse::<IssueStatus>(), Ok(IssueStatus::Resolved));
        assert!("closed".parse::<IssueStatus>().is_err());
        assert_eq!("newest".parse::<SortBy>(), Ok(SortBy::Newest));
    }
}
