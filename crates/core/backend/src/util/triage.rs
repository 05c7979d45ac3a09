//! Keyword triage performed by the reference backend, matching what the
//! server does before its model has seen a report.

use campusfix_models::v0::Severity;

const CATEGORIES: &[(&str, &[&str])] = &[
    ("Plumbing", &["water", "leak", "pipe"]),
    ("Electrical", &["light", "electric", "wire"]),
    ("IT", &["wifi", "internet"]),
    ("Cleanliness", &["clean", "trash", "dust"]),
    ("Mess/Food", &["food", "mess"]),
];

/// Category for a description, `General` when no keyword matches
pub fn categorise(description: &str) -> &'static str {
    let description = description.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| description.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or("General")
}

/// Severity for a description, `urgent` overrides every other keyword
pub fn assess(description: &str) -> Severity {
    let description = description.to_lowercase();
    if description.contains("urgent") {
        Severity::High
    } else if ["fire", "danger", "spark"]
        .iter()
        .any(|keyword| description.contains(keyword))
    {
        Severity::Critical
    } else if description.contains("broken") || description.contains("not working") {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// First ten words of a description
pub fn summarise(description: &str) -> String {
    let words: Vec<&str> = description.split_whitespace().take(10).collect();
    format!("{}...", words.join(" "))
}

/// Ranking score, upvotes count twice and severity ten times its weight
pub fn priority(upvotes: u32, severity: Severity) -> f64 {
    f64::from(upvotes) * 2.0 + f64::from(severity.weight()) * 10.0
}
