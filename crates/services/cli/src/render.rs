use std::fmt::Write;

use campusfix_models::v0::{Analytics, Issue, SafetyReport, User};

pub fn issue(issue: &Issue) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{} [{}] {} ({}, {})",
        issue.id,
        issue.status,
        issue.summary.as_deref().unwrap_or(&issue.text),
        issue.category,
        issue.severity.as_str()
    );
    let _ = writeln!(out, "    at {}", issue.location);
    let _ = writeln!(
        out,
        "    priority {:.0}, {} upvotes, reported {}",
        issue.priority, issue.upvotes, issue.created_at
    );

    if let Some(image) = &issue.image {
        let _ = writeln!(out, "    photo {image}");
    }

    if !issue.timeline.is_empty() {
        let _ = writeln!(out, "    {}", issue.timeline.join(" -> "));
    }

    out
}

pub fn issues(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No issues found\n".to_string();
    }

    issues.iter().map(issue).collect()
}

pub fn analytics(analytics: &Analytics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total issues:    {}", analytics.total_issues);
    let _ = writeln!(out, "Resolved issues: {}", analytics.resolved_issues);
    let _ = writeln!(out, "Active issues:   {}", analytics.active());

    let mut categories: Vec<_> = analytics.by_category.iter().collect();
    categories.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (category, count) in categories {
        let _ = writeln!(out, "  {category:<14} {count}");
    }

    out
}

pub fn user(user: &User) -> String {
    match &user.email {
        Some(email) => format!("{} <{email}>", user.name),
        None => user.name.clone(),
    }
}

pub fn safety_reports(reports: &[SafetyReport]) -> String {
    if reports.is_empty() {
        return "No reports\n".to_string();
    }

    reports
        .iter()
        .map(|report| {
            format!(
                "#{} [{}{}] {} at {} ({})\n",
                report.id,
                report.status,
                if report.is_critical { ", critical" } else { "" },
                report.description,
                report.location,
                report.created_at
            )
        })
        .collect()
}
