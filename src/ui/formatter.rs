//! Formatting functions for UI output.
//!
//! `format_*` functions are pure and return strings; `display_*` functions print.

use chrono::DateTime;
use console::style;

use super::type_style;
use crate::analyzer::{ComplianceReport, LogEntry, ReleasePlan};
use crate::boundary::BoundaryWarning;
use crate::domain::{ParsedCommit, ReleaseTag};
use crate::git::short_id;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Commit subject with its type coloured
pub fn format_commit_summary(commit: &ParsedCommit) -> String {
    let mut subject = commit.clone();
    subject.body = None;
    subject.footers.clear();

    let plain = subject.format();
    let type_len = commit.r#type.as_str().len();
    format!(
        "{}{}",
        type_style(commit.r#type).apply_to(&plain[..type_len]),
        &plain[type_len..]
    )
}

/// Display the outcome of a release computation.
///
/// # Arguments
/// * `plan` - The computed release
/// * `tag_prefix` - Prefix used to name release tags
pub fn display_release_plan(plan: &ReleasePlan, tag_prefix: &str) {
    let from = match plan.base_tag.as_deref() {
        Some(tag) => tag.to_string(),
        None => format!("{} (no release tag)", plan.base_version),
    };

    println!("\n{}", style("Release analysis").bold());
    println!("  Base:    {}", style(from).red());
    println!("  Commits: {}", plan.commits);
    println!("  Bump:    {}", style(plan.severity).cyan());
    if !plan.is_noop() {
        println!(
            "  Next:    {}",
            style(format!("{}{}", tag_prefix, plan.next_version)).green()
        );
    }
}

/// Display offenders found by the compliance check
pub fn display_compliance_report(report: &ComplianceReport) {
    for offender in &report.unknown_type {
        display_boundary_warning(&BoundaryWarning::UnknownCommitType {
            commit_hash: offender.id.to_string(),
            summary: offender.summary.clone(),
        });
    }

    if report.is_compliant() {
        display_success(&format!("All {} commits are compliant", report.checked));
        return;
    }

    for offender in &report.non_conventional {
        eprintln!("{} {}", style(offender.short_id()).yellow(), offender.summary);
    }
}

/// Display release tags, one per line, newest last
pub fn display_release_tags(tags: &[ReleaseTag]) {
    if tags.is_empty() {
        display_status("No release tags");
        return;
    }

    println!("{}", style("Release tags:").bold());
    for tag in tags {
        println!("  {} {}", style(short_id(tag.target)).yellow(), tag.name);
    }
}

fn format_date(time: i64) -> String {
    match DateTime::from_timestamp(time, 0) {
        Some(date) => date.format("%a %b %e %H:%M:%S %Y UTC").to_string(),
        None => time.to_string(),
    }
}

/// One commit of the history view: header line, identities, type and scope, then body
pub fn format_log_entry(entry: &LogEntry) -> String {
    let commit = &entry.commit;
    let mut out = String::new();

    let (description, annotation) = match &entry.parsed {
        Some(parsed) => (
            parsed.description.clone(),
            parsed.is_breaking_change.then_some("!BREAKING CHANGE"),
        ),
        None => (
            crate::git::summary(&commit.message).to_string(),
            Some("!NOT CONVENTIONAL"),
        ),
    };
    out.push_str(&format!(
        "({}) {}",
        style(entry.short_id()).yellow(),
        style(description).bold()
    ));
    if let Some(annotation) = annotation {
        out.push_str(&format!(" - {}", style(annotation).white().on_red()));
    }
    out.push('\n');

    out.push_str(&format!("    Author:    {}\n", commit.author));
    out.push_str(&format!("    Committer: {}\n", commit.committer));
    out.push_str(&format!("    Date:      {}\n", format_date(commit.time)));

    let Some(parsed) = &entry.parsed else {
        return out;
    };
    out.push_str(&format!(
        "    Type:      {}\n",
        type_style(parsed.r#type).apply_to(parsed.r#type.as_str())
    ));
    out.push_str(&format!(
        "    Scope:     {}\n",
        style(parsed.scope.as_deref().unwrap_or("none")).cyan()
    ));

    if parsed.body.is_some() || !parsed.footers.is_empty() {
        out.push('\n');
        for line in parsed.body.iter().flat_map(|body| body.lines()) {
            out.push_str(&format!("    {}\n", line));
        }
        for footer in &parsed.footers {
            out.push_str(&format!("    {}\n", footer));
        }
    }
    out
}

/// Print the history view
pub fn display_log(entries: &[LogEntry]) {
    if entries.is_empty() {
        display_status("No matching commits");
        return;
    }
    for entry in entries {
        println!("{}", format_log_entry(entry));
    }
}
