//! Workflow orchestration
//!
//! Each workflow takes plain argument structs rather than clap types, so it can
//! be driven programmatically and tested against a [MockRepository].
//!
//! [MockRepository]: crate::git::MockRepository

use anyhow::{bail, Context, Result};
use git2::Oid;
use log::debug;
use semver::Version;

use crate::analyzer::{
    check_history, collect_log, parse_date, release_tags, ComplianceReport, LogEntry, LogFilter,
    ReleaseEngine,
};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{BumpSeverity, CommitType, ParsedCommit, ReleaseTag};
use crate::git::{short_id, Repository};
use crate::ui;

/// Arguments for the release workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    /// Revision to release; HEAD when absent
    pub from: Option<String>,

    /// Overrides the configured tag prefix
    pub tag_prefix: Option<String>,

    /// Preview mode - compute and print, never tag
    pub dry_run: bool,
}

/// Result of a release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Full reference of the release tag; `None` when there was nothing to release
    pub tag: Option<String>,

    pub version: Version,

    pub severity: BumpSeverity,

    /// Whether the tag was written to the repository
    pub created: bool,
}

/// Arguments for the commit workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommitWorkflowArgs {
    /// Explicit type token; otherwise the first message word is used
    pub r#type: Option<String>,

    /// Message words, joined with spaces
    pub message: Vec<String>,

    pub scope: Option<String>,

    pub breaking: bool,

    pub body: Option<String>,

    pub footers: Vec<String>,

    /// Print the message instead of committing
    pub dry_run: bool,
}

/// Arguments for the history viewer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogWorkflowArgs {
    /// Revision to list from; HEAD when absent
    pub from: Option<String>,

    /// List the history of every reference, ignoring `from`
    pub all: bool,

    /// Type tokens, abbreviations allowed
    pub types: Vec<String>,

    pub scopes: Vec<String>,

    pub breaking_only: bool,

    pub since: Option<String>,

    pub until: Option<String>,
}

fn resolve_start<R: Repository>(repo: &R, from: Option<&str>) -> Result<Oid> {
    let start = match from {
        Some(spec) => repo.resolve_reference(spec),
        None => repo.current_reference(),
    };
    start.context("Cannot resolve the starting commit")
}

fn walk_tips<R: Repository>(repo: &R, from: Option<&str>, all: bool) -> Result<Vec<Oid>> {
    if all {
        return repo
            .reference_tips()
            .context("Cannot list repository references");
    }
    Ok(vec![resolve_start(repo, from)?])
}

/// Compute the next release and tag it.
///
/// 1. Walk history from the starting commit to the nearest release tag
/// 2. Report the computed bump
/// 3. Create the tag, unless there is nothing to release or this is a dry run
pub fn run_release<R: Repository>(
    repo: &R,
    args: &ReleaseWorkflowArgs,
    config: &Config,
) -> Result<WorkflowResult> {
    let prefix = args
        .tag_prefix
        .clone()
        .unwrap_or_else(|| config.release.tag_prefix.clone());
    let base_version = config.release.base_version()?;
    let start = resolve_start(repo, args.from.as_deref())?;

    let engine = ReleaseEngine::new(repo, prefix.as_str()).with_base_version(base_version);
    let plan = engine
        .next_release_version(start)
        .context("Failed to compute the next release")?;

    for warning in &plan.warnings {
        ui::display_boundary_warning(warning);
    }
    if plan.base_tag.is_none() {
        ui::display_boundary_warning(&BoundaryWarning::NoReleaseTag {
            base_version: plan.base_version.to_string(),
        });
    }
    ui::display_release_plan(&plan, &prefix);

    if plan.is_noop() {
        ui::display_status("Nothing to release");
        return Ok(WorkflowResult {
            tag: None,
            version: plan.base_version,
            severity: plan.severity,
            created: false,
        });
    }

    let ref_name = engine
        .create_release_tag(&plan.next_version, start, args.dry_run)
        .with_context(|| format!("Failed to tag {}", short_id(start)))?;

    if args.dry_run {
        ui::display_status(&format!("{} would be created on {}", ref_name, start));
    } else {
        ui::display_success(&format!("{} --> {}", short_id(start), ref_name));
    }

    Ok(WorkflowResult {
        tag: Some(ref_name),
        version: plan.next_version,
        severity: plan.severity,
        created: !args.dry_run,
    })
}

/// Build the commit message from arguments.
///
/// A message that already parses as a conventional commit is the starting
/// point; explicit flags are then laid over it. Without an explicit type, the
/// first word of a free-form message is taken as the type.
pub fn build_commit_message(args: &CommitWorkflowArgs) -> crate::Result<ParsedCommit> {
    let mut words = args.message.as_slice();
    let mut type_token = args.r#type.clone();

    let parsed = ParsedCommit::parse(&words.join(" "));
    if parsed.is_none() && type_token.is_none() {
        if let Some((first, rest)) = words.split_first() {
            type_token = Some(first.clone());
            words = rest;
        }
    }

    let detected = parsed.unwrap_or_else(|| ParsedCommit {
        description: words.join(" "),
        ..Default::default()
    });
    let flags = ParsedCommit {
        r#type: type_token
            .as_deref()
            .map(CommitType::find)
            .unwrap_or_default(),
        scope: args.scope.clone(),
        description: String::new(),
        body: args.body.clone(),
        footers: args.footers.clone(),
        is_breaking_change: args.breaking,
    };

    let message = detected.overwrite(flags);
    debug!("commit message resolved to {:?}", message);
    message.check()?;
    Ok(message)
}

/// Validate, format and commit the staged changes.
///
/// Returns `None` for a dry run and when there is nothing to commit.
pub fn run_commit<R: Repository>(repo: &R, args: &CommitWorkflowArgs) -> Result<Option<Oid>> {
    let message = build_commit_message(args)?;
    let formatted = message.format();

    if args.dry_run {
        println!("{}", formatted);
        return Ok(None);
    }

    if !repo.stage_ready()? {
        ui::display_status("Nothing to commit, working tree clean");
        return Ok(None);
    }

    let oid = repo
        .create_commit(&formatted)
        .context("Failed to write the commit")?;
    ui::display_success(&format!(
        "{} {}",
        short_id(oid),
        ui::format_commit_summary(&message)
    ));
    Ok(Some(oid))
}

/// Check that every ancestor of `from`, or of every reference with `all`, is a
/// conventional commit
pub fn run_check<R: Repository>(repo: &R, from: &str, all: bool) -> Result<ComplianceReport> {
    let tips = walk_tips(repo, Some(from), all)?;
    let report = check_history(repo, tips).context("Failed to walk history")?;

    ui::display_compliance_report(&report);
    if !report.is_compliant() {
        bail!(
            "{} of {} commits are not conventional",
            report.non_conventional.len(),
            report.checked
        );
    }
    Ok(report)
}

/// Build the history filter from arguments
pub fn build_log_filter(args: &LogWorkflowArgs) -> crate::Result<LogFilter> {
    let types = args
        .types
        .iter()
        .map(|token| match CommitType::find(token) {
            CommitType::Unknown => Err(crate::SemrelError::validation(format!(
                "unknown commit type '{}'",
                token
            ))),
            ctype => Ok(ctype),
        })
        .collect::<crate::Result<Vec<_>>>()?;

    Ok(LogFilter {
        types,
        scopes: args.scopes.clone(),
        breaking_only: args.breaking_only,
        since: args.since.as_deref().map(parse_date).transpose()?,
        until: args.until.as_deref().map(parse_date).transpose()?,
    })
}

/// List the commits matching the filters
pub fn run_log<R: Repository>(repo: &R, args: &LogWorkflowArgs) -> Result<Vec<LogEntry>> {
    let filter = build_log_filter(args)?;
    let tips = walk_tips(repo, args.from.as_deref(), args.all)?;
    let entries = collect_log(repo, tips, &filter).context("Failed to walk history")?;

    ui::display_log(&entries);
    Ok(entries)
}

/// List release tags in precedence order
pub fn run_list_tags<R: Repository>(repo: &R, prefix: &str) -> Result<Vec<ReleaseTag>> {
    let tags = release_tags(repo, prefix).context("Failed to list tags")?;
    ui::display_release_tags(&tags);
    Ok(tags)
}
