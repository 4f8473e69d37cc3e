//! Release version engine
//!
//! Walks mainline history back from a starting commit, asking `describe` where
//! the nearest release tag is. Every commit strictly after that tag is folded
//! into a [BumpSeverity]; the walk ends once the describe offset collapses to
//! the tag commit itself.

use std::ops::ControlFlow;
use std::sync::LazyLock;

use git2::Oid;
use log::{debug, warn};
use regex::Regex;
use semver::Version;

use super::walk::FirstParentWalk;
use crate::boundary::BoundaryWarning;
use crate::domain::tag::describe_pattern;
use crate::domain::{bump_version, parse_tolerant, release_ref_name, BumpSeverity};
use crate::error::{Result, SemrelError};
use crate::git::{short_id, Repository};

static DESCRIBE_SUFFIX_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"-(\d+)-g?[0-9a-f]{7,40}$").ok());

/// Split a describe string into its base version and commit offset.
///
/// `v1.0.0` is the tag commit itself (offset 1); `v1.0.0-2-gab23e5f` is two
/// commits after it (offset 3). The version is `None` when the tag name does
/// not hold a SemVer version.
///
/// # Example
/// ```rust
/// # use git_semrel::analyzer::parse_description;
/// # use semver::Version;
/// let (version, offset) = parse_description("v1.0.0-2-ab23e5f1", "v").unwrap();
/// assert_eq!(version, Some(Version::new(1, 0, 0)));
/// assert_eq!(offset, 3);
/// ```
pub fn parse_description(description: &str, prefix: &str) -> Result<(Option<Version>, usize)> {
    let suffix_re = DESCRIBE_SUFFIX_RE
        .as_ref()
        .ok_or_else(|| SemrelError::repository("describe pattern failed to compile"))?;

    let mut tag = description.trim();
    let mut offset = 1;

    if let Some(captures) = suffix_re.captures(tag) {
        let distance: usize = captures[1].parse().map_err(|e| {
            SemrelError::repository(format!("Malformed describe output '{}': {}", description, e))
        })?;
        offset = distance + 1;
        tag = &tag[..tag.len() - captures[0].len()];
    }

    let version_part = tag.strip_prefix(prefix).unwrap_or(tag);
    Ok((parse_tolerant(version_part), offset))
}

/// Per-walk accumulator, threaded through each step of the fold
#[derive(Debug, Clone, PartialEq)]
pub struct WalkState {
    pub severity: BumpSeverity,
    pub current_version: Version,
    pub commits_since_tag: usize,
    pub base_tag: Option<String>,
    pub visited: usize,
    pub warnings: Vec<BoundaryWarning>,
}

impl WalkState {
    pub fn new(base_version: Version) -> Self {
        WalkState {
            severity: BumpSeverity::None,
            current_version: base_version,
            commits_since_tag: 0,
            base_tag: None,
            visited: 0,
            warnings: Vec::new(),
        }
    }
}

/// Outcome of a release computation
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    /// Commit the release is computed for
    pub target: Oid,
    /// Version the bump starts from
    pub base_version: Version,
    /// Tag the base version came from, if any
    pub base_tag: Option<String>,
    pub severity: BumpSeverity,
    /// Next version; equal to `base_version` when there is nothing to release
    pub next_version: Version,
    /// Commits classified during the walk
    pub commits: usize,
    pub warnings: Vec<BoundaryWarning>,
}

impl ReleasePlan {
    pub fn is_noop(&self) -> bool {
        self.severity.is_none()
    }
}

/// Computes and tags the next release of a repository
pub struct ReleaseEngine<'a, R: Repository> {
    repo: &'a R,
    tag_prefix: String,
    base_version: Version,
}

impl<'a, R: Repository> ReleaseEngine<'a, R> {
    /// Create an engine for tags named `<tag_prefix><version>`, starting from
    /// `0.0.0` when no release tag exists yet
    pub fn new(repo: &'a R, tag_prefix: impl Into<String>) -> Self {
        ReleaseEngine {
            repo,
            tag_prefix: tag_prefix.into(),
            base_version: Version::new(0, 0, 0),
        }
    }

    /// Version to bump from when history holds no release tag
    pub fn with_base_version(mut self, base_version: Version) -> Self {
        self.base_version = base_version;
        self
    }

    pub fn tag_prefix(&self) -> &str {
        &self.tag_prefix
    }

    /// Compute the next release version for `start`.
    ///
    /// Any repository failure aborts the walk; nothing is written.
    pub fn next_release_version(&self, start: Oid) -> Result<ReleasePlan> {
        let pattern = describe_pattern(&self.tag_prefix);
        let mut state = WalkState::new(self.base_version.clone());

        for commit in FirstParentWalk::new(self.repo, start) {
            match self.step(state, commit?, &pattern)? {
                ControlFlow::Continue(next) => state = next,
                ControlFlow::Break(done) => {
                    state = done;
                    break;
                }
            }
        }

        debug!(
            "walk finished after {} commits: severity {}, base {}",
            state.visited, state.severity, state.current_version
        );

        Ok(ReleasePlan {
            target: start,
            next_version: bump_version(&state.current_version, state.severity)?,
            base_version: state.current_version,
            base_tag: state.base_tag,
            severity: state.severity,
            commits: state.visited,
            warnings: state.warnings,
        })
    }

    fn step(
        &self,
        mut state: WalkState,
        commit: Oid,
        pattern: &str,
    ) -> Result<ControlFlow<WalkState, WalkState>> {
        let Some(description) = self.repo.describe(commit, pattern)? else {
            debug!("{}: no release tag reachable", short_id(commit));
            return self.classify(state, commit).map(ControlFlow::Continue);
        };

        let (version, offset) = parse_description(&description, &self.tag_prefix)?;
        debug!("{}: described as {} (offset {})", short_id(commit), description, offset);
        state.commits_since_tag = offset;

        match version {
            Some(version) => {
                state.current_version = version;
                state.base_tag = Some(strip_describe_suffix(&description, offset));
            }
            None => {
                let tag = strip_describe_suffix(&description, offset);
                if !state.warnings.iter().any(|w| w.is_about_tag(&tag)) {
                    warn!("tag '{}' does not hold a version, ignoring it", tag);
                    state.warnings.push(BoundaryWarning::UnparsableTag {
                        tag,
                        reason: "not a semantic version".to_string(),
                    });
                }
            }
        }

        if offset <= 1 {
            return Ok(ControlFlow::Break(state));
        }
        self.classify(state, commit).map(ControlFlow::Continue)
    }

    fn classify(&self, mut state: WalkState, commit: Oid) -> Result<WalkState> {
        state.visited += 1;
        // Major cannot be exceeded; skip reading the remaining messages
        if state.severity == BumpSeverity::Major {
            return Ok(state);
        }

        let message = self.repo.read_commit_message(commit)?;
        let severity = state.severity.next_from_message(&message);
        if severity != state.severity {
            debug!(
                "{}: {} -> {} ({})",
                short_id(commit),
                state.severity,
                severity,
                crate::git::summary(&message)
            );
        }
        state.severity = severity;
        Ok(state)
    }

    /// Tag `target` with `version`, returning the full reference name.
    ///
    /// With `dry_run` set, the repository is never written to.
    pub fn create_release_tag(&self, version: &Version, target: Oid, dry_run: bool) -> Result<String> {
        let ref_name = release_ref_name(&self.tag_prefix, version);

        if dry_run {
            debug!("{} would be created on {}", ref_name, target);
            return Ok(ref_name);
        }

        self.repo.create_tag_ref(&ref_name, target)?;
        debug!("{} --> {}", target, ref_name);
        Ok(ref_name)
    }
}

fn strip_describe_suffix(description: &str, offset: usize) -> String {
    let description = description.trim();
    if offset <= 1 {
        return description.to_string();
    }
    DESCRIBE_SUFFIX_RE
        .as_ref()
        .and_then(|re| re.find(description))
        .map(|m| description[..m.start()].to_string())
        .unwrap_or_else(|| description.to_string())
}
