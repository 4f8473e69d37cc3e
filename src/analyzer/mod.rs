//! History analysis: release computation, convention checks and the log view

pub mod compliance;
pub mod history;
pub mod release;
pub mod walk;

pub use compliance::{check_history, ComplianceReport, Offender};
pub use history::{collect_log, parse_date, LogEntry, LogFilter};
pub use release::{parse_description, ReleaseEngine, ReleasePlan, WalkState};
pub use walk::{Ancestry, FirstParentWalk};

use crate::domain::ReleaseTag;
use crate::error::Result;
use crate::git::Repository;

/// Release tags carrying `prefix`, in ascending SemVer precedence
pub fn release_tags<R: Repository>(repo: &R, prefix: &str) -> Result<Vec<ReleaseTag>> {
    let mut tags: Vec<ReleaseTag> = repo
        .list_tags()?
        .into_iter()
        .filter_map(|(name, target)| ReleaseTag::from_tag_name(&name, prefix, target))
        .collect();
    tags.sort();
    Ok(tags)
}
