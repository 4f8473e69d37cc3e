use std::fmt;

/// Non-fatal issues met while walking history. Reported to the user, never
/// turned into errors.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A tag matches the release prefix but holds no semantic version
    UnparsableTag { tag: String, reason: String },
    /// No release tag is reachable; the configured base version is used
    NoReleaseTag { base_version: String },
    /// A conventional subject carries a type outside the grammar
    UnknownCommitType {
        commit_hash: String,
        summary: String,
    },
}

impl BoundaryWarning {
    pub fn is_about_tag(&self, name: &str) -> bool {
        matches!(self, BoundaryWarning::UnparsableTag { tag, .. } if tag == name)
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::NoReleaseTag { base_version } => {
                write!(
                    f,
                    "No release tag found in history, bumping from {}",
                    base_version
                )
            }
            BoundaryWarning::UnknownCommitType {
                commit_hash,
                summary,
            } => {
                let short_hash = if commit_hash.len() > 7 {
                    &commit_hash[..7]
                } else {
                    commit_hash.as_str()
                };
                write!(f, "Unknown commit type in {} '{}'", short_hash, summary)
            }
        }
    }
}
