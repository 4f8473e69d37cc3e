use std::fmt;

use super::{CommitType, ParsedCommit};

/// Size of the version increment implied by a set of commits.
///
/// Ordered `None < Patch < Minor < Major`; aggregation over a commit range keeps
/// the highest value reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BumpSeverity {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl BumpSeverity {
    /// Fold one commit into the aggregated severity.
    ///
    /// A commit that failed to parse contributes nothing. Otherwise, in order:
    /// breaking changes yield `Major`, `feat` raises to at least `Minor`, and
    /// `fix` yields `Patch` only while nothing has been recorded yet.
    pub fn next(self, commit: Option<&ParsedCommit>) -> Self {
        let Some(commit) = commit else {
            return self;
        };

        if commit.is_breaking_change {
            return BumpSeverity::Major;
        }

        match commit.r#type {
            CommitType::Feat => self.max(BumpSeverity::Minor),
            CommitType::Fix if self == BumpSeverity::None => BumpSeverity::Patch,
            _ => self,
        }
    }

    /// Fold a raw commit message into the aggregated severity
    pub fn next_from_message(self, message: &str) -> Self {
        self.next(ParsedCommit::parse(message).as_ref())
    }

    pub fn is_none(&self) -> bool {
        *self == BumpSeverity::None
    }
}

impl fmt::Display for BumpSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpSeverity::None => "none",
            BumpSeverity::Patch => "patch",
            BumpSeverity::Minor => "minor",
            BumpSeverity::Major => "major",
        };
        f.write_str(name)
    }
}
