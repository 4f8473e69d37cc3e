//! Commit type grammar
//!
//! Maps user supplied tokens ("feat", "f", "Fixes", ...) onto the closed set of
//! conventional commit types. Each type owns one case-insensitive pattern; the
//! patterns are mutually exclusive, so the table order only fixes evaluation order.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Conventional commit type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommitType {
    /// No recognized type. Only produced by classification.
    #[default]
    Unknown,
    Build,
    Ci,
    Chore,
    Docs,
    Feat,
    Fix,
    Perf,
    Refactor,
    Style,
    Test,
}

const PATTERNS: [(&str, CommitType); 10] = [
    (r"(?i)^b(?:uilds?)?$", CommitType::Build),
    (r"(?i)^ci$", CommitType::Ci),
    (r"(?i)^ch(?:ores?)?$", CommitType::Chore),
    (r"(?i)^d(?:ocs?)?$", CommitType::Docs),
    (r"(?i)^fe(?:at(?:ure)?s?)?$", CommitType::Feat),
    (r"(?i)^fi(?:x(?:es)?)?$", CommitType::Fix),
    (r"(?i)^p(?:erf(?:ormance)?s?)?$", CommitType::Perf),
    (r"(?i)^r(?:efactors?)?$", CommitType::Refactor),
    (r"(?i)^s(?:tyles?)?$", CommitType::Style),
    (r"(?i)^t(?:ests?)?$", CommitType::Test),
];

static GRAMMAR: LazyLock<Vec<(Regex, CommitType)>> = LazyLock::new(|| {
    PATTERNS
        .iter()
        .filter_map(|(pattern, ctype)| Regex::new(pattern).ok().map(|re| (re, *ctype)))
        .collect()
});

impl CommitType {
    /// Every recognized type, in canonical order
    pub const ALL: [CommitType; 10] = [
        CommitType::Build,
        CommitType::Ci,
        CommitType::Chore,
        CommitType::Docs,
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Perf,
        CommitType::Refactor,
        CommitType::Style,
        CommitType::Test,
    ];

    /// Classify a token, returning [CommitType::Unknown] when no pattern matches.
    ///
    /// # Example
    /// ```rust
    /// # use git_semrel::domain::CommitType;
    /// assert_eq!(CommitType::find("fe"), CommitType::Feat);
    /// assert_eq!(CommitType::find("Fixes"), CommitType::Fix);
    /// assert_eq!(CommitType::find("wip"), CommitType::Unknown);
    /// ```
    pub fn find(token: &str) -> Self {
        GRAMMAR
            .iter()
            .find(|(re, _)| re.is_match(token))
            .map(|(_, ctype)| *ctype)
            .unwrap_or(CommitType::Unknown)
    }

    /// Canonical string form; empty for [CommitType::Unknown]
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Unknown => "",
            CommitType::Build => "build",
            CommitType::Ci => "ci",
            CommitType::Chore => "chore",
            CommitType::Docs => "docs",
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Perf => "perf",
            CommitType::Refactor => "refactor",
            CommitType::Style => "style",
            CommitType::Test => "test",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != CommitType::Unknown
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
