use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::CommitType;
use crate::error::{Result, SemrelError};

static SUBJECT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)(?:\((?P<scope>[^)]+)\))?(?P<bc>!)?: (?P<subject>.+)$").ok()
});

static FOOTER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:BREAKING CHANGE|[\w-]+)(?: #|: )").ok());

/// Parsed representation of a conventional commit message
///
/// Formats as `type(scope)!: description`, followed by the optional body and
/// footers, each separated by a blank line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommit {
    pub r#type: CommitType,
    pub scope: Option<String>,
    pub description: String,
    pub body: Option<String>,
    pub footers: Vec<String>,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Create a commit with only a type and a description
    pub fn new(r#type: CommitType, description: impl Into<String>) -> Self {
        ParsedCommit {
            r#type,
            description: description.into(),
            ..Default::default()
        }
    }

    /// Parse a commit message.
    ///
    /// Returns `None` when the first line is not of the form
    /// `type(scope)!: description`. A structurally valid subject with an
    /// unrecognized type still parses, with [CommitType::Unknown] as its type.
    ///
    /// Lines after the subject that look like trailers (`Token: value` or
    /// `Token #value`) become footers; every other line belongs to the body.
    /// This holds for body lines too: a formatted body line such as
    /// `Note: text` reads back as a footer.
    pub fn parse(message: &str) -> Option<Self> {
        let subject_re = SUBJECT_RE.as_ref()?;
        let mut lines = message.split('\n').map(|line| line.trim_end_matches('\r'));

        let captures = subject_re.captures(lines.next()?)?;
        let r#type = CommitType::find(captures.name("type")?.as_str());
        let scope = captures.name("scope").map(|m| m.as_str().to_string());
        let is_breaking_change = captures.name("bc").is_some();
        let description = captures.name("subject")?.as_str().to_string();

        let mut body_lines = Vec::new();
        let mut footers = Vec::new();
        for line in lines {
            if FOOTER_RE.as_ref().is_some_and(|re| re.is_match(line)) {
                footers.push(line.to_string());
            } else {
                body_lines.push(line);
            }
        }

        Some(ParsedCommit {
            r#type,
            scope,
            description,
            body: join_body(&body_lines),
            footers,
            is_breaking_change,
        })
    }

    /// Right-biased merge: every field set on `other` replaces the one on `self`.
    ///
    /// Unset fields (unknown type, empty strings, no footers, non-breaking) leave
    /// the current value in place, so a lone `--scope` never erases a description.
    pub fn overwrite(mut self, other: ParsedCommit) -> Self {
        if other.r#type.is_known() {
            self.r#type = other.r#type;
        }
        if other.scope.as_deref().is_some_and(|s| !s.is_empty()) {
            self.scope = other.scope;
        }
        if !other.description.is_empty() {
            self.description = other.description;
        }
        if other.body.as_deref().is_some_and(|b| !b.is_empty()) {
            self.body = other.body;
        }
        if !other.footers.is_empty() {
            self.footers = other.footers;
        }
        if other.is_breaking_change {
            self.is_breaking_change = true;
        }
        self
    }

    /// Validate that the message can be written as a commit
    pub fn check(&self) -> Result<()> {
        if !self.r#type.is_known() {
            return Err(SemrelError::validation("a commit type is required"));
        }
        if self.description.is_empty() {
            return Err(SemrelError::validation("a commit description is required"));
        }
        Ok(())
    }

    /// Format the message according to Conventional Commits 1.0.0
    pub fn format(&self) -> String {
        self.to_string()
    }
}

fn join_body(lines: &[&str]) -> Option<String> {
    let start = lines.iter().position(|l| !l.trim().is_empty())?;
    let end = lines.iter().rposition(|l| !l.trim().is_empty())?;
    Some(lines[start..=end].join("\n"))
}

impl fmt::Display for ParsedCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.r#type)?;
        if let Some(scope) = self.scope.as_deref().filter(|s| !s.is_empty()) {
            write!(f, "({})", scope)?;
        }
        if self.is_breaking_change {
            f.write_str("!")?;
        }
        write!(f, ": {}", self.description)?;
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            write!(f, "\n\n{}", body)?;
        }
        if !self.footers.is_empty() {
            f.write_str("\n")?;
            for footer in &self.footers {
                write!(f, "\n{}", footer)?;
            }
        }
        Ok(())
    }
}

impl FromStr for ParsedCommit {
    type Err = SemrelError;

    fn from_str(s: &str) -> Result<Self> {
        ParsedCommit::parse(s).ok_or_else(|| {
            SemrelError::NotConventional(s.lines().next().unwrap_or_default().to_string())
        })
    }
}
