use std::cmp::Ordering;
use std::fmt;

use git2::Oid;
use semver::Version;

use super::version::parse_tolerant;

/// Namespace of tag references
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// A release tag: a SemVer version and the commit its tag points to
///
/// Ordered by SemVer precedence of the version (pre-releases sort before the
/// release they precede), then by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub version: Version,
    pub target: Oid,
}

impl ReleaseTag {
    /// Build a release tag from a tag name carrying `prefix`.
    ///
    /// Returns `None` when the name lacks the prefix or the rest is not a version.
    pub fn from_tag_name(name: &str, prefix: &str, target: Oid) -> Option<Self> {
        let short = name.strip_prefix(TAG_REF_PREFIX).unwrap_or(name);
        let version = parse_tolerant(short.strip_prefix(prefix)?)?;

        Some(ReleaseTag {
            name: short.to_string(),
            version,
            target,
        })
    }
}

impl Ord for ReleaseTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for ReleaseTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Short tag name for a version, e.g. `v1.2.3`
pub fn tag_name(prefix: &str, version: &Version) -> String {
    format!("{}{}", prefix, version)
}

/// Full reference name for a version, e.g. `refs/tags/v1.2.3`
pub fn release_ref_name(prefix: &str, version: &Version) -> String {
    format!("{}{}", TAG_REF_PREFIX, tag_name(prefix, version))
}

/// Describe pattern matching every tag carrying `prefix`
pub fn describe_pattern(prefix: &str) -> String {
    format!("{}*", prefix)
}
