use semver::Version;

use super::BumpSeverity;
use crate::error::{Result, SemrelError};

/// Apply a bump to a version.
///
/// - **Major**: major += 1, minor = patch = 0; below 1.0.0 the minor component
///   is bumped instead, as breaking changes are expected during initial development
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
/// - **None**: unchanged
///
/// Pre-release and build metadata are dropped by every effective bump. A
/// component that cannot be incremented is a [SemrelError::Version].
///
/// # Example
/// ```rust
/// # use git_semrel::domain::{bump_version, BumpSeverity};
/// # use semver::Version;
/// let v = Version::new(3, 4, 7);
/// assert_eq!(bump_version(&v, BumpSeverity::Major)?, Version::new(4, 0, 0));
/// assert_eq!(bump_version(&Version::new(0, 0, 0), BumpSeverity::Major)?, Version::new(0, 1, 0));
/// # Ok::<(), git_semrel::SemrelError>(())
/// ```
pub fn bump_version(current: &Version, severity: BumpSeverity) -> Result<Version> {
    let next = match severity {
        BumpSeverity::None => return Ok(current.clone()),
        BumpSeverity::Major if current.major == 0 => {
            increment(current.minor).map(|minor| Version::new(0, minor, 0))
        }
        BumpSeverity::Major => increment(current.major).map(|major| Version::new(major, 0, 0)),
        BumpSeverity::Minor => {
            increment(current.minor).map(|minor| Version::new(current.major, minor, 0))
        }
        BumpSeverity::Patch => increment(current.patch)
            .map(|patch| Version::new(current.major, current.minor, patch)),
    };
    next.ok_or_else(|| SemrelError::version(format!("Cannot apply a {} bump to {}", severity, current)))
}

fn increment(component: u64) -> Option<u64> {
    component.checked_add(1)
}

/// Parse a version leniently.
///
/// Strips surrounding whitespace and a leading `v`/`V`, and pads missing
/// components with zeros (`1.2` becomes `1.2.0`). Returns `None` when the
/// remainder is still not a valid SemVer version.
pub fn parse_tolerant(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    // Pad short core versions, keeping any pre-release or build suffix
    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split);
    let components = core.split('.').count();
    if core.is_empty() || components >= 3 {
        return None;
    }
    let padded = format!("{}{}{}", core, ".0".repeat(3 - components), suffix);
    Version::parse(&padded).ok()
}

/// Parse a version strictly, for configuration values
pub fn parse_version(input: &str) -> Result<Version> {
    parse_tolerant(input)
        .ok_or_else(|| SemrelError::version(format!("Invalid version '{}': expected X.Y.Z", input)))
}
