//! Domain logic - pure business rules independent of git operations

pub mod bump;
pub mod commit;
pub mod commit_type;
pub mod tag;
pub mod version;

pub use bump::BumpSeverity;
pub use commit::ParsedCommit;
pub use commit_type::CommitType;
pub use tag::{release_ref_name, tag_name, ReleaseTag};
pub use version::{bump_version, parse_tolerant};
