//! Git operations abstraction layer
//!
//! The release engine and the commit workflow never talk to libgit2 directly.
//! They depend on the [Repository] trait, implemented by:
//!
//! - [repository::Git2Repository]: a real repository through the `git2` crate
//! - [mock::MockRepository]: an in-memory history for tests
//!
//! ```rust
//! # use git_semrel::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_semrel::Result<()> {
//! let head = repo.current_reference()?;
//! if let Some(description) = repo.describe(head, "v*")? {
//!     println!("HEAD is {}", description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Repository operations consumed by git-semrel
///
/// Implementations are read-only except for [Repository::create_tag_ref] and
/// [Repository::create_commit].
pub trait Repository: Send + Sync {
    /// Commit the workspace currently points to (HEAD)
    fn current_reference(&self) -> Result<Oid>;

    /// Resolve a revision (`HEAD~2`, a branch, a tag, a hash) to a commit
    fn resolve_reference(&self, spec: &str) -> Result<Oid>;

    /// Describe a commit against the nearest tag matching `pattern`
    ///
    /// Considers a single candidate and follows first parents only. Returns the
    /// tag name when the commit is tagged, `<tag>-<N>-g<abbrev>` when it is `N`
    /// commits after the tag, and `Ok(None)` when no matching tag is reachable.
    fn describe(&self, commit: Oid, pattern: &str) -> Result<Option<String>>;

    /// Full message of a commit
    fn read_commit_message(&self, commit: Oid) -> Result<String>;

    /// Parents of a commit; the first parent is the mainline
    fn commit_parents(&self, commit: Oid) -> Result<Vec<Oid>>;

    /// Create a lightweight tag reference such as `refs/tags/v1.2.0`
    ///
    /// Fails with [crate::SemrelError::AlreadyExists] instead of overwriting.
    fn create_tag_ref(&self, ref_name: &str, target: Oid) -> Result<()>;

    /// All tags as (short name, peeled commit) pairs, sorted by name
    fn list_tags(&self) -> Result<Vec<(String, Oid)>>;

    /// Commit the staged index on top of HEAD with `message`
    fn create_commit(&self, message: &str) -> Result<Oid>;

    /// Whether the index holds changes to commit
    ///
    /// `Ok(false)` for a clean working tree. Changes that exist only in the
    /// working tree are a [crate::SemrelError::Validation] error.
    fn stage_ready(&self) -> Result<bool>;

    /// HEAD and the commits of every reference under `refs/`, without duplicates
    fn reference_tips(&self) -> Result<Vec<Oid>>;

    /// Message, identities and time of a commit
    fn read_commit(&self, commit: Oid) -> Result<CommitInfo>;
}

/// Commit metadata shown by the history viewer
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    pub id: Oid,
    pub message: String,
    /// `Name <email>`
    pub author: String,
    pub committer: String,
    /// Committer time in seconds since the Unix epoch
    pub time: i64,
}

/// First line of a commit message
pub fn summary(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

/// Abbreviated hash used in describe output and listings
pub fn short_id(oid: Oid) -> String {
    let mut hex = oid.to_string();
    hex.truncate(7);
    hex
}
