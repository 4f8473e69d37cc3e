use crate::domain::tag::TAG_REF_PREFIX;
use crate::error::{Result, SemrelError};
use crate::git::{short_id, CommitInfo, Repository};
use git2::Oid;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock};

/// A commit stored in a [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct MockCommit {
    pub message: String,
    pub parents: Vec<Oid>,
    /// Commit time in seconds since the Unix epoch
    pub time: i64,
}

/// Commit time of the first mock commit; each later commit is one hour younger
pub const MOCK_EPOCH: i64 = 1_600_000_000;

/// Identity recorded on every mock commit
pub const MOCK_IDENTITY: &str = "Mock User <mock@example.com>";

#[derive(Debug, Default)]
struct MockState {
    commits: HashMap<Oid, MockCommit>,
    tags: BTreeMap<String, Oid>,
    branches: BTreeMap<String, Oid>,
    head: Option<Oid>,
    // index matches HEAD, set by create_commit
    clean: bool,
}

impl MockState {
    fn insert_commit(&mut self, oid: Oid, message: String, parents: Vec<Oid>) {
        let time = MOCK_EPOCH + 3600 * self.commits.len() as i64;
        self.commits.insert(
            oid,
            MockCommit {
                message,
                parents,
                time,
            },
        );
    }
}

/// Mock repository for testing without actual git operations
///
/// `describe` follows first parents from the commit until it meets a tag matching
/// the pattern, mirroring `git describe --tags --first-parent --candidates=1`.
#[derive(Debug, Default)]
pub struct MockRepository {
    state: RwLock<MockState>,
    described: Mutex<Vec<Oid>>,
}

/// Deterministic OID made of a single repeated byte
pub fn fake_oid(n: u8) -> Oid {
    Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero())
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit with explicit parents
    pub fn add_commit(&mut self, oid: Oid, message: impl Into<String>, parents: &[Oid]) {
        self.state_mut()
            .insert_commit(oid, message.into(), parents.to_vec());
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.state_mut().tags.insert(name.into(), oid);
    }

    /// Add a branch reference pointing to an OID
    pub fn add_branch(&mut self, name: impl Into<String>, oid: Oid) {
        self.state_mut().branches.insert(name.into(), oid);
    }

    /// Override the commit time of a commit
    pub fn set_time(&mut self, oid: Oid, time: i64) {
        if let Some(commit) = self.state_mut().commits.get_mut(&oid) {
            commit.time = time;
        }
    }

    /// Mark the index as holding (or not holding) staged changes
    pub fn set_staged(&mut self, staged: bool) {
        self.state_mut().clean = !staged;
    }

    /// Point HEAD at a commit
    pub fn set_head(&mut self, oid: Oid) {
        self.state_mut().head = Some(oid);
    }

    /// Commit `message` on top of HEAD and advance HEAD
    pub fn commit(&mut self, message: impl Into<String>) -> Oid {
        let state = self.state_mut();
        let oid = next_free_oid(&state.commits);
        let parents = state.head.into_iter().collect();
        state.insert_commit(oid, message.into(), parents);
        state.head = Some(oid);
        oid
    }

    /// Target of a tag, if it exists
    pub fn tag_target(&self, name: &str) -> Option<Oid> {
        self.state().ok()?.tags.get(name).copied()
    }

    /// Every commit passed to `describe`, in call order
    pub fn described(&self) -> Vec<Oid> {
        self.described
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn state(&self) -> Result<std::sync::RwLockReadGuard<'_, MockState>> {
        self.state
            .read()
            .map_err(|_| SemrelError::repository("mock state poisoned"))
    }

    fn state_mut(&mut self) -> &mut MockState {
        match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn commit_info(state: &MockState, oid: Oid) -> Result<&MockCommit> {
        state
            .commits
            .get(&oid)
            .ok_or_else(|| SemrelError::repository(format!("Unknown commit {}", oid)))
    }
}

fn next_free_oid(commits: &HashMap<Oid, MockCommit>) -> Oid {
    (1..=u8::MAX)
        .map(fake_oid)
        .find(|oid| !commits.contains_key(oid))
        .unwrap_or_else(Oid::zero)
}

fn matches_pattern(name: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == pattern,
    }
}

impl Repository for MockRepository {
    fn current_reference(&self) -> Result<Oid> {
        self.state()?
            .head
            .ok_or_else(|| SemrelError::repository("HEAD does not point to a commit"))
    }

    fn resolve_reference(&self, spec: &str) -> Result<Oid> {
        if spec == "HEAD" {
            return self.current_reference();
        }
        let state = self.state()?;
        if let Some(oid) = state.tags.get(spec).or_else(|| state.branches.get(spec)) {
            return Ok(*oid);
        }
        Oid::from_str(spec)
            .ok()
            .filter(|oid| state.commits.contains_key(oid))
            .ok_or_else(|| SemrelError::repository(format!("Cannot resolve '{}'", spec)))
    }

    fn describe(&self, commit: Oid, pattern: &str) -> Result<Option<String>> {
        if let Ok(mut calls) = self.described.lock() {
            calls.push(commit);
        }

        let state = self.state()?;
        let mut current = commit;
        let mut distance = 0usize;

        loop {
            let info = Self::commit_info(&state, current)?;
            let tag = state
                .tags
                .iter()
                .filter(|(name, target)| **target == current && matches_pattern(name, pattern))
                .map(|(name, _)| name)
                .next_back();

            if let Some(tag) = tag {
                if distance == 0 {
                    return Ok(Some(tag.clone()));
                }
                return Ok(Some(format!("{}-{}-g{}", tag, distance, short_id(commit))));
            }

            match info.parents.first() {
                Some(parent) => {
                    current = *parent;
                    distance += 1;
                }
                None => return Ok(None),
            }
        }
    }

    fn read_commit_message(&self, commit: Oid) -> Result<String> {
        let state = self.state()?;
        Ok(Self::commit_info(&state, commit)?.message.clone())
    }

    fn commit_parents(&self, commit: Oid) -> Result<Vec<Oid>> {
        let state = self.state()?;
        Ok(Self::commit_info(&state, commit)?.parents.clone())
    }

    fn create_tag_ref(&self, ref_name: &str, target: Oid) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| SemrelError::repository("mock state poisoned"))?;

        let name = ref_name.strip_prefix(TAG_REF_PREFIX).ok_or_else(|| {
            SemrelError::repository(format!("'{}' is not a tag reference", ref_name))
        })?;
        if state.tags.contains_key(name) {
            return Err(SemrelError::AlreadyExists(ref_name.to_string()));
        }
        Self::commit_info(&state, target)?;

        state.tags.insert(name.to_string(), target);
        Ok(())
    }

    fn list_tags(&self) -> Result<Vec<(String, Oid)>> {
        Ok(self
            .state()?
            .tags
            .iter()
            .map(|(name, oid)| (name.clone(), *oid))
            .collect())
    }

    fn create_commit(&self, message: &str) -> Result<Oid> {
        let mut state = self
            .state
            .write()
            .map_err(|_| SemrelError::repository("mock state poisoned"))?;

        let oid = next_free_oid(&state.commits);
        let parents = state.head.into_iter().collect();
        state.insert_commit(oid, message.to_string(), parents);
        state.head = Some(oid);
        state.clean = true;
        Ok(oid)
    }

    fn stage_ready(&self) -> Result<bool> {
        Ok(!self.state()?.clean)
    }

    fn reference_tips(&self) -> Result<Vec<Oid>> {
        let state = self.state()?;
        let mut tips: Vec<Oid> = state.head.into_iter().collect();
        for oid in state.branches.values().chain(state.tags.values()) {
            if !tips.contains(oid) {
                tips.push(*oid);
            }
        }
        Ok(tips)
    }

    fn read_commit(&self, commit: Oid) -> Result<CommitInfo> {
        let state = self.state()?;
        let info = Self::commit_info(&state, commit)?;
        Ok(CommitInfo {
            id: commit,
            message: info.message.clone(),
            author: MOCK_IDENTITY.to_string(),
            committer: MOCK_IDENTITY.to_string(),
            time: info.time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged_history() -> (MockRepository, Vec<Oid>) {
        let mut repo = MockRepository::new();
        let root = repo.commit("chore: init");
        repo.add_tag("v1.0.0", root);
        let a = repo.commit("fix: a");
        let b = repo.commit("feat: b");
        (repo, vec![root, a, b])
    }

    #[test]
    fn test_commit_advances_head() {
        let (repo, oids) = tagged_history();
        assert_eq!(repo.current_reference().unwrap(), oids[2]);
        assert_eq!(repo.commit_parents(oids[2]).unwrap(), vec![oids[1]]);
        assert!(repo.commit_parents(oids[0]).unwrap().is_empty());
        assert_eq!(repo.read_commit_message(oids[1]).unwrap(), "fix: a");
    }

    #[test]
    fn test_describe_exact_and_offset() {
        let (repo, oids) = tagged_history();
        assert_eq!(repo.describe(oids[0], "v*").unwrap().as_deref(), Some("v1.0.0"));
        assert_eq!(
            repo.describe(oids[2], "v*").unwrap(),
            Some(format!("v1.0.0-2-g{}", short_id(oids[2])))
        );
        assert_eq!(repo.described(), vec![oids[0], oids[2]]);
    }

    #[test]
    fn test_describe_honours_pattern() {
        let (repo, oids) = tagged_history();
        assert_eq!(repo.describe(oids[2], "release-*").unwrap(), None);
        assert!(matches_pattern("v1.0.0", "v*"));
        assert!(matches_pattern("v1.0.0", "v1.0.0"));
        assert!(!matches_pattern("latest", "v*"));
    }

    #[test]
    fn test_describe_follows_first_parent_only() {
        let mut repo = MockRepository::new();
        let root = repo.commit("chore: init");
        let side = fake_oid(200);
        repo.add_commit(side, "feat: side", &[root]);
        repo.add_tag("v0.1.0", side);
        let merge = fake_oid(201);
        repo.add_commit(merge, "Merge side", &[root, side]);

        assert_eq!(repo.describe(merge, "v*").unwrap(), None);
    }

    #[test]
    fn test_describe_unknown_commit() {
        let repo = MockRepository::new();
        assert!(repo.describe(fake_oid(9), "v*").is_err());
    }

    #[test]
    fn test_create_tag_ref_refuses_overwrite() {
        let (repo, oids) = tagged_history();
        repo.create_tag_ref("refs/tags/v1.1.0", oids[2]).unwrap();
        assert_eq!(repo.tag_target("v1.1.0"), Some(oids[2]));

        let err = repo.create_tag_ref("refs/tags/v1.1.0", oids[1]).unwrap_err();
        assert!(matches!(err, SemrelError::AlreadyExists(_)));
        assert_eq!(repo.tag_target("v1.1.0"), Some(oids[2]));
    }

    #[test]
    fn test_resolve_reference() {
        let (repo, oids) = tagged_history();
        assert_eq!(repo.resolve_reference("HEAD").unwrap(), oids[2]);
        assert_eq!(repo.resolve_reference("v1.0.0").unwrap(), oids[0]);
        assert_eq!(repo.resolve_reference(&oids[1].to_string()).unwrap(), oids[1]);
        assert!(repo.resolve_reference("nope").is_err());
    }

    #[test]
    fn test_create_commit_through_trait() {
        let (repo, oids) = tagged_history();
        let oid = repo.create_commit("docs: readme").unwrap();
        assert_eq!(repo.current_reference().unwrap(), oid);
        assert_eq!(repo.commit_parents(oid).unwrap(), vec![oids[2]]);
    }

    #[test]
    fn test_stage_cleared_by_commit() {
        let (mut repo, _) = tagged_history();
        assert!(repo.stage_ready().unwrap());
        repo.create_commit("docs: readme").unwrap();
        assert!(!repo.stage_ready().unwrap());
        repo.set_staged(true);
        assert!(repo.stage_ready().unwrap());
    }

    #[test]
    fn test_reference_tips() {
        let (mut repo, oids) = tagged_history();
        let side = fake_oid(90);
        repo.add_commit(side, "fix: side", &[oids[0]]);
        repo.add_branch("side", side);
        repo.add_branch("main", oids[2]);

        assert_eq!(repo.reference_tips().unwrap(), vec![oids[2], side, oids[0]]);
        assert_eq!(repo.resolve_reference("side").unwrap(), side);
    }

    #[test]
    fn test_read_commit_times_increase() {
        let (mut repo, oids) = tagged_history();
        let first = repo.read_commit(oids[0]).unwrap();
        let last = repo.read_commit(oids[2]).unwrap();
        assert_eq!(first.time, MOCK_EPOCH);
        assert!(last.time > first.time);
        assert_eq!(last.author, MOCK_IDENTITY);

        repo.set_time(oids[0], 42);
        assert_eq!(repo.read_commit(oids[0]).unwrap().time, 42);
    }

    #[test]
    fn test_list_tags_sorted() {
        let (mut repo, oids) = tagged_history();
        repo.add_tag("v0.9.0", oids[0]);
        let names: Vec<String> = repo.list_tags().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["v0.9.0".to_string(), "v1.0.0".to_string()]);
    }
}
