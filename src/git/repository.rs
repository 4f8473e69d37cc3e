use super::CommitInfo;
use crate::error::{Result, SemrelError};
use git2::{
    DescribeFormatOptions, DescribeOptions, ErrorClass, ErrorCode, Oid, Signature, Status,
    StatusOptions, StatusShow,
};
use git2::Repository as Git2Repo;
use std::path::Path;
use std::sync::Mutex;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Git2Repo) -> Result<T>) -> Result<T> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| SemrelError::repository("repository handle poisoned"))?;
        f(&repo)
    }
}

impl super::Repository for Git2Repository {
    fn current_reference(&self) -> Result<Oid> {
        self.with_repo(|repo| {
            let head = repo
                .head()
                .map_err(|e| SemrelError::repository(format!("Cannot resolve HEAD: {}", e)))?;
            Ok(head.peel_to_commit()?.id())
        })
    }

    fn resolve_reference(&self, spec: &str) -> Result<Oid> {
        self.with_repo(|repo| {
            let object = repo.revparse_single(spec).map_err(|e| {
                SemrelError::repository(format!("Cannot resolve '{}': {}", spec, e))
            })?;
            Ok(object.peel_to_commit()?.id())
        })
    }

    fn describe(&self, commit: Oid, pattern: &str) -> Result<Option<String>> {
        self.with_repo(|repo| {
            let commit = repo.find_commit(commit)?;

            let mut options = DescribeOptions::new();
            options
                .describe_tags()
                .pattern(pattern)
                .max_candidates_tags(1)
                .only_follow_first_parent(true);

            let description = match commit.as_object().describe(&options) {
                Ok(description) => Some(description.format(Some(&DescribeFormatOptions::new()))?),
                // libgit2 reports "no tag can describe this commit" in the describe class
                Err(e) if e.class() == ErrorClass::Describe => None,
                Err(e) => return Err(e.into()),
            };
            Ok(description)
        })
    }

    fn read_commit_message(&self, commit: Oid) -> Result<String> {
        self.with_repo(|repo| {
            let commit = repo.find_commit(commit)?;
            let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
            Ok(message)
        })
    }

    fn commit_parents(&self, commit: Oid) -> Result<Vec<Oid>> {
        self.with_repo(|repo| Ok(repo.find_commit(commit)?.parent_ids().collect()))
    }

    fn create_tag_ref(&self, ref_name: &str, target: Oid) -> Result<()> {
        self.with_repo(|repo| {
            match repo.reference(ref_name, target, false, "git-semrel: release") {
                Ok(_) => Ok(()),
                Err(e) if e.code() == ErrorCode::Exists => {
                    Err(SemrelError::AlreadyExists(ref_name.to_string()))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn list_tags(&self) -> Result<Vec<(String, Oid)>> {
        self.with_repo(|repo| {
            let names = repo.tag_names(None)?;
            let mut tags = Vec::new();

            for name in names.iter().flatten() {
                let reference = repo.find_reference(&format!("refs/tags/{}", name))?;
                // Tags pointing at trees or blobs are not release candidates
                if let Ok(commit) = reference.peel_to_commit() {
                    tags.push((name.to_string(), commit.id()));
                }
            }

            tags.sort();
            Ok(tags)
        })
    }

    fn create_commit(&self, message: &str) -> Result<Oid> {
        self.with_repo(|repo| {
            let signature = repo.signature()?;
            let mut index = repo.index()?;
            // pick up changes staged by other processes since the repository was opened
            index.read(false)?;
            let tree_id = index.write_tree()?;
            let tree = repo.find_tree(tree_id)?;

            let parent = match repo.head() {
                Ok(head) => Some(head.peel_to_commit()?),
                Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                    None
                }
                Err(e) => return Err(e.into()),
            };
            let parents: Vec<&git2::Commit> = parent.iter().collect();

            let oid = repo.commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )?;
            Ok(oid)
        })
    }

    fn stage_ready(&self) -> Result<bool> {
        self.with_repo(|repo| {
            let mut options = StatusOptions::new();
            options
                .show(StatusShow::IndexAndWorkdir)
                .include_untracked(true)
                .include_ignored(false);
            let statuses = repo.statuses(Some(&mut options))?;
            if statuses.is_empty() {
                return Ok(false);
            }

            let staged = Status::INDEX_NEW
                | Status::INDEX_MODIFIED
                | Status::INDEX_DELETED
                | Status::INDEX_RENAMED
                | Status::INDEX_TYPECHANGE;
            if statuses.iter().any(|entry| entry.status().intersects(staged)) {
                return Ok(true);
            }
            Err(SemrelError::validation("No changes added to commit"))
        })
    }

    fn reference_tips(&self) -> Result<Vec<Oid>> {
        self.with_repo(|repo| {
            let mut tips = Vec::new();
            match repo.head() {
                Ok(head) => tips.push(head.peel_to_commit()?.id()),
                Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {}
                Err(e) => return Err(e.into()),
            }

            for reference in repo.references()? {
                // Refs to trees or blobs have no history
                let Ok(commit) = reference?.peel_to_commit() else {
                    continue;
                };
                if !tips.contains(&commit.id()) {
                    tips.push(commit.id());
                }
            }
            Ok(tips)
        })
    }

    fn read_commit(&self, commit: Oid) -> Result<CommitInfo> {
        self.with_repo(|repo| {
            let commit = repo.find_commit(commit)?;
            let info = CommitInfo {
                id: commit.id(),
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
                author: identity(&commit.author()),
                committer: identity(&commit.committer()),
                time: commit.time().seconds(),
            };
            Ok(info)
        })
    }
}

fn identity(signature: &Signature<'_>) -> String {
    format!(
        "{} <{}>",
        String::from_utf8_lossy(signature.name_bytes()),
        String::from_utf8_lossy(signature.email_bytes())
    )
}
