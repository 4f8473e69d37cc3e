//! Ancestry iterators over a [Repository]

use std::collections::{HashSet, VecDeque};

use git2::Oid;

use crate::error::Result;
use crate::git::Repository;

/// Mainline history: the start commit, then its first parent, and so on
pub struct FirstParentWalk<'a, R: Repository> {
    repo: &'a R,
    next: Option<Oid>,
    failed: bool,
}

impl<'a, R: Repository> FirstParentWalk<'a, R> {
    pub fn new(repo: &'a R, start: Oid) -> Self {
        FirstParentWalk {
            repo,
            next: Some(start),
            failed: false,
        }
    }
}

impl<R: Repository> Iterator for FirstParentWalk<'_, R> {
    type Item = Result<Oid>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let current = self.next.take()?;

        match self.repo.commit_parents(current) {
            Ok(parents) => {
                self.next = parents.first().copied();
                Some(Ok(current))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Every ancestor of the start commits (all parents), each visited once, breadth first
pub struct Ancestry<'a, R: Repository> {
    repo: &'a R,
    queue: VecDeque<Oid>,
    seen: HashSet<Oid>,
    failed: bool,
}

impl<'a, R: Repository> Ancestry<'a, R> {
    pub fn new(repo: &'a R, start: Oid) -> Self {
        Self::from_tips(repo, [start])
    }

    /// Walk the combined history of several tips, such as every reference
    pub fn from_tips(repo: &'a R, tips: impl IntoIterator<Item = Oid>) -> Self {
        let mut seen = HashSet::new();
        let queue = tips.into_iter().filter(|tip| seen.insert(*tip)).collect();
        Ancestry {
            repo,
            queue,
            seen,
            failed: false,
        }
    }
}

impl<R: Repository> Iterator for Ancestry<'_, R> {
    type Item = Result<Oid>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let current = self.queue.pop_front()?;

        match self.repo.commit_parents(current) {
            Ok(parents) => {
                for parent in parents {
                    if self.seen.insert(parent) {
                        self.queue.push_back(parent);
                    }
                }
                Some(Ok(current))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
