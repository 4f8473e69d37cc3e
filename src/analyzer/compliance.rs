use git2::Oid;
use log::debug;

use super::walk::Ancestry;
use crate::domain::ParsedCommit;
use crate::error::Result;
use crate::git::{short_id, summary, Repository};

/// A commit that does not follow the convention
#[derive(Debug, Clone, PartialEq)]
pub struct Offender {
    pub id: Oid,
    pub summary: String,
}

impl Offender {
    pub fn short_id(&self) -> String {
        short_id(self.id)
    }
}

/// Result of checking every ancestor of a commit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplianceReport {
    pub checked: usize,
    /// Commits whose subject is not `type(scope)!: description`
    pub non_conventional: Vec<Offender>,
    /// Conventional subjects carrying a type outside the grammar
    pub unknown_type: Vec<Offender>,
}

impl ComplianceReport {
    pub fn is_compliant(&self) -> bool {
        self.non_conventional.is_empty()
    }
}

/// Check every ancestor of the given tips, merges included
pub fn check_history<R: Repository>(
    repo: &R,
    tips: impl IntoIterator<Item = Oid>,
) -> Result<ComplianceReport> {
    let mut report = ComplianceReport::default();

    for commit in Ancestry::from_tips(repo, tips) {
        let commit = commit?;
        let message = repo.read_commit_message(commit)?;
        report.checked += 1;

        let offender = || Offender {
            id: commit,
            summary: summary(&message).to_string(),
        };
        match ParsedCommit::parse(&message) {
            None => report.non_conventional.push(offender()),
            Some(parsed) if !parsed.r#type.is_known() => report.unknown_type.push(offender()),
            Some(_) => {}
        }
    }

    debug!(
        "checked {} commits, {} not conventional",
        report.checked,
        report.non_conventional.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{fake_oid, MockRepository};

    #[test]
    fn test_compliant_history() {
        let mut repo = MockRepository::new();
        repo.commit("chore: init");
        repo.commit("feat(api): add\n\nbody\n\nRefs #1");
        let head = repo.commit("fix: b");

        let report = check_history(&repo, [head]).unwrap();
        assert!(report.is_compliant());
        assert_eq!(report.checked, 3);
        assert!(report.unknown_type.is_empty());
    }

    #[test]
    fn test_reports_offenders() {
        let mut repo = MockRepository::new();
        let first = repo.commit("Initial commit");
        let wip = repo.commit("wip: something");
        let head = repo.commit("feat: fine");

        let report = check_history(&repo, [head]).unwrap();
        assert!(!report.is_compliant());
        assert_eq!(
            report.non_conventional,
            vec![Offender {
                id: first,
                summary: "Initial commit".to_string()
            }]
        );
        assert_eq!(report.unknown_type.len(), 1);
        assert_eq!(report.unknown_type[0].id, wip);
        assert_eq!(report.unknown_type[0].short_id().len(), 7);
    }

    #[test]
    fn test_side_branch_offender_needs_its_tip() {
        let mut repo = MockRepository::new();
        let root = repo.commit("chore: init");
        let head = repo.commit("feat: mainline");
        let side = fake_oid(80);
        repo.add_commit(side, "Quick hack", &[root]);
        repo.add_branch("experiment", side);

        assert!(check_history(&repo, [head]).unwrap().is_compliant());

        let report = check_history(&repo, repo.reference_tips().unwrap()).unwrap();
        assert_eq!(report.checked, 3);
        assert_eq!(report.non_conventional.len(), 1);
        assert_eq!(report.non_conventional[0].id, side);
    }
}
