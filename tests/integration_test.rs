// tests/integration_test.rs
use git2::{Oid, Repository as Git2Repo, Signature};
use semver::Version;
use tempfile::TempDir;

use git_semrel::analyzer::{check_history, release_tags, ReleaseEngine};
use git_semrel::domain::BumpSeverity;
use git_semrel::git::{Git2Repository, Repository};
use git_semrel::SemrelError;

/// Create an empty repository with a configured identity
fn setup_repo() -> (TempDir, Git2Repository) {
    let temp = TempDir::new().unwrap();
    let repo = Git2Repo::init(temp.path()).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@test.com").unwrap();
    }
    (temp, Git2Repository::from_git2(repo))
}

/// Commit an empty tree with explicit parents, without moving HEAD
fn commit_with_parents(path: &std::path::Path, message: &str, parents: &[Oid]) -> Oid {
    let repo = Git2Repo::open(path).unwrap();
    let signature = Signature::now("Test User", "test@test.com").unwrap();
    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parents: Vec<git2::Commit> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).unwrap())
        .collect();
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(None, &signature, &signature, message, &tree, &parent_refs)
        .unwrap()
}

fn tag(repo: &Git2Repository, name: &str, target: Oid) {
    repo.create_tag_ref(&format!("refs/tags/{}", name), target)
        .unwrap();
}

#[test]
fn test_fix_then_feat_bumps_minor() {
    let (_temp, repo) = setup_repo();
    let root = repo.create_commit("chore: init").unwrap();
    tag(&repo, "v1.0.0", root);
    repo.create_commit("fix: a").unwrap();
    let head = repo.create_commit("feat: b").unwrap();

    let engine = ReleaseEngine::new(&repo, "v");
    let plan = engine.next_release_version(head).unwrap();
    assert_eq!(plan.base_tag.as_deref(), Some("v1.0.0"));
    assert_eq!(plan.severity, BumpSeverity::Minor);
    assert_eq!(plan.commits, 2);
    assert_eq!(plan.next_version, Version::new(1, 1, 0));
}

#[test]
fn test_breaking_change_on_stable_bumps_major() {
    let (_temp, repo) = setup_repo();
    let root = repo.create_commit("chore: init").unwrap();
    tag(&repo, "v1.2.3", root);
    repo.create_commit("feat!: drop the old api").unwrap();
    let head = repo.create_commit("fix: a").unwrap();

    let plan = ReleaseEngine::new(&repo, "v")
        .next_release_version(head)
        .unwrap();
    assert_eq!(plan.severity, BumpSeverity::Major);
    assert_eq!(plan.next_version, Version::new(2, 0, 0));
}

#[test]
fn test_untagged_history_starts_from_zero() {
    let (_temp, repo) = setup_repo();
    repo.create_commit("chore: init").unwrap();
    let head = repo.create_commit("feat: first feature").unwrap();

    let plan = ReleaseEngine::new(&repo, "v")
        .next_release_version(head)
        .unwrap();
    assert_eq!(plan.base_tag, None);
    assert_eq!(plan.commits, 2);
    assert_eq!(plan.next_version, Version::new(0, 1, 0));
}

#[test]
fn test_tagged_head_has_nothing_to_release() {
    let (_temp, repo) = setup_repo();
    repo.create_commit("chore: init").unwrap();
    let head = repo.create_commit("feat: b").unwrap();
    tag(&repo, "v0.3.0", head);

    let plan = ReleaseEngine::new(&repo, "v")
        .next_release_version(head)
        .unwrap();
    assert!(plan.is_noop());
    assert_eq!(plan.commits, 0);
    assert_eq!(plan.next_version, Version::new(0, 3, 0));
}

#[test]
fn test_create_release_tag_and_reject_duplicate() {
    let (_temp, repo) = setup_repo();
    let root = repo.create_commit("chore: init").unwrap();
    tag(&repo, "v1.0.0", root);
    let head = repo.create_commit("fix: a").unwrap();

    let engine = ReleaseEngine::new(&repo, "v");
    let plan = engine.next_release_version(head).unwrap();
    let created = engine
        .create_release_tag(&plan.next_version, head, false)
        .unwrap();
    assert_eq!(created, "refs/tags/v1.0.1");
    assert_eq!(repo.resolve_reference("v1.0.1").unwrap(), head);

    let err = engine
        .create_release_tag(&plan.next_version, head, false)
        .unwrap_err();
    assert!(matches!(err, SemrelError::AlreadyExists(_)));
}

#[test]
fn test_dry_run_leaves_refs_untouched() {
    let (_temp, repo) = setup_repo();
    let head = repo.create_commit("feat: a").unwrap();

    let engine = ReleaseEngine::new(&repo, "v");
    let name = engine
        .create_release_tag(&Version::new(0, 1, 0), head, true)
        .unwrap();
    assert_eq!(name, "refs/tags/v0.1.0");
    assert!(repo.list_tags().unwrap().is_empty());
}

#[test]
fn test_merge_follows_mainline() {
    let (temp, repo) = setup_repo();
    let root = repo.create_commit("chore: init").unwrap();
    tag(&repo, "v1.0.0", root);

    // a breaking change on a side branch is only seen through the merge commit
    let side = commit_with_parents(temp.path(), "feat!: side rewrite", &[root]);
    let main = commit_with_parents(temp.path(), "fix: mainline", &[root]);
    let merge = commit_with_parents(temp.path(), "chore: merge side", &[main, side]);

    let plan = ReleaseEngine::new(&repo, "v")
        .next_release_version(merge)
        .unwrap();
    assert_eq!(plan.base_tag.as_deref(), Some("v1.0.0"));
    assert_eq!(plan.severity, BumpSeverity::Patch);
    assert_eq!(plan.next_version, Version::new(1, 0, 1));
}

#[test]
fn test_prefix_filters_tags() {
    let (_temp, repo) = setup_repo();
    let root = repo.create_commit("chore: init").unwrap();
    tag(&repo, "v1.0.0", root);
    tag(&repo, "rel-3.0.0", root);
    let head = repo.create_commit("fix: a").unwrap();

    let plan = ReleaseEngine::new(&repo, "rel-")
        .next_release_version(head)
        .unwrap();
    assert_eq!(plan.next_version, Version::new(3, 0, 1));

    let tags = release_tags(&repo, "v").unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].version, Version::new(1, 0, 0));
}

#[test]
fn test_create_commit_chains_on_head() {
    let (_temp, repo) = setup_repo();
    let first = repo.create_commit("docs: readme").unwrap();
    let second = repo.create_commit("test: more coverage\n\nBody text").unwrap();

    assert_eq!(repo.current_reference().unwrap(), second);
    assert_eq!(repo.commit_parents(second).unwrap(), vec![first]);
    assert_eq!(
        repo.read_commit_message(second).unwrap(),
        "test: more coverage\n\nBody text"
    );
}

#[test]
fn test_compliance_on_real_history() {
    let (_temp, repo) = setup_repo();
    repo.create_commit("chore: init").unwrap();
    repo.create_commit("Update stuff").unwrap();
    let head = repo.create_commit("wip: half done").unwrap();

    let report = check_history(&repo, [head]).unwrap();
    assert_eq!(report.checked, 3);
    assert!(!report.is_compliant());
    assert_eq!(report.non_conventional.len(), 1);
    assert_eq!(report.non_conventional[0].summary, "Update stuff");
    assert_eq!(report.unknown_type.len(), 1);
}
