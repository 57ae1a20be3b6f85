// Fixture-backed tests for commit resolution and checkout against real
// repositories built with git2 in temp directories.

use std::fs;
use std::path::Path;

use git2::{Oid, Repository};
use tempfile::TempDir;

use build_reconstructor::git_ops::GitRepo;
use build_reconstructor::offset;
use build_reconstructor::resolver;
use build_reconstructor::ReconstructError;

fn init_repo() -> (TempDir, Repository) {
    let dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(dir.path()).expect("Could not init git repo");
    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }
    (dir, repo)
}

fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> Oid {
    let workdir = repo.workdir().expect("bare repo");
    fs::write(workdir.join(name), content).expect("Could not write file");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new(name))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get sig");

    let parent = repo.head().ok().map(|h| h.peel_to_commit().unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Could not create commit")
}

/// Five commits; lightweight tag v1.0.0 on the second one.
fn tagged_repo() -> (TempDir, Vec<Oid>) {
    let (dir, repo) = init_repo();
    let mut oids = Vec::new();
    oids.push(commit_file(&repo, "a.txt", "one", "first commit"));
    oids.push(commit_file(&repo, "a.txt", "two", "second commit"));
    repo.tag_lightweight(
        "v1.0.0",
        &repo.find_object(oids[1], None).unwrap(),
        false,
    )
    .expect("Could not create tag");
    oids.push(commit_file(&repo, "a.txt", "three", "third commit"));
    oids.push(commit_file(&repo, "a.txt", "four", "fourth commit"));
    oids.push(commit_file(&repo, "a.txt", "five", "fifth commit"));
    (dir, oids)
}

#[test]
fn test_offset_zero_resolves_to_tag_commit() {
    let (dir, oids) = tagged_repo();
    let found = resolver::resolve(dir.path(), "1.0.0", 0, "pkg").unwrap();
    assert_eq!(found.hash, oids[1].to_string());
    assert_eq!(found.subject, "second commit");
}

#[test]
fn test_offset_one_resolves_to_oldest_reachable_commit() {
    // The tag's reachable history is [second, first]; offset 1 selects
    // index length-1, the oldest commit, not one step back from the tag.
    let (dir, oids) = tagged_repo();
    let found = resolver::resolve(dir.path(), "1.0.0", 1, "pkg").unwrap();
    assert_eq!(found.hash, oids[0].to_string());
    assert_eq!(found.subject, "first commit");
}

#[test]
fn test_offset_equal_to_history_length_resolves_to_tag_head() {
    let (dir, oids) = tagged_repo();
    let found = resolver::resolve(dir.path(), "1.0.0", 2, "pkg").unwrap();
    assert_eq!(found.hash, oids[1].to_string());
}

#[test]
fn test_offset_past_history_length_fails() {
    let (dir, _oids) = tagged_repo();
    let err = resolver::resolve(dir.path(), "1.0.0", 3, "pkg").unwrap_err();
    assert!(matches!(err, ReconstructError::Resolution(_)));
}

#[test]
fn test_anomalous_offset_indexes_full_head_history() {
    // Anomaly-encoded offset 2 selects the third-newest commit of HEAD's
    // history, ignoring the tag completely.
    let (dir, oids) = tagged_repo();
    let encoded = offset::encode_anomalous(2);
    let found = resolver::resolve(dir.path(), "v1.0.0", encoded, "pkg").unwrap();
    assert_eq!(found.hash, oids[2].to_string());
    assert_eq!(found.subject, "third commit");
}

#[test]
fn test_no_matching_tag_is_resolution_error() {
    let (dir, _oids) = tagged_repo();
    let err = resolver::resolve(dir.path(), "9.9.9", 0, "pkg").unwrap_err();
    assert!(matches!(err, ReconstructError::Resolution(_)));
}

#[test]
fn test_name_prefixed_tag_candidate() {
    let (dir, repo) = init_repo();
    let first = commit_file(&repo, "a.txt", "one", "first commit");
    repo.tag_lightweight("scipy-1.5.2", &repo.find_object(first, None).unwrap(), false)
        .unwrap();
    commit_file(&repo, "a.txt", "two", "second commit");

    let found = resolver::resolve(dir.path(), "1.5.2", 0, "scipy").unwrap();
    assert_eq!(found.hash, first.to_string());
}

#[test]
fn test_annotated_tag_peels_to_commit() {
    let (dir, repo) = init_repo();
    let first = commit_file(&repo, "a.txt", "one", "first commit");
    let sig = repo.signature().unwrap();
    repo.tag(
        "v2.0.0",
        &repo.find_object(first, None).unwrap(),
        &sig,
        "release 2.0.0",
        false,
    )
    .unwrap();

    let found = resolver::resolve(dir.path(), "2.0.0", 0, "pkg").unwrap();
    assert_eq!(found.hash, first.to_string());
}

#[test]
fn test_checkout_moves_working_tree_to_resolved_commit() {
    let (dir, oids) = tagged_repo();
    let found = resolver::resolve(dir.path(), "1.0.0", 0, "pkg").unwrap();

    let repo = GitRepo::open(dir.path()).unwrap();
    repo.checkout(&found.hash).unwrap();

    assert_eq!(repo.head_hash().unwrap(), oids[1].to_string());
    let content = fs::read_to_string(dir.path().join("a.txt")).unwrap();
    assert_eq!(content, "two");
}

#[test]
fn test_missing_repository_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = resolver::resolve(&dir.path().join("nope"), "1.0.0", 0, "pkg").unwrap_err();
    assert!(matches!(err, ReconstructError::Git(_)));
}
