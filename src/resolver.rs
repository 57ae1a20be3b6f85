//! Version-to-commit resolution.
//!
//! Given a cloned repository, a base tag and an encoded post-release offset,
//! locates the exact commit the artifact was built from. History access goes
//! through the [History] trait so the resolution algorithm can be exercised
//! against a mock as well as a real `git2` repository.

use std::path::Path;

use git2::Repository;

use crate::error::{ReconstructError, Result};
use crate::offset;
use crate::tags;

/// One history-log entry: a commit hash and its subject line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReference {
    pub hash: String,
    pub subject: String,
}

/// History query primitive: the only capability the resolver needs from its
/// environment.
///
/// `query_log(None)` returns the current branch's full history;
/// `query_log(Some(ref))` returns the history reachable from a tag or branch
/// name. Both are ordered newest-first. A ref that does not exist fails with
/// [ReconstructError::MissingRef], which the resolver treats as "try the
/// next candidate"; any other failure is fatal for the package and is
/// propagated unchanged.
///
/// The caller must not mutate the repository while a query is running.
pub trait History {
    fn query_log(&self, reference: Option<&str>) -> Result<Vec<CommitReference>>;
}

/// Real history implementation backed by a `git2` repository on disk.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Opens an existing cloned repository. Fails if the path is not a git
    /// working directory.
    pub fn open(repo_path: &Path) -> Result<Self> {
        Ok(GitHistory {
            repo: Repository::open(repo_path)?,
        })
    }
}

impl History for GitHistory {
    fn query_log(&self, reference: Option<&str>) -> Result<Vec<CommitReference>> {
        let mut revwalk = self.repo.revwalk()?;

        match reference {
            Some(name) => {
                let object = self.repo.revparse_single(name).map_err(|e| {
                    if e.code() == git2::ErrorCode::NotFound {
                        ReconstructError::missing_ref(name)
                    } else {
                        ReconstructError::Git(e)
                    }
                })?;
                // Annotated tags point at a tag object, not the commit.
                let commit = object.peel_to_commit()?;
                revwalk.push(commit.id())?;
            }
            None => revwalk.push_head()?,
        }

        let mut entries = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            entries.push(CommitReference {
                hash: oid.to_string(),
                subject: commit.summary().unwrap_or("").to_string(),
            });
        }
        Ok(entries)
    }
}

/// Resolves the exact commit for a package cloned at `repo_path`.
///
/// Opens the repository and delegates to [resolve_with]. The repository is
/// only read; checking out the resolved commit is a separate operation
/// owned by the caller.
pub fn resolve(
    repo_path: &Path,
    base_tag: &str,
    encoded_offset: i64,
    package_name: &str,
) -> Result<CommitReference> {
    let history = GitHistory::open(repo_path)?;
    resolve_with(&history, base_tag, encoded_offset, package_name)
}

/// Resolution algorithm over an arbitrary [History] implementation.
///
/// 1. Decode the offset.
/// 2. Anomalous offset: index the current branch's full history absolutely,
///    newest-first (index 0 = HEAD). Tags are ignored entirely.
/// 3. Offset 0: the first tag candidate whose log exists answers with its
///    newest entry, the commit the tag points to.
/// 4. Offset > 0: the first usable candidate's log of length `n` answers
///    with index `n - offset`, i.e. `offset` commits forward from the
///    oldest reachable commit. Preserved exactly as observed in the
///    reference behavior and pinned by fixture tests; do not "correct" it
///    to count backward from the tag.
pub fn resolve_with<H: History>(
    history: &H,
    base_tag: &str,
    encoded_offset: i64,
    package_name: &str,
) -> Result<CommitReference> {
    let decoded = offset::decode(encoded_offset);

    if decoded.anomaly {
        let log = history.query_log(None)?;
        let index = index_from_i64(decoded.offset)?;
        let total = log.len();
        return log.into_iter().nth(index).ok_or_else(|| {
            ReconstructError::resolution(format!(
                "{}: absolute offset {} exceeds history of {} commits",
                package_name, index, total
            ))
        });
    }

    let log = first_usable_log(history, package_name, base_tag)?;

    if decoded.offset == 0 {
        return log.into_iter().next().ok_or_else(|| {
            ReconstructError::resolution(format!("{}: tag '{}' has no history", package_name, base_tag))
        });
    }

    let n = log.len();
    let post_commit = index_from_i64(decoded.offset)?;
    let index = n.checked_sub(post_commit).ok_or_else(|| {
        ReconstructError::resolution(format!(
            "{}: offset {} exceeds history of {} commits for tag '{}'",
            package_name, post_commit, n, base_tag
        ))
    })?;
    log.into_iter().nth(index).ok_or_else(|| {
        ReconstructError::resolution(format!(
            "{}: offset {} does not address a commit for tag '{}'",
            package_name, post_commit, base_tag
        ))
    })
}

/// Tries each tag candidate in order and returns the first log that exists.
/// A missing ref moves on to the next candidate; any other failure is
/// propagated. All candidates missing is a resolution failure.
fn first_usable_log<H: History>(
    history: &H,
    package_name: &str,
    base_tag: &str,
) -> Result<Vec<CommitReference>> {
    let candidates = tags::candidates(package_name, base_tag);
    for candidate in &candidates {
        match history.query_log(Some(candidate)) {
            Ok(log) => return Ok(log),
            Err(e) if e.is_missing_ref() => continue,
            Err(e) => return Err(e),
        }
    }
    Err(ReconstructError::resolution(format!(
        "{}: no tag found among candidates {:?}",
        package_name, candidates
    )))
}

fn index_from_i64(offset: i64) -> Result<usize> {
    usize::try_from(offset)
        .map_err(|_| ReconstructError::resolution(format!("negative offset {}", offset)))
}
