use std::path::Path;

use git2::Repository;

use crate::error::Result;

/// Wrapper around a git2 Repository for the clone and checkout side of
/// reconstruction.
///
/// The resolver only reads history; moving the working tree to the resolved
/// commit happens here, as a terminal step requested by the orchestration
/// layer.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Clones a repository with full history into `path`.
    pub fn clone(url: &str, path: &Path) -> Result<Self> {
        let repo = Repository::clone(url, path)?;
        Ok(GitRepo { repo })
    }

    /// Opens an already-cloned repository at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)?;
        Ok(GitRepo { repo })
    }

    /// Checks out the given revision, detaching HEAD at it.
    ///
    /// `rev` is any revision spec git understands; in practice it is the
    /// full commit hash produced by the resolver. The working tree is
    /// force-updated to match.
    pub fn checkout(&self, rev: &str) -> Result<()> {
        let object = self.repo.revparse_single(rev)?;
        let commit = object.peel_to_commit()?;

        let mut builder = git2::build::CheckoutBuilder::new();
        builder.force();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut builder))?;
        self.repo.set_head_detached(commit.id())?;
        Ok(())
    }

    /// Get the current HEAD git hash (full 40-character SHA-1)
    pub fn head_hash(&self) -> Result<String> {
        let head = self.repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(commit.id().to_string())
    }
}
