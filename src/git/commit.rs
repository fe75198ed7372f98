//! Commit creation and push.
//!
//! Commits go through git2 against the already-staged index. Push shells out
//! to the system `git` binary so the user's credential helpers and SSH agent
//! keep working.

use std::process::Command;

use git2::{Oid, Repository};
use tracing::debug;

use crate::error::GitError;

/// Commit the staged index with the given message.
///
/// The index is committed as-is; nothing is staged here. Handles the
/// initial-commit case (no HEAD parent).
pub fn commit_staged(repo: &Repository, message: &str) -> Result<Oid, GitError> {
    let mut index = repo.index().map_err(GitError::IndexFailed)?;
    let tree_id = index.write_tree().map_err(GitError::IndexFailed)?;
    let tree = repo.find_tree(tree_id).map_err(GitError::CommitFailed)?;

    let sig = repo.signature().map_err(GitError::ConfigError)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(GitError::CommitFailed)?),
        Err(e)
            if e.code() == git2::ErrorCode::UnbornBranch
                || e.code() == git2::ErrorCode::NotFound =>
        {
            None
        }
        Err(e) => return Err(GitError::CommitFailed(e)),
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .map_err(GitError::CommitFailed)?;

    debug!("created commit {oid}");
    Ok(oid)
}

/// Push the current branch via the system `git` binary.
pub fn push(repo: &Repository) -> Result<(), GitError> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| GitError::PushFailed("repository has no working directory".to_string()))?;

    let output = Command::new("git")
        .arg("push")
        .current_dir(workdir)
        .output()
        .map_err(|e| GitError::PushFailed(format!("failed to run git push: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::PushFailed(stderr.trim().to_string()));
    }

    Ok(())
}
