//! Staged change collection using git2.

use std::fmt;

use git2::{Delta, Diff, DiffFormat, ErrorCode, Repository, Tree};
use tracing::warn;

use crate::error::GitError;

/// Status of a staged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Other,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "Added"),
            FileStatus::Modified => write!(f, "Modified"),
            FileStatus::Deleted => write!(f, "Deleted"),
            FileStatus::Renamed => write!(f, "Renamed"),
            FileStatus::Copied => write!(f, "Copied"),
            FileStatus::Other => write!(f, "Other"),
        }
    }
}

/// A file in the staging area.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: String,
    pub status: FileStatus,
    /// Old path for renamed or copied files.
    pub old_path: Option<String>,
}

/// The staged changes for one run: file list plus the full unified diff.
///
/// Files keep the order git reports them in; nothing downstream re-sorts.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    pub files: Vec<StagedFile>,
    pub diff_text: String,
}

impl ChangeSet {
    /// One line per file, `- path (Status)`, for prompts and the minimal fallback.
    pub fn status_lines(&self) -> String {
        self.files
            .iter()
            .map(|f| match &f.old_path {
                Some(old) => format!("- {} ({} from {})", f.path, f.status, old),
                None => format!("- {} ({})", f.path, f.status),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found).
pub(crate) fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Collect the staged changes (index vs. HEAD).
///
/// Returns `GitError::NoStagedChanges` when the index matches HEAD.
pub fn collect_staged(repo: &Repository) -> Result<ChangeSet, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    let files = collect_files(&diff);
    if files.is_empty() {
        return Err(GitError::NoStagedChanges);
    }

    let diff_text = render_diff_text(&diff);

    Ok(ChangeSet { files, diff_text })
}

/// Collect staged file entries from a diff, preserving delta order.
fn collect_files(diff: &Diff<'_>) -> Vec<StagedFile> {
    let mut files = Vec::new();

    for delta in diff.deltas() {
        let status = match delta.status() {
            Delta::Added => FileStatus::Added,
            Delta::Modified => FileStatus::Modified,
            Delta::Deleted => FileStatus::Deleted,
            Delta::Renamed => FileStatus::Renamed,
            Delta::Copied => FileStatus::Copied,
            _ => FileStatus::Other,
        };

        let new_path = delta
            .new_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());
        let old_path = delta
            .old_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());

        let (path, old_path) = match status {
            FileStatus::Renamed | FileStatus::Copied => {
                let path = new_path
                    .clone()
                    .or_else(|| old_path.clone())
                    .unwrap_or_default();
                (path, old_path)
            }
            FileStatus::Deleted => (old_path.or(new_path).unwrap_or_default(), None),
            _ => (new_path.or(old_path).unwrap_or_default(), None),
        };

        if !path.is_empty() {
            files.push(StagedFile { path, status, old_path });
        }
    }

    files
}

/// Render the full unified diff text.
///
/// The staged diff is always carried in full; the context budgeter decides
/// separately whether the rich-context path fits the token ceiling.
fn render_diff_text(diff: &Diff<'_>) -> String {
    let mut text = String::new();

    if let Err(e) = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let content = std::str::from_utf8(line.content()).unwrap_or("");
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(content);
        true
    }) {
        warn!("Failed to render staged diff text: {e}");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_repo_with_commit(dir: &std::path::Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let sig = git2::Signature::now("Test", "test@test.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[]).unwrap();
        }
        repo
    }

    fn stage(repo: &Repository, path: &str) {
        let mut index = repo.index().unwrap();
        index.add_path(std::path::Path::new(path)).unwrap();
        index.write().unwrap();
    }

    #[test]
    fn test_file_status_display() {
        assert_eq!(FileStatus::Added.to_string(), "Added");
        assert_eq!(FileStatus::Deleted.to_string(), "Deleted");
        assert_eq!(FileStatus::Copied.to_string(), "Copied");
        assert_eq!(FileStatus::Other.to_string(), "Other");
    }

    #[test]
    fn test_clean_index_returns_no_staged_changes() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());

        let result = collect_staged(&repo);
        assert!(matches!(result, Err(GitError::NoStagedChanges)));
    }

    #[test]
    fn test_unstaged_file_is_not_collected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());

        // Present in the working tree but never staged
        std::fs::write(dir.path().join("loose.txt"), "hello\n").unwrap();

        let result = collect_staged(&repo);
        assert!(matches!(result, Err(GitError::NoStagedChanges)));
    }

    #[test]
    fn test_staged_new_file_is_added() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());

        std::fs::write(dir.path().join("new.txt"), "hello world\n").unwrap();
        stage(&repo, "new.txt");

        let changes = collect_staged(&repo).unwrap();
        assert_eq!(changes.files.len(), 1);
        assert_eq!(changes.files[0].path, "new.txt");
        assert_eq!(changes.files[0].status, FileStatus::Added);
        assert!(changes.diff_text.contains("hello world"));
    }

    #[test]
    fn test_staged_deletion_keeps_old_path() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        std::fs::write(dir.path().join("gone.txt"), "bye\n").unwrap();
        stage(&repo, "gone.txt");
        {
            let sig = git2::Signature::now("Test", "test@test.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "add gone", &tree, &[]).unwrap();
        }

        std::fs::remove_file(dir.path().join("gone.txt")).unwrap();
        let mut index = repo.index().unwrap();
        index.remove_path(std::path::Path::new("gone.txt")).unwrap();
        index.write().unwrap();

        let changes = collect_staged(&repo).unwrap();
        assert_eq!(changes.files[0].path, "gone.txt");
        assert_eq!(changes.files[0].status, FileStatus::Deleted);
    }

    #[test]
    fn test_empty_repo_stages_against_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        std::fs::write(dir.path().join("first.txt"), "first\n").unwrap();
        stage(&repo, "first.txt");

        let changes = collect_staged(&repo).unwrap();
        assert_eq!(changes.files[0].status, FileStatus::Added);
    }

    #[test]
    fn test_status_lines_format() {
        let changes = ChangeSet {
            files: vec![
                StagedFile {
                    path: "src/a.rs".to_string(),
                    status: FileStatus::Modified,
                    old_path: None,
                },
                StagedFile {
                    path: "src/b.rs".to_string(),
                    status: FileStatus::Renamed,
                    old_path: Some("src/old_b.rs".to_string()),
                },
            ],
            diff_text: String::new(),
        };

        let lines = changes.status_lines();
        assert_eq!(
            lines,
            "- src/a.rs (Modified)\n- src/b.rs (Renamed from src/old_b.rs)"
        );
    }
}
