//! Blob content access for the context budgeter.
//!
//! The budgeter only needs a handful of read operations against the staging
//! area. They live behind the [`FileSource`] trait so budgeting logic can be
//! exercised with an in-memory fake.

use git2::{DiffOptions, Repository};

use crate::git::changes::resolve_head_tree;

/// Read access to file content around the staging area.
pub trait FileSource {
    /// File content at HEAD, or `None` if the path does not exist there.
    fn head_content(&self, path: &str) -> Result<Option<String>, git2::Error>;

    /// File content in the index, or `None` if the path is not staged.
    fn staged_content(&self, path: &str) -> Result<Option<String>, git2::Error>;

    /// Unified diff (HEAD vs. index) restricted to one path.
    fn file_diff(&self, path: &str) -> Result<String, git2::Error>;

    /// Size in bytes of the staged blob (0 when absent, e.g. deletions).
    fn staged_size(&self, path: &str) -> Result<u64, git2::Error>;

    /// Whether git considers the staged blob binary.
    fn probe_binary(&self, path: &str) -> Result<bool, git2::Error>;
}

/// [`FileSource`] backed by a real repository.
pub struct RepoFiles<'repo> {
    repo: &'repo Repository,
}

impl<'repo> RepoFiles<'repo> {
    pub fn new(repo: &'repo Repository) -> Self {
        Self { repo }
    }

    fn staged_blob(&self, path: &str) -> Result<Option<git2::Blob<'repo>>, git2::Error> {
        let index = self.repo.index()?;
        let Some(entry) = index.get_path(std::path::Path::new(path), 0) else {
            return Ok(None);
        };
        self.repo.find_blob(entry.id).map(Some)
    }
}

impl FileSource for RepoFiles<'_> {
    fn head_content(&self, path: &str) -> Result<Option<String>, git2::Error> {
        let Some(tree) = resolve_head_tree(self.repo)
            .map_err(|_| git2::Error::from_str("failed to resolve HEAD tree"))?
        else {
            return Ok(None);
        };

        let entry = match tree.get_path(std::path::Path::new(path)) {
            Ok(e) => e,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let blob = self.repo.find_blob(entry.id())?;
        Ok(Some(String::from_utf8_lossy(blob.content()).to_string()))
    }

    fn staged_content(&self, path: &str) -> Result<Option<String>, git2::Error> {
        Ok(self
            .staged_blob(path)?
            .map(|blob| String::from_utf8_lossy(blob.content()).to_string()))
    }

    fn file_diff(&self, path: &str) -> Result<String, git2::Error> {
        let head_tree = resolve_head_tree(self.repo)
            .map_err(|_| git2::Error::from_str("failed to resolve HEAD tree"))?;

        let mut opts = DiffOptions::new();
        opts.pathspec(path);
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))?;

        let mut text = String::new();
        diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
            let content = std::str::from_utf8(line.content()).unwrap_or("");
            let origin = line.origin();
            if origin == '+' || origin == '-' || origin == ' ' {
                text.push(origin);
            }
            text.push_str(content);
            true
        })?;

        Ok(text)
    }

    fn staged_size(&self, path: &str) -> Result<u64, git2::Error> {
        let index = self.repo.index()?;
        Ok(index
            .get_path(std::path::Path::new(path), 0)
            .map(|entry| u64::from(entry.file_size))
            .unwrap_or(0))
    }

    fn probe_binary(&self, path: &str) -> Result<bool, git2::Error> {
        match self.staged_blob(path)? {
            Some(blob) => Ok(blob.is_binary()),
            None => Err(git2::Error::from_str("path not present in index")),
        }
    }
}
