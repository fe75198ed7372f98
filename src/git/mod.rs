//! Git collaborator: staged change collection, blob access, commit and push.

pub mod changes;
pub mod commit;
pub mod content;

pub use changes::{ChangeSet, FileStatus, StagedFile, collect_staged};
pub use commit::{commit_staged, push};
pub use content::{FileSource, RepoFiles};
