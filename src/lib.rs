//! grapheus - turn staged git changes into AI-drafted commit messages.
//!
//! # Overview
//!
//! grapheus collects the staged diff, fits per-file context into a token
//! budget, asks a model provider for a commit message, cleans the response,
//! and lets the user commit, edit, regenerate, or cancel.

pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod lint;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod review;
pub mod sanitize;

// Re-export commonly used types
pub use config::Config;
pub use context::{ContextBlob, PromptBudget, build_context, estimate_tokens};
pub use error::{ConfigError, GitError, ProviderError};
pub use git::{ChangeSet, FileStatus, StagedFile};
pub use lint::{LintWarning, lint};
pub use prompt::{CommitStyle, PromptMode};
pub use provider::{Completion, ModelClient, Provider};
pub use review::{ReviewAction, ReviewOutcome, ReviewState, transition};
pub use sanitize::sanitize;
