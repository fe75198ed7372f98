//! Error types for grapheus modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository. Run grapheus from within a git repository.")]
    NotARepository(#[source] git2::Error),

    #[error("No staged changes found. Stage files with 'git add' first.")]
    NoStagedChanges,

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to read index: {0}")]
    IndexFailed(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    ConfigError(#[source] git2::Error),

    #[error("git push failed: {0}")]
    PushFailed(String),
}

/// Errors from model provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No API key found for {provider}. Set the {env_var} environment variable.")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Request to {1} failed: {0}")]
    RequestFailed(#[source] reqwest::Error, String),

    #[error("{provider} returned HTTP {status}: {detail}")]
    ApiError {
        provider: String,
        status: u16,
        detail: String,
    },

    #[error("{provider} response had an unexpected shape: {detail}")]
    MalformedResponse { provider: String, detail: String },

    #[error("{0} returned an empty completion")]
    EmptyCompletion(String),

    #[error("Unknown provider '{0}'. Known providers: openai, anthropic, ollama")]
    UnknownProvider(String),
}

/// Errors from configuration file operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to write config file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    #[error("Unknown config key '{key}'. Known keys: {known}")]
    UnknownKey { key: String, known: String },

    #[error("Invalid value '{value}' for config key '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Could not determine home directory for config file")]
    NoHomeDirectory,
}
