//! The generate-and-commit pipeline.
//!
//! Strictly sequential: collect staged changes, budget context, build the
//! prompt, one model call, sanitize, review, commit. The commit is the only
//! state-mutating step and runs last.

use anyhow::{Context, Result};
use dialoguer::Password;
use git2::Repository;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::context::{PromptBudget, build_context};
use crate::error::{GitError, ProviderError};
use crate::git::{RepoFiles, collect_staged, commit_staged, push};
use crate::lint::lint;
use crate::prompt::{PromptMode, build_system_prompt, plan_prompt, render_user_prompt};
use crate::provider::{Completion, ModelClient};
use crate::review::{ReviewOutcome, review_loop};
use crate::sanitize::sanitize;

/// Flags for one pipeline run, derived from the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip the review loop: auto-accept and commit.
    pub yes: bool,
    /// Print the message without committing.
    pub dry_run: bool,
    /// Push after committing without asking.
    pub push: bool,
}

/// Push handling for one run, settled before the review loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PushPolicy {
    /// Push without asking once a commit is made.
    assumed: bool,
    /// Ask the push question after an interactive accept.
    ask: bool,
}

/// `--yes` implies no push, so only the explicit `--push` flag counts there;
/// the `auto_push` preference applies to reviewed commits only.
fn push_policy(opts: RunOptions, config: &Config) -> PushPolicy {
    if opts.yes {
        PushPolicy {
            assumed: opts.push,
            ask: false,
        }
    } else {
        let assumed = opts.push || config.auto_push;
        PushPolicy {
            assumed,
            ask: !assumed,
        }
    }
}

/// Locate the enclosing repository, walking up from `path` like git does.
fn open_repository(path: &str) -> Result<Repository, GitError> {
    Repository::discover(path).map_err(GitError::NotARepository)
}

/// Run the full generate-and-commit pipeline.
pub async fn run(config: &Config, opts: RunOptions) -> Result<()> {
    let repo = open_repository(".")?;

    let changes = collect_staged(&repo)?;
    info!("found {} staged file(s)", changes.files.len());

    // Budget the context and pick the prompt shape
    let budget = PromptBudget::new(config.max_tokens, changes.files.len());
    debug!(
        "budget: ceiling={} reserved={} per_file={}",
        budget.ceiling, budget.reserved, budget.per_file
    );

    let mode = plan_prompt(&changes, config);
    let context_text = match mode {
        PromptMode::Rich => {
            let source = RepoFiles::new(&repo);
            let blob = build_context(&changes, &source, &budget);
            if blob.truncated {
                debug!(
                    "context truncated; {} of {} files included",
                    blob.files_included,
                    changes.files.len()
                );
            }
            Some(blob.text)
        }
        PromptMode::Minimal => {
            warn!("prompt exceeds the token ceiling; falling back to the minimal prompt");
            None
        }
    };

    let system = build_system_prompt(config.style);
    let user = render_user_prompt(&changes, context_text.as_deref(), config, None);

    let client = build_client(config, opts.yes)?;

    info!("requesting commit message from {}", client.provider());
    let raw = client.complete(&system, &user).await?;
    let message = sanitize(&raw);

    if opts.dry_run {
        println!("{message}");
        for warning in lint(&message, config.style) {
            eprintln!("[WARN] {warning}");
        }
        return Ok(());
    }

    let policy = push_policy(opts, config);

    let outcome = if opts.yes {
        ReviewOutcome::Commit {
            message,
            push: policy.assumed,
        }
    } else {
        let regenerate = |feedback: Option<String>| {
            let client = &client;
            let system = system.clone();
            let changes = &changes;
            let context_text = context_text.as_deref();
            async move {
                let user = render_user_prompt(changes, context_text, config, feedback.as_deref());
                let raw = client.complete(&system, &user).await?;
                Ok(sanitize(&raw))
            }
        };

        match review_loop(message, config.style, policy.ask, regenerate).await? {
            ReviewOutcome::Commit { message, push } => ReviewOutcome::Commit {
                message,
                push: push || policy.assumed,
            },
            ReviewOutcome::Cancelled => ReviewOutcome::Cancelled,
        }
    };

    match outcome {
        ReviewOutcome::Commit { message, push: do_push } => {
            let oid = commit_staged(&repo, &message)?;
            let subject = message.lines().next().unwrap_or_default();
            println!("✓ Created commit {:.7}: {subject}", oid.to_string());

            if do_push {
                push(&repo)?;
                println!("✓ Pushed");
            }
        }
        ReviewOutcome::Cancelled => {
            println!("Cancelled. No commit was made.");
        }
    }

    Ok(())
}

/// Build the provider client, prompting interactively for a missing API key
/// when a terminal is available.
fn build_client(config: &Config, non_interactive: bool) -> Result<ModelClient> {
    match ModelClient::new(config.provider, &config.model) {
        Ok(client) => Ok(client),
        Err(ProviderError::MissingApiKey { provider, env_var }) if !non_interactive => {
            let key = Password::new()
                .with_prompt(format!("Enter your {provider} API key"))
                .interact()
                .with_context(|| {
                    format!("No API key for {provider}. Set {env_var} or enter one when prompted.")
                })?;
            Ok(ModelClient::with_api_key(config.provider, &config.model, key))
        }
        Err(e) => Err(e.into()),
    }
}
