//! Prompt construction for commit message generation.
//!
//! Pure string rendering: no I/O, no side effects. The rich prompt carries
//! the budgeted per-file context; the minimal prompt is the fallback when the
//! assembled prompt would blow the token ceiling even without rich context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::context::estimate_tokens;
use crate::git::changes::ChangeSet;

/// Commit message style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStyle {
    /// `type(scope): subject` with a constrained type vocabulary.
    Conventional,
    /// Capitalized imperative subject, optional body.
    Plain,
}

impl CommitStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitStyle::Conventional => "conventional",
            CommitStyle::Plain => "plain",
        }
    }

    /// Human-readable rules for this style, shown by `grapheus rules`.
    pub fn rules(&self) -> &'static str {
        match self {
            CommitStyle::Conventional => {
                "Conventional style:\n\
                 - Format: type(scope): subject\n\
                 - Type: one of feat, fix, build, chore, ci, docs, style, refactor, perf, test\n\
                 - Subject: imperative mood, lowercase after the colon, no trailing period\n\
                 - Subject line at most 72 characters\n\
                 - Body (optional): explains why, wrapped at 72 characters\n\
                 - Breaking changes: '!' after type/scope or a 'BREAKING CHANGE:' footer"
            }
            CommitStyle::Plain => {
                "Plain style:\n\
                 - Subject: capitalized imperative sentence, no trailing period\n\
                 - Subject line at most 72 characters\n\
                 - Body (optional): explains why, wrapped at 72 characters"
            }
        }
    }
}

impl fmt::Display for CommitStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conventional" => Ok(CommitStyle::Conventional),
            "plain" => Ok(CommitStyle::Plain),
            _ => Err(()),
        }
    }
}

/// Which prompt shape a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// File list + diff + budgeted per-file context.
    Rich,
    /// File list + diff only.
    Minimal,
}

/// The system prompt: style rules the model must follow.
pub fn build_system_prompt(style: CommitStyle) -> String {
    let style_rules = match style {
        CommitStyle::Conventional => {
            "Write the message in Conventional Commits format: `type(scope): subject`.\n\
             - Type must be one of: feat, fix, build, chore, ci, docs, style, refactor, perf, test\n\
             - Scope: the primary module affected, inferred from the paths\n\
             - Subject: imperative mood, lowercase after the colon, no trailing period"
        }
        CommitStyle::Plain => {
            "Write a plain commit message.\n\
             - Subject: a single capitalized imperative sentence, no trailing period"
        }
    };

    format!(
        "You are an assistant that writes Git commit messages from staged changes.\n\n\
         {style_rules}\n\
         - Keep the subject line at or under 72 characters\n\
         - Add a body only when the change needs explanation; wrap it at 72 characters\n\
         - The body explains WHY, the diff already shows WHAT\n\n\
         Respond with the commit message text only. No markdown, no code fences, no commentary."
    )
}

/// Decide between the rich and minimal prompt shapes.
///
/// Estimates the assembled prompt (system + user template + full diff)
/// before any rich context is attached. If that alone exceeds the ceiling,
/// rich context cannot possibly fit and the minimal shape is used.
pub fn plan_prompt(changes: &ChangeSet, config: &Config) -> PromptMode {
    let system = build_system_prompt(config.style);
    let base = render_user_prompt(changes, None, config, None);
    if estimate_tokens(&system) + estimate_tokens(&base) > config.max_tokens {
        PromptMode::Minimal
    } else {
        PromptMode::Rich
    }
}

/// Render the user prompt.
///
/// `context` is the budgeted per-file blob (rich mode) or `None` (minimal
/// mode). `feedback` is free text from a regeneration request.
pub fn render_user_prompt(
    changes: &ChangeSet,
    context: Option<&str>,
    config: &Config,
    feedback: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Generate a commit message for the following staged changes.\n\n\
         ## Changed Files\n{}\n\n\
         ## Diff\n{}\n",
        changes.status_lines(),
        changes.diff_text,
    );

    if let Some(context) = context
        && !context.is_empty()
    {
        prompt.push_str("\n## File Contents & Context\n");
        prompt.push_str(context);
        if !context.ends_with('\n') {
            prompt.push('\n');
        }
    }

    prompt.push_str(
        "\n## Instructions\n\
         Analyze the changes and infer what was done and why. \
         Classify the change type and scope from the file paths and the diff. \
         Then write the commit message.\n",
    );

    if let Some(ref rules) = config.custom_rules {
        prompt.push_str("\n## Additional Requirements\n");
        prompt.push_str(rules);
        prompt.push('\n');
    }

    if let Some(feedback) = feedback {
        prompt.push_str("\n## User Feedback on the Previous Attempt\n");
        prompt.push_str(feedback);
        prompt.push_str("\nRewrite the message taking this feedback into account.\n");
    }

    prompt
}
