//! Interactive review of the proposed commit message.
//!
//! The loop is an explicit state machine with a pure transition function;
//! cancellation is a terminal state value, never a process exit. The
//! dialoguer-driven driver sits on top and owns all terminal I/O.

use dialoguer::{Confirm, Editor, Input, Select};
use tracing::debug;

use crate::lint::{LintWarning, lint};
use crate::prompt::CommitStyle;

/// What the user chose while a message was being presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Commit,
    Edit(String),
    Regenerate { feedback: Option<String> },
    Cancel,
}

/// Review state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    /// A message is on screen awaiting a decision.
    Presenting { message: String },
    /// The driver must produce a fresh message, then present it.
    Regenerating { feedback: Option<String> },
    /// Terminal: commit this message.
    Accepted { message: String },
    /// Terminal: no commit.
    Cancelled,
}

impl ReviewState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReviewState::Accepted { .. } | ReviewState::Cancelled)
    }
}

/// Pure transition function.
///
/// Actions only apply while presenting; terminal and regenerating states
/// pass through unchanged.
pub fn transition(state: ReviewState, action: ReviewAction) -> ReviewState {
    match state {
        ReviewState::Presenting { message } => match action {
            ReviewAction::Commit => ReviewState::Accepted { message },
            ReviewAction::Edit(new_message) => ReviewState::Presenting {
                message: new_message,
            },
            ReviewAction::Regenerate { feedback } => ReviewState::Regenerating { feedback },
            ReviewAction::Cancel => ReviewState::Cancelled,
        },
        other => other,
    }
}

/// Final outcome of a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Commit { message: String, push: bool },
    Cancelled,
}

/// Show the message and its advisory warnings.
fn present(message: &str, style: CommitStyle) {
    println!("\nProposed commit message:\n");
    for line in message.lines() {
        println!("  {line}");
    }

    let warnings: Vec<LintWarning> = lint(message, style);
    if !warnings.is_empty() {
        println!("\nAdvisory warnings:");
        for warning in &warnings {
            println!("  [WARN] {warning}");
        }
    }
    println!();
}

/// Ask the user what to do with the presented message.
///
/// Any prompt I/O failure (closed terminal, ctrl-c) maps to `Cancel`.
fn ask_action(current: &str) -> ReviewAction {
    let choice = Select::new()
        .with_prompt("What next?")
        .items(&["Commit", "Edit", "Regenerate", "Cancel"])
        .default(0)
        .interact();

    match choice {
        Ok(0) => ReviewAction::Commit,
        Ok(1) => match Editor::new().edit(current) {
            Ok(Some(edited)) if !edited.trim().is_empty() => {
                ReviewAction::Edit(edited.trim().to_string())
            }
            Ok(_) => ReviewAction::Edit(current.to_string()),
            Err(_) => ReviewAction::Cancel,
        },
        Ok(2) => {
            let feedback: String = Input::new()
                .with_prompt("Feedback for the next attempt (empty for none)")
                .allow_empty(true)
                .interact_text()
                .unwrap_or_default();
            let feedback = feedback.trim();
            ReviewAction::Regenerate {
                feedback: if feedback.is_empty() {
                    None
                } else {
                    Some(feedback.to_string())
                },
            }
        }
        Ok(_) | Err(_) => ReviewAction::Cancel,
    }
}

/// Run the interactive review loop.
///
/// `regenerate` is called with the optional user feedback whenever the user
/// asks for a new message; it runs the whole prompt → call → sanitize
/// sequence and returns the fresh text.
pub async fn review_loop<F, Fut>(
    initial: String,
    style: CommitStyle,
    ask_push: bool,
    mut regenerate: F,
) -> anyhow::Result<ReviewOutcome>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = anyhow::Result<String>>,
{
    let mut state = ReviewState::Presenting { message: initial };

    loop {
        match state {
            ReviewState::Presenting { ref message } => {
                present(message, style);
                let action = ask_action(message);
                debug!("review action: {action:?}");
                state = transition(state, action);
            }
            ReviewState::Regenerating { feedback } => {
                println!("Regenerating...");
                let message = regenerate(feedback).await?;
                state = ReviewState::Presenting { message };
            }
            ReviewState::Accepted { message } => {
                let push = ask_push
                    && Confirm::new()
                        .with_prompt("Push after committing?")
                        .default(false)
                        .interact()
                        .unwrap_or(false);
                return Ok(ReviewOutcome::Commit { message, push });
            }
            ReviewState::Cancelled => return Ok(ReviewOutcome::Cancelled),
        }
    }
}
