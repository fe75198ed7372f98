//! End-to-end generation flow tests with a scripted completion collaborator.

mod common;

use async_trait::async_trait;
use common::TestRepo;
use grapheus::config::Config;
use grapheus::context::{PromptBudget, build_context};
use grapheus::error::ProviderError;
use grapheus::git::{RepoFiles, collect_staged};
use grapheus::lint::{LintWarning, lint};
use grapheus::prompt::{CommitStyle, PromptMode, build_system_prompt, plan_prompt, render_user_prompt};
use grapheus::provider::Completion;
use grapheus::sanitize::sanitize;

/// A completion collaborator that returns a canned response.
struct ScriptedModel {
    response: String,
}

#[async_trait]
impl Completion for ScriptedModel {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
        Ok(self.response.clone())
    }
}

#[tokio::test]
async fn rich_prompt_flow_produces_clean_linted_message() {
    let t = TestRepo::new();
    t.stage_file("src/auth.js", b"old\n");
    t.commit_index("init");
    t.stage_file("src/auth.js", b"new\n");

    let config = Config {
        max_tokens: 40_000,
        ..Config::default()
    };

    let changes = collect_staged(&t.repo).unwrap();
    assert_eq!(plan_prompt(&changes, &config), PromptMode::Rich);

    let budget = PromptBudget::new(config.max_tokens, changes.files.len());
    let blob = build_context(&changes, &RepoFiles::new(&t.repo), &budget);
    let system = build_system_prompt(config.style);
    let user = render_user_prompt(&changes, Some(&blob.text), &config, None);

    assert!(user.contains("## File Contents & Context"));
    assert!(user.contains("- src/auth.js (Modified)"));

    let model = ScriptedModel {
        response: "```\nfeat(auth): add session check\n```".to_string(),
    };
    let raw = model.complete(&system, &user).await.unwrap();
    let message = sanitize(&raw);

    assert_eq!(message, "feat(auth): add session check");
    assert!(lint(&message, config.style).is_empty());
}

#[test]
fn minimal_prompt_has_no_per_file_sections() {
    let t = TestRepo::new();
    let huge = "+line of generated output\n".repeat(20_000);
    t.stage_file("bundle.js", huge.as_bytes());

    let config = Config {
        max_tokens: 6_000,
        ..Config::default()
    };

    let changes = collect_staged(&t.repo).unwrap();
    assert_eq!(plan_prompt(&changes, &config), PromptMode::Minimal);

    let user = render_user_prompt(&changes, None, &config, None);
    assert!(user.contains("## Changed Files"));
    assert!(user.contains("## Diff"));
    assert!(!user.contains("## File Contents & Context"));
    assert!(!user.contains("--- Original"));
    assert!(!user.contains("--- Staged"));
}

#[test]
fn regeneration_feedback_is_threaded_into_the_prompt() {
    let t = TestRepo::new();
    t.stage_file("src/lib.rs", b"pub fn f() {}\n");

    let config = Config::default();
    let changes = collect_staged(&t.repo).unwrap();

    let user = render_user_prompt(&changes, None, &config, Some("name the affected module"));
    assert!(user.contains("## User Feedback on the Previous Attempt"));
    assert!(user.contains("name the affected module"));
}

#[test]
fn past_tense_subject_warns_but_remains_usable() {
    let message = sanitize("Added new login flow.");
    assert_eq!(message, "Added new login flow.");

    let warnings = lint(&message, CommitStyle::Conventional);
    assert!(warnings.contains(&LintWarning::TrailingPeriod));
    assert!(
        warnings
            .iter()
            .any(|w| matches!(w, LintWarning::PastTenseVerb { verb } if verb == "added"))
    );
}
