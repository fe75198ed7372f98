//! Context budgeter integration tests against real git repositories.

mod common;

use common::TestRepo;
use grapheus::context::{
    BINARY_PLACEHOLDER, DELETED_PLACEHOLDER, PromptBudget, build_context, estimate_tokens,
};
use grapheus::git::{RepoFiles, collect_staged};

#[test]
fn small_modified_file_gets_full_sections_without_truncation() {
    let t = TestRepo::new();
    t.stage_file("src/auth.js", b"function login() {\n  return false;\n}\n");
    t.commit_index("init");
    t.stage_file(
        "src/auth.js",
        b"function login() {\n  return checkSession();\n}\n",
    );

    let changes = collect_staged(&t.repo).unwrap();
    let budget = PromptBudget::new(40_000, changes.files.len());
    let blob = build_context(&changes, &RepoFiles::new(&t.repo), &budget);

    assert!(blob.text.contains("### src/auth.js (Modified)"));
    assert!(blob.text.contains("--- Original (HEAD) ---"));
    assert!(blob.text.contains("return false"));
    assert!(blob.text.contains("--- Staged ---"));
    assert!(blob.text.contains("checkSession"));
    assert!(blob.text.contains("--- Diff ---"));
    assert!(!blob.truncated);
    assert!(!blob.text.contains("truncated"));
}

#[test]
fn deleted_file_emits_placeholder_only() {
    let t = TestRepo::new();
    t.stage_file("doomed.txt", b"short-lived\n");
    t.commit_index("add doomed");
    t.stage_deletion("doomed.txt");

    let changes = collect_staged(&t.repo).unwrap();
    let budget = PromptBudget::new(10_000, changes.files.len());
    let blob = build_context(&changes, &RepoFiles::new(&t.repo), &budget);

    assert!(blob.text.contains("### doomed.txt (Deleted)"));
    assert!(blob.text.contains(DELETED_PLACEHOLDER));
    assert!(!blob.text.contains("short-lived"));
}

#[test]
fn binary_file_emits_placeholder_without_content() {
    let t = TestRepo::new();
    t.stage_file("logo.png", &[0u8, 137, 80, 78, 71, 0, 0, 1]);

    let changes = collect_staged(&t.repo).unwrap();
    let budget = PromptBudget::new(10_000, changes.files.len());
    let blob = build_context(&changes, &RepoFiles::new(&t.repo), &budget);

    assert!(blob.text.contains(BINARY_PLACEHOLDER));
    assert!(!blob.text.contains("--- Original"));
    assert!(!blob.text.contains("--- Staged"));
}

#[test]
fn large_file_carries_diff_only() {
    let t = TestRepo::new();
    let big = "let x = 1;\n".repeat(6_000); // ~66 KB
    t.stage_file("src/generated.js", big.as_bytes());

    let changes = collect_staged(&t.repo).unwrap();
    let budget = PromptBudget::new(20_000, changes.files.len());
    let blob = build_context(&changes, &RepoFiles::new(&t.repo), &budget);

    assert!(blob.text.contains("--- Diff ---"));
    assert!(!blob.text.contains("--- Original"));
    assert!(!blob.text.contains("--- Staged"));
    assert!(blob.text.contains("truncated, showing first"));
}

#[test]
fn many_files_tiny_ceiling_respects_budget_invariants() {
    let t = TestRepo::new();
    for i in 0..120 {
        let body = format!("pub fn f_{i}() {{ /* body */ }}\n").repeat(40);
        t.stage_file(&format!("src/mod_{i}.rs"), body.as_bytes());
    }

    let changes = collect_staged(&t.repo).unwrap();
    assert_eq!(changes.files.len(), 120);

    let budget = PromptBudget::new(5_000, changes.files.len());
    assert!(budget.per_file >= grapheus::context::FLOOR_MIN_TOKENS);

    let blob = build_context(&changes, &RepoFiles::new(&t.repo), &budget);
    assert!(blob.truncated);
    assert!(estimate_tokens(&blob.text) <= budget.ceiling);
}

#[test]
fn mixed_changeset_keeps_collector_order_and_degrades_per_file() {
    let t = TestRepo::new();
    t.stage_file("a_text.rs", b"fn a() {}\n");
    t.stage_file("b_image.png", &[0u8, 1, 2, 3]);
    t.stage_file("c_doomed.txt", b"bye\n");
    t.commit_index("init");
    t.stage_file("a_text.rs", b"fn a() { improved(); }\n");
    t.stage_deletion("c_doomed.txt");

    let changes = collect_staged(&t.repo).unwrap();
    let budget = PromptBudget::new(20_000, changes.files.len());
    let blob = build_context(&changes, &RepoFiles::new(&t.repo), &budget);

    // Each file degraded according to its own classification
    assert!(blob.text.contains("improved()"));
    assert!(blob.text.contains(DELETED_PLACEHOLDER));

    // Sections appear in the order the collector reported the files
    let positions: Vec<usize> = changes
        .files
        .iter()
        .map(|f| blob.text.find(&format!("### {}", f.path)).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}
