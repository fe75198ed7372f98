//! Per-file context assembly under a token budget.
//!
//! Walks the staged files in collector order and emits a text section per
//! file: full original/staged/diff for small text files, diff only for large
//! files, placeholders for deleted and binary files. Retrieval errors never
//! fail the run; they degrade to inline markers.

use tracing::{debug, warn};

use crate::context::budget::{
    PromptBudget, estimate_tokens, hard_truncate, line_allowance, truncate_lines,
};
use crate::git::changes::{ChangeSet, FileStatus, StagedFile};
use crate::git::content::FileSource;

/// Files larger than this carry only their diff, never full content.
pub const LARGE_FILE_BYTES: u64 = 50 * 1024;

/// Placeholder for deleted files; emitted without any content fetch.
pub const DELETED_PLACEHOLDER: &str = "[DELETED FILE]";

/// Placeholder for binary files.
pub const BINARY_PLACEHOLDER: &str = "[BINARY FILE - CONTENT OMITTED]";

/// Extensions treated as binary when the git probe fails.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "pdf", "zip", "tar", "gz", "bz2", "7z",
    "rar", "exe", "dll", "so", "dylib", "a", "o", "bin", "wasm", "class", "woff", "woff2", "ttf",
    "otf", "eot", "mp3", "mp4", "avi", "mov", "sqlite", "db",
];

/// Per-file content bundle, resolved before rendering.
#[derive(Debug, Clone)]
pub struct FileContext {
    pub path: String,
    pub status: FileStatus,
    pub original_content: Option<String>,
    pub staged_content: Option<String>,
    pub file_diff: String,
    pub size_bytes: u64,
    pub is_binary: bool,
}

/// Rendered context blob for the prompt.
#[derive(Debug, Clone)]
pub struct ContextBlob {
    pub text: String,
    /// Whether any truncation happened, at file level or blob level.
    pub truncated: bool,
    /// How many files got a full section before the reserved budget ran out.
    pub files_included: usize,
}

/// Whether the extension marks a file as binary.
fn has_binary_extension(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let lower = ext.to_ascii_lowercase();
            BINARY_EXTENSIONS.contains(&lower.as_str())
        })
}

/// Classify a staged file as binary, preferring the git probe and falling
/// back to the extension list when the probe fails.
fn classify_binary(source: &dyn FileSource, file: &StagedFile) -> bool {
    match source.probe_binary(&file.path) {
        Ok(is_binary) => is_binary,
        Err(e) => {
            debug!("binary probe failed for {} ({e}), using extension fallback", file.path);
            has_binary_extension(&file.path)
        }
    }
}

/// Resolve a [`FileContext`] for one staged file.
///
/// Retrieval errors are swallowed into `None`/empty fields; the renderer
/// turns those into inline markers.
fn resolve_file(source: &dyn FileSource, file: &StagedFile, budget: &PromptBudget) -> FileContext {
    if file.status == FileStatus::Deleted {
        // Never read content for deletions
        return FileContext {
            path: file.path.clone(),
            status: file.status,
            original_content: None,
            staged_content: None,
            file_diff: String::new(),
            size_bytes: 0,
            is_binary: false,
        };
    }

    let is_binary = classify_binary(source, file);
    let size_bytes = source.staged_size(&file.path).unwrap_or(0);

    if is_binary {
        return FileContext {
            path: file.path.clone(),
            status: file.status,
            original_content: None,
            staged_content: None,
            file_diff: String::new(),
            size_bytes,
            is_binary: true,
        };
    }

    if size_bytes > LARGE_FILE_BYTES {
        // Diff only, capped to a derived line share
        let diff = match source.file_diff(&file.path) {
            Ok(d) => truncate_lines(&d, line_allowance(budget.per_file_chars())),
            Err(e) => {
                warn!("could not read diff for {}: {e}", file.path);
                format!("[ERROR READING FILE: {e}]")
            }
        };
        return FileContext {
            path: file.path.clone(),
            status: file.status,
            original_content: None,
            staged_content: None,
            file_diff: diff,
            size_bytes,
            is_binary: false,
        };
    }

    let section_lines = line_allowance(budget.section_chars());

    let original_content = match source.head_content(&file.path) {
        Ok(content) => content.map(|c| truncate_lines(&c, section_lines)),
        Err(e) => {
            warn!("could not read HEAD content for {}: {e}", file.path);
            Some(format!("[ERROR READING FILE: {e}]"))
        }
    };

    let staged_content = match source.staged_content(&file.path) {
        Ok(content) => content.map(|c| truncate_lines(&c, section_lines)),
        Err(e) => {
            warn!("could not read staged content for {}: {e}", file.path);
            Some(format!("[ERROR READING FILE: {e}]"))
        }
    };

    let file_diff = match source.file_diff(&file.path) {
        Ok(d) => truncate_lines(&d, section_lines),
        Err(e) => {
            warn!("could not read diff for {}: {e}", file.path);
            format!("[ERROR READING FILE: {e}]")
        }
    };

    FileContext {
        path: file.path.clone(),
        status: file.status,
        original_content,
        staged_content,
        file_diff,
        size_bytes,
        is_binary: false,
    }
}

/// Render one file's context section.
fn render_section(ctx: &FileContext) -> String {
    let mut section = format!("### {} ({})\n", ctx.path, ctx.status);

    if ctx.status == FileStatus::Deleted {
        section.push_str(DELETED_PLACEHOLDER);
        section.push('\n');
        return section;
    }

    if ctx.is_binary {
        section.push_str(BINARY_PLACEHOLDER);
        section.push('\n');
        return section;
    }

    if let Some(ref original) = ctx.original_content {
        section.push_str("--- Original (HEAD) ---\n");
        section.push_str(original);
        section.push('\n');
    }
    if let Some(ref staged) = ctx.staged_content {
        section.push_str("--- Staged ---\n");
        section.push_str(staged);
        section.push('\n');
    }
    if !ctx.file_diff.is_empty() {
        section.push_str("--- Diff ---\n");
        section.push_str(&ctx.file_diff);
        if !ctx.file_diff.ends_with('\n') {
            section.push('\n');
        }
    }

    section
}

/// Build the rich context blob for the staged changes.
///
/// Files are processed in collector order. After each section the running
/// token estimate is rechecked against the reserved share; once exceeded, no
/// further files are added and the accumulated text is truncated. A final
/// check hard-truncates the whole blob to the outer ceiling.
pub fn build_context(
    changes: &ChangeSet,
    source: &dyn FileSource,
    budget: &PromptBudget,
) -> ContextBlob {
    let mut text = String::new();
    let mut truncated = false;
    let mut files_included = 0;

    for file in &changes.files {
        let ctx = resolve_file(source, file, budget);
        let section = render_section(&ctx);
        if section.contains("truncated, showing first") {
            truncated = true;
        }

        text.push_str(&section);
        text.push('\n');
        files_included += 1;

        if estimate_tokens(&text) > budget.reserved {
            debug!(
                "reserved context budget exhausted after {files_included} of {} files",
                changes.files.len()
            );
            text = hard_truncate(&text, budget.reserved);
            truncated = true;
            break;
        }
    }

    // Whole-blob ceiling check
    if estimate_tokens(&text) > budget.ceiling {
        text = hard_truncate(&text, budget.ceiling);
        truncated = true;
    }

    ContextBlob {
        text,
        truncated,
        files_included,
    }
}
