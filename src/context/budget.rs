//! Token budget arithmetic for prompt context.
//!
//! Token counts are approximated as `ceil(chars / 4)`. That matches the
//! provider billing unit closely enough for budgeting; an exact tokenizer is
//! deliberately not used.

/// Approximate characters per token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Fraction of the ceiling reserved for rich per-file context, as a
/// numerator over [`CONTEXT_FRACTION_DENOM`]. The remainder covers the
/// prompt templates and the raw diff, which are always included in full.
const CONTEXT_FRACTION_NUM: usize = 6;
const CONTEXT_FRACTION_DENOM: usize = 10;

/// Minimum per-file token allowance, no matter how many files are staged.
pub const FLOOR_MIN_TOKENS: usize = 128;

/// Assumed average line width when converting a character budget into a
/// line cap for truncation.
const EST_CHARS_PER_LINE: usize = 50;

/// Minimum number of lines any truncated section keeps.
const MIN_SECTION_LINES: usize = 5;

/// Estimate the token count of a text.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Token budget for one run, derived from the configured ceiling and the
/// number of staged files.
#[derive(Debug, Clone, Copy)]
pub struct PromptBudget {
    /// Outer token ceiling `T` for the whole context blob.
    pub ceiling: usize,
    /// Tokens reserved for rich per-file context.
    pub reserved: usize,
    /// Per-file token allowance.
    pub per_file: usize,
}

impl PromptBudget {
    pub fn new(ceiling: usize, file_count: usize) -> Self {
        let reserved = ceiling * CONTEXT_FRACTION_NUM / CONTEXT_FRACTION_DENOM;
        let per_file = (reserved / file_count.max(1)).max(FLOOR_MIN_TOKENS);
        Self {
            ceiling,
            reserved,
            per_file,
        }
    }

    /// Per-file allowance in characters.
    pub fn per_file_chars(&self) -> usize {
        self.per_file * CHARS_PER_TOKEN
    }

    /// Character allowance for one of the three sections (original, staged,
    /// diff) of a small text file.
    pub fn section_chars(&self) -> usize {
        self.per_file_chars() / 3
    }
}

/// Derive a line cap from a character budget.
pub fn line_allowance(chars: usize) -> usize {
    (chars / EST_CHARS_PER_LINE).max(MIN_SECTION_LINES)
}

/// Truncate a text to at most `max_lines` lines.
///
/// When cut, the kept lines are followed by an explicit marker so truncation
/// is always visible in the emitted context.
pub fn truncate_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= max_lines {
        return text.to_string();
    }

    let mut result = lines[..max_lines].join("\n");
    result.push('\n');
    result.push_str(&format!("... (truncated, showing first {max_lines} lines)"));
    result
}

/// Hard-truncate a blob to a token ceiling, appending the size-limit marker.
///
/// Only applied after line-level truncation has already failed to bring the
/// blob under the ceiling.
pub fn hard_truncate(text: &str, ceiling_tokens: usize) -> String {
    const MARKER: &str = "\n[CONTEXT TRUNCATED DUE TO SIZE LIMITS]";

    let max_chars = ceiling_tokens * CHARS_PER_TOKEN;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(MARKER.chars().count());
    let mut result: String = text.chars().take(keep).collect();
    result.push_str(MARKER);
    result
}
