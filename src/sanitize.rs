//! Lexical cleanup of raw model output.
//!
//! Models wrap commit messages in code fences or sprinkle markdown emphasis
//! despite instructions. The sanitizer is an ordered list of independent
//! text transforms; the composition is idempotent and knows nothing about
//! message semantics.

/// Drop fence delimiter lines (``` with optional language tag).
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove bold, bold-underscore, and inline-code markers.
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "").replace('`', "")
}

/// Remove paired single-asterisk and single-underscore italic markers.
///
/// Runs after [`strip_emphasis`], so any remaining markers are singles.
/// Underscores inside a word (snake_case identifiers) are never treated as
/// markers.
pub fn strip_italics(text: &str) -> String {
    strip_paired(&strip_paired(text, '*', true), '_', false)
}

/// Strip paired occurrences of `marker`. A marker opens before a non-space
/// character and closes after one; unmatched markers stay in place, which
/// keeps the transform idempotent. With `intraword` false, a marker flanked
/// by alphanumerics on the relevant side neither opens nor closes.
fn strip_paired(text: &str, marker: char, intraword: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out: Vec<char> = Vec::with_capacity(chars.len());
    let mut open: Option<usize> = None;

    for (i, &c) in chars.iter().enumerate() {
        if c != marker {
            if c == '\n' {
                open = None;
            }
            out.push(c);
            continue;
        }

        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1).copied();

        let closes = prev.is_some_and(|p| !p.is_whitespace() && p != marker)
            && (intraword || !next.is_some_and(|n| n.is_alphanumeric()));
        if closes && let Some(opener) = open.take() {
            out.remove(opener);
            continue;
        }

        let opens = next.is_some_and(|n| !n.is_whitespace() && n != marker)
            && (intraword || !prev.is_some_and(|p| p.is_alphanumeric()));
        if opens {
            open = Some(out.len());
        }
        out.push(c);
    }

    out.into_iter().collect()
}

/// Remove leading markdown heading markers on each line.
///
/// Strips repeatedly so stacked markers (`## # x`) come off in one pass,
/// which keeps the whole sanitizer idempotent.
pub fn strip_headings(text: &str) -> String {
    text.lines()
        .map(|line| {
            let mut rest = line.trim_start();
            loop {
                let hashes = rest.chars().take_while(|c| *c == '#').count();
                if hashes > 0 && rest[hashes..].starts_with(' ') {
                    rest = rest[hashes + 1..].trim_start();
                } else {
                    break;
                }
            }
            if rest == line.trim_start() { line } else { rest }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim each line and drop blank ones, rejoining with newlines.
pub fn trim_and_filter_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sanitize a raw model response into a clean commit message.
///
/// Applies, in order: strip fences, strip emphasis, strip italics, strip
/// headings, trim and filter lines.
pub fn sanitize(raw: &str) -> String {
    let text = strip_code_fences(raw);
    let text = strip_emphasis(&text);
    let text = strip_italics(&text);
    let text = strip_headings(&text);
    trim_and_filter_lines(&text)
}
