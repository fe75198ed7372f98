//! Advisory lints on the sanitized commit message.
//!
//! Warnings are shown alongside the proposed message and never block a
//! commit.

use std::fmt;

use crate::prompt::CommitStyle;

/// Subject and body line length ceiling.
const LINE_CEILING: usize = 72;

/// Past-tense verbs that suggest the subject is not in imperative mood.
const PAST_TENSE_VERBS: &[&str] = &[
    "added", "fixed", "updated", "changed", "removed", "deleted", "created", "implemented",
    "improved", "refactored", "moved", "renamed", "cleaned", "bumped", "merged", "adjusted",
    "corrected", "modified", "replaced", "reverted",
];

/// A single advisory finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintWarning {
    SubjectTooLong { length: usize },
    TrailingPeriod,
    PastTenseVerb { verb: String },
    /// Conventional style expects a lowercase verb after `type(scope):`.
    DescriptionNotLowercase,
    /// Plain style expects a capitalized subject.
    SubjectNotCapitalized,
    /// Conventional style expects a `type(scope):` prefix.
    MissingTypePrefix,
    BodyLineTooLong { line: usize, length: usize },
    BreakingChangeMarker,
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintWarning::SubjectTooLong { length } => {
                write!(f, "subject line is {length} characters (limit {LINE_CEILING})")
            }
            LintWarning::TrailingPeriod => write!(f, "subject line ends with a period"),
            LintWarning::PastTenseVerb { verb } => {
                write!(f, "subject uses past tense '{verb}' (prefer imperative mood)")
            }
            LintWarning::DescriptionNotLowercase => {
                write!(f, "description after the colon should start lowercase")
            }
            LintWarning::SubjectNotCapitalized => {
                write!(f, "subject should start with a capital letter")
            }
            LintWarning::MissingTypePrefix => {
                write!(f, "subject is missing a 'type(scope):' prefix")
            }
            LintWarning::BodyLineTooLong { line, length } => {
                write!(f, "body line {line} is {length} characters (limit {LINE_CEILING})")
            }
            LintWarning::BreakingChangeMarker => {
                write!(f, "message declares a breaking change")
            }
        }
    }
}

/// Lint a sanitized commit message against the active style.
pub fn lint(message: &str, style: CommitStyle) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    let mut lines = message.lines();
    let subject = lines.next().unwrap_or_default();
    let body: Vec<&str> = lines.collect();

    let subject_len = subject.chars().count();
    if subject_len > LINE_CEILING {
        warnings.push(LintWarning::SubjectTooLong { length: subject_len });
    }

    if subject.trim_end().ends_with('.') {
        warnings.push(LintWarning::TrailingPeriod);
    }

    // The part the verb check and casing check apply to: after the
    // conventional prefix when present, the whole subject otherwise.
    let (prefix, description) = match subject.split_once(':') {
        Some((prefix, rest)) => (Some(prefix), rest.trim_start()),
        None => (None, subject),
    };

    if let Some(first_word) = description.split_whitespace().next() {
        let lowered = first_word.to_ascii_lowercase();
        if PAST_TENSE_VERBS.contains(&lowered.as_str()) {
            warnings.push(LintWarning::PastTenseVerb { verb: lowered });
        }
    }

    match style {
        CommitStyle::Conventional => {
            if prefix.is_none() {
                warnings.push(LintWarning::MissingTypePrefix);
            }
            if prefix.is_some()
                && description.chars().next().is_some_and(|c| c.is_uppercase())
            {
                warnings.push(LintWarning::DescriptionNotLowercase);
            }
        }
        CommitStyle::Plain => {
            if subject.chars().next().is_some_and(|c| c.is_lowercase()) {
                warnings.push(LintWarning::SubjectNotCapitalized);
            }
        }
    }

    for (idx, line) in body.iter().enumerate() {
        let len = line.chars().count();
        if len > LINE_CEILING {
            warnings.push(LintWarning::BodyLineTooLong {
                line: idx + 2,
                length: len,
            });
        }
    }

    let subject_has_bang = prefix.is_some_and(|p| p.ends_with('!'));
    let body_has_marker = body.iter().any(|l| l.starts_with("BREAKING CHANGE:"));
    if subject_has_bang || body_has_marker {
        warnings.push(LintWarning::BreakingChangeMarker);
    }

    warnings
}
