//! Context budgeting: fit staged-change detail into a token ceiling.

pub mod budget;
pub mod builder;

pub use budget::{CHARS_PER_TOKEN, FLOOR_MIN_TOKENS, PromptBudget, estimate_tokens};
pub use builder::{
    BINARY_PLACEHOLDER, ContextBlob, DELETED_PLACEHOLDER, FileContext, LARGE_FILE_BYTES,
    build_context,
};
