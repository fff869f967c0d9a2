//! Error types for the whole pipeline
//!
//! Program errors name the token that caused them so a diagnostic can point
//! at the exact word of the source. Numeric trouble (log of zero, a zero time
//! constant) is never an error: NaN and infinity flow through the buffers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // === Tokenizer ===
    #[error("program has more than {limit} tokens")]
    TooManyTokens { limit: usize },

    #[error("token {index} '{token}' is longer than {limit} bytes")]
    TokenTooLong {
        token: String,
        index: usize,
        limit: usize,
    },

    // === Stack machine ===
    #[error("unknown command '{token}' at token {index}")]
    UnknownToken { token: String, index: usize },

    #[error("stack underflow at token {index} '{token}'")]
    StackUnderflow { token: String, index: usize },

    #[error("stack overflow at token {index} '{token}' (limit {limit})")]
    StackOverflow {
        token: String,
        index: usize,
        limit: usize,
    },

    #[error("'{token}' at token {index} reaches below the stack bottom (depth {depth})")]
    ReorderOutOfRange {
        token: String,
        index: usize,
        depth: usize,
    },

    #[error("'{token}' at token {index} is not a valid reorder, expected %<n>")]
    InvalidReorder { token: String, index: usize },

    #[error("'@' at token {index} has no variable name")]
    EmptyBinding { index: usize },

    #[error("']' at token {index} closes no list")]
    UnmatchedClose { index: usize },

    #[error("list opened at token {index} is never closed")]
    UnterminatedList { index: usize },

    #[error("list replay at token {index} '{token}' exceeded {limit} expansions")]
    ReplayLimit {
        token: String,
        index: usize,
        limit: usize,
    },

    #[error("program left {depth} values on the stack, expected exactly 1")]
    UnbalancedStack { depth: usize },

    #[error("program is empty")]
    EmptyProgram,

    // === Graph invariants ===
    #[error("internal error: unresolved list [{start}..+{count}] reached the evaluator")]
    UnresolvedList { start: usize, count: usize },

    #[error("internal error: operator '{name}' takes {expected} inputs, node has {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    // === Rendering ===
    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f32),

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
