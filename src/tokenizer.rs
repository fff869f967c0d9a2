//! Program tokenizer
//!
//! Programs are whitespace-separated words. A word starting with `#` begins a
//! comment that runs to the end of its line.

use crate::error::{Error, Result};
use crate::machine::Limits;

/// Split `source` into tokens, enforcing the size limits
pub fn tokenize(source: &str, limits: &Limits) -> Result<Vec<String>> {
    let mut tokens = Vec::new();

    for line in source.lines() {
        for word in line.split_whitespace() {
            if word.starts_with('#') {
                break;
            }
            if tokens.len() == limits.max_tokens {
                return Err(Error::TooManyTokens {
                    limit: limits.max_tokens,
                });
            }
            if word.len() > limits.max_token_len {
                return Err(Error::TokenTooLong {
                    token: word.to_string(),
                    index: tokens.len(),
                    limit: limits.max_token_len,
                });
            }
            tokens.push(word.to_string());
        }
    }

    Ok(tokens)
}
