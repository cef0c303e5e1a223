//! Token counting for size limits.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Debug;

/// Counts the tokens a model would see for a piece of text.
pub trait Tokenizer: Debug + Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
}

static PIECE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\p{L}+|\p{N}{1,3}|[^\s\p{L}\p{N}]")
        .expect("Hard-coded regex pattern should be valid")
});

/// Approximates BPE token counts without a vocabulary.
///
/// Text is split the way GPT pre-tokenizers split it: letter runs, groups
/// of up to three digits, and single symbols. A letter run costs one token
/// per `chars_per_token` characters, rounded up; everything else costs one.
/// Whitespace is free.
#[derive(Debug, Clone, Copy)]
pub struct RegexTokenizer {
    chars_per_token: usize,
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self { chars_per_token: 4 }
    }
}

impl RegexTokenizer {
    /// Creates a tokenizer charging one token per `chars_per_token` letters.
    ///
    /// Zero is treated as one.
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Tokenizer for RegexTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        PIECE_PATTERN
            .find_iter(text)
            .map(|piece| {
                let chars = piece.as_str().chars().count();
                if piece.as_str().starts_with(char::is_alphabetic) {
                    chars.div_ceil(self.chars_per_token)
                } else {
                    1
                }
            })
            .sum()
    }
}
