//! Textual word-list format: one hexadecimal instruction word per line.
//!
//! This is the interchange format between the assembler and the simulator
//! loader. Lines hold a single word as hexadecimal with an optional `0x`
//! prefix; `#` starts a comment and blank lines are ignored. The writer
//! always emits the `0x%08X` form.

use std::error::Error;
use std::fmt;
use std::fmt::Write as _;

/// A malformed line in a word-list file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFileError {
    /// 1-indexed source line.
    pub line: usize,
    /// Offending token.
    pub token: String,
}

impl fmt::Display for WordFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: error: '{}' is not a 32-bit hexadecimal word",
            self.line, self.token
        )
    }
}

impl Error for WordFileError {}

/// Parses a word-list text into instruction words.
///
/// # Errors
///
/// Returns a [`WordFileError`] for the first line that is not a 32-bit
/// hexadecimal word.
pub fn parse_words(text: &str) -> Result<Vec<u32>, WordFileError> {
    let mut words = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let token = line.split('#').next().unwrap_or("").trim();
        if token.is_empty() {
            continue;
        }
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        let word = u32::from_str_radix(digits, 16).map_err(|_| WordFileError {
            line: index + 1,
            token: token.to_owned(),
        })?;
        words.push(word);
    }
    Ok(words)
}

/// Formats instruction words as word-list text.
#[must_use]
pub fn format_words(words: &[u32]) -> String {
    let mut out = String::with_capacity(words.len() * 11);
    for word in words {
        // Infallible for String targets.
        let _ = writeln!(out, "0x{word:08X}");
    }
    out
}
