//! Keyword normalization and validation.

use seowriter_shared::{Result, SeoWriterError};

/// A validated keyword: whitespace-collapsed, non-empty, within the word limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword(String);

impl Keyword {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split(' ').count()
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn cleanup_keyword(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check a keyword against the emptiness and word-count rules.
pub fn validate_keyword(raw: &str, max_words: usize) -> Result<()> {
    let cleaned = cleanup_keyword(raw);

    if cleaned.is_empty() {
        return Err(SeoWriterError::validation("Keyword cannot be empty."));
    }

    let word_count = cleaned.split(' ').count();
    if word_count > max_words {
        return Err(SeoWriterError::validation(format!(
            "Keyword is too long ({word_count} words). Max allowed is {max_words}."
        )));
    }

    Ok(())
}

/// Clean and validate raw user input.
pub fn process(raw: &str, max_words: usize) -> Result<Keyword> {
    let cleaned = cleanup_keyword(raw);
    validate_keyword(&cleaned, max_words)?;
    Ok(Keyword(cleaned))
}
