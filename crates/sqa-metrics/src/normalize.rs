//! SQuAD answer normalization.
//!
//! Scores are compared across implementations, so this follows the SQuAD
//! evaluation script exactly: lower-case, drop ASCII punctuation, replace the
//! articles `a`/`an`/`the` (on word boundaries) with a space, then collapse
//! whitespace.

use std::sync::LazyLock;

use regex::Regex;

static ARTICLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(a|an|the)\b").expect("article pattern is valid"));

/// Normalize an answer for comparison.
#[must_use]
pub fn normalize_answer(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|ch| !ch.is_ascii_punctuation())
        .collect();
    let without_articles = ARTICLES.replace_all(&stripped, " ");
    tokens(&without_articles).join(" ")
}

/// Split on whitespace and on the ASCII information separators
/// (U+001C..U+001F).
#[must_use]
pub fn tokens(text: &str) -> Vec<&str> {
    text.split(|ch: char| ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch))
        .filter(|token| !token.is_empty())
        .collect()
}
