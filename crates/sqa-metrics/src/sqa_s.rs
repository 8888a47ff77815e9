//! SQA-S: short-answer text similarity.

use crate::normalize::{normalize_answer, tokens};
use crate::overlap::token_f1;
use crate::report::EntryMetrics;

/// Score one predicted answer against every reference answer of an entry.
///
/// The no-answer sentinel is compared verbatim before normalization: a
/// sentinel prediction scores 1 only if some rater also gave the sentinel,
/// and sentinel references never match a real answer.
#[must_use]
pub fn score_answer(prediction: &str, references: &[&str], no_answer: &str) -> EntryMetrics {
    if prediction == no_answer {
        let value = if references.iter().any(|r| *r == no_answer) {
            1.0
        } else {
            0.0
        };
        return text_metrics(value, value);
    }

    let references: Vec<String> = references
        .iter()
        .filter(|r| **r != no_answer)
        .map(|r| normalize_answer(r))
        .collect();
    if references.is_empty() {
        return text_metrics(0.0, 0.0);
    }

    let prediction = normalize_answer(prediction);
    let prediction_tokens = tokens(&prediction);

    let exact_match = references.iter().any(|r| *r == prediction);
    let f1 = references
        .iter()
        .map(|r| token_f1(&prediction_tokens, &tokens(r)))
        .fold(0.0, f64::max);

    text_metrics(if exact_match { 1.0 } else { 0.0 }, f1)
}

const fn text_metrics(exact_match: f64, f1: f64) -> EntryMetrics {
    EntryMetrics {
        exact_match,
        f1,
        bbox_f1: None,
    }
}
