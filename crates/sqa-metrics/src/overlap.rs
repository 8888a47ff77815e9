//! Overlap F1 between a prediction and one reference.

use std::collections::{BTreeSet, HashMap};

/// F1 from a match count and the two collection sizes. Zero matches score 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn f1_from_counts(matched: usize, predicted: usize, expected: usize) -> f64 {
    if matched == 0 {
        return 0.0;
    }
    let precision = matched as f64 / predicted as f64;
    let recall = matched as f64 / expected as f64;
    (2.0 * precision * recall) / (precision + recall)
}

/// Score for comparisons where at least one side is empty: 1 when both are,
/// 0 otherwise. `None` when both sides have items.
#[must_use]
pub const fn degenerate_score(predicted: usize, expected: usize) -> Option<f64> {
    match (predicted, expected) {
        (0, 0) => Some(1.0),
        (0, _) | (_, 0) => Some(0.0),
        _ => None,
    }
}

/// Multiset token F1 (each token matches at most as often as it occurs on
/// both sides). No shared token scores 0, even when both lists are empty.
#[must_use]
pub fn token_f1(prediction: &[&str], reference: &[&str]) -> f64 {
    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for token in reference {
        *remaining.entry(*token).or_default() += 1;
    }

    let mut common = 0;
    for token in prediction {
        if let Some(count) = remaining.get_mut(token) {
            if *count > 0 {
                *count -= 1;
                common += 1;
            }
        }
    }

    f1_from_counts(common, prediction.len(), reference.len())
}

/// Set F1: `2|P ∩ R| / (|P| + |R|)`.
#[must_use]
pub fn set_f1<T: Ord>(prediction: &BTreeSet<T>, reference: &BTreeSet<T>) -> f64 {
    if let Some(score) = degenerate_score(prediction.len(), reference.len()) {
        return score;
    }
    let common = prediction.intersection(reference).count();
    f1_from_counts(common, prediction.len(), reference.len())
}
