//! SQA-UIC: UI element identification by view-hierarchy index.
//!
//! Rater-drawn elements (`vh_index = -1`) have no index a model could name,
//! so they are dropped from each rater's set. A rater who pointed only at
//! drawn elements gives no usable reference and is skipped.

use std::collections::BTreeSet;

use sqa_core::GroundTruthAnnotation;

use crate::overlap::set_f1;
use crate::report::EntryMetrics;

/// Index set of each usable rater, in rater order.
#[must_use]
pub fn rater_index_sets(ground_truth: &[GroundTruthAnnotation]) -> Vec<BTreeSet<i64>> {
    ground_truth
        .iter()
        .filter_map(|annotation| {
            let indices: BTreeSet<i64> = annotation
                .ui_elements
                .iter()
                .filter(|el| !el.is_rater_drawn())
                .map(|el| el.vh_index)
                .collect();
            if indices.is_empty() && !annotation.ui_elements.is_empty() {
                None
            } else {
                Some(indices)
            }
        })
        .collect()
}

/// Best set F1 and exact match over raters. `None` when no rater is usable.
#[must_use]
pub fn score_indices(
    predicted: &BTreeSet<i64>,
    raters: &[BTreeSet<i64>],
) -> Option<EntryMetrics> {
    if raters.is_empty() {
        return None;
    }

    let f1 = raters
        .iter()
        .map(|reference| set_f1(predicted, reference))
        .fold(0.0, f64::max);
    let exact_match = raters.iter().any(|reference| reference == predicted);

    Some(EntryMetrics {
        exact_match: if exact_match { 1.0 } else { 0.0 },
        f1,
        bbox_f1: None,
    })
}
