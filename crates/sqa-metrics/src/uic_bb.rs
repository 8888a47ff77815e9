//! SQA-UIC-BB: UI element identification by bounding-box overlap.
//!
//! Every reference element takes part, rater-drawn ones included. Predicted
//! elements without bounds are ignored.

use sqa_core::{Bounds, GroundTruthAnnotation, PredictedElement, UiElementRef};

use crate::assignment::matching_f1;
use crate::geometry::iou;
use crate::report::EntryMetrics;

/// A rectangle with the text shown inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxElement<'a> {
    pub bounds: Bounds,
    pub text: Option<&'a str>,
}

impl<'a> BoxElement<'a> {
    #[must_use]
    pub fn from_reference(element: &'a UiElementRef) -> Self {
        Self {
            bounds: element.bounds,
            text: Some(element.text.as_str()),
        }
    }

    /// `None` for elements the model gave no bounds for.
    #[must_use]
    pub fn from_prediction(element: &'a PredictedElement) -> Option<Self> {
        element.bounds.map(|bounds| Self {
            bounds,
            text: element.text.as_deref(),
        })
    }

    /// Same text on both sides. A missing text never matches.
    fn same_text(&self, other: &Self) -> bool {
        matches!((self.text, other.text), (Some(a), Some(b)) if a == b)
    }

    fn matches(&self, other: &Self, threshold: f64) -> bool {
        self.same_text(other) && iou(self.bounds, other.bounds) >= threshold
    }
}

/// Box elements of each rater, in rater order.
#[must_use]
pub fn rater_boxes(ground_truth: &[GroundTruthAnnotation]) -> Vec<Vec<BoxElement<'_>>> {
    ground_truth
        .iter()
        .map(|annotation| {
            annotation
                .ui_elements
                .iter()
                .map(BoxElement::from_reference)
                .collect()
        })
        .collect()
}

/// Box elements of a prediction, skipping elements without bounds.
#[must_use]
pub fn predicted_boxes(elements: &[PredictedElement]) -> Vec<BoxElement<'_>> {
    elements.iter().filter_map(BoxElement::from_prediction).collect()
}

/// Position-by-position match: same length, and each pair has the same text
/// and overlaps by at least `threshold`.
#[must_use]
pub fn ordered_exact_match(
    predicted: &[BoxElement],
    reference: &[BoxElement],
    threshold: f64,
) -> bool {
    predicted.len() == reference.len()
        && predicted
            .iter()
            .zip(reference)
            .all(|(p, r)| p.matches(r, threshold))
}

/// BBox-F1@IoU, content-aware F1@IoU and EM@IoU, each the best over raters.
#[must_use]
pub fn score_boxes(
    predicted: &[BoxElement],
    raters: &[Vec<BoxElement>],
    threshold: f64,
) -> EntryMetrics {
    let mut bbox_f1 = 0.0_f64;
    let mut f1 = 0.0_f64;
    let mut exact_match = false;

    for reference in raters {
        bbox_f1 = bbox_f1.max(matching_f1(predicted, reference, threshold, |p, r| {
            iou(p.bounds, r.bounds)
        }));
        f1 = f1.max(matching_f1(predicted, reference, threshold, |p, r| {
            if p.same_text(r) {
                iou(p.bounds, r.bounds)
            } else {
                0.0
            }
        }));
        exact_match = exact_match || ordered_exact_match(predicted, reference, threshold);
    }

    EntryMetrics {
        exact_match: if exact_match { 1.0 } else { 0.0 },
        f1,
        bbox_f1: Some(bbox_f1),
    }
}
