//! Reference records for the three dataset variants.
//!
//! Full ScreenQA entries carry one `GroundTruthAnnotation` per rater, each with
//! a free-text answer and the UI elements the rater pointed at. ScreenQA-Short
//! and ComplexQA share the flat `ShortAnswerEntry` shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `vh_index` value for elements drawn by a rater that have no view-hierarchy
/// counterpart.
pub const RATER_DRAWN_VH_INDEX: i64 = -1;

/// Pixel rectangle as `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Bounds(pub [i64; 4]);

impl Bounds {
    #[must_use]
    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self([left, top, right, bottom])
    }

    #[must_use]
    pub const fn left(self) -> i64 {
        self.0[0]
    }

    #[must_use]
    pub const fn top(self) -> i64 {
        self.0[1]
    }

    #[must_use]
    pub const fn right(self) -> i64 {
        self.0[2]
    }

    #[must_use]
    pub const fn bottom(self) -> i64 {
        self.0[3]
    }

    #[must_use]
    pub const fn width(self) -> i64 {
        self.right() - self.left()
    }

    #[must_use]
    pub const fn height(self) -> i64 {
        self.bottom() - self.top()
    }

    /// Area in square pixels, widened so any pair of non-negative `i64`
    /// extents fits. Negative when the rectangle is inverted on exactly one
    /// axis, so callers should check [`Bounds::violation`] first.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn area(self) -> i128 {
        self.width() as i128 * self.height() as i128
    }

    /// Describe the first broken invariant, or `None` when the rectangle has
    /// non-negative coordinates with `left <= right` and `top <= bottom`.
    #[must_use]
    pub fn violation(self) -> Option<String> {
        if let Some(coord) = self.0.iter().find(|c| **c < 0) {
            return Some(format!("bounds {:?} contain negative coordinate {coord}", self.0));
        }
        if self.left() > self.right() {
            return Some(format!(
                "bounds {:?} have left {} greater than right {}",
                self.0,
                self.left(),
                self.right()
            ));
        }
        if self.top() > self.bottom() {
            return Some(format!(
                "bounds {:?} have top {} greater than bottom {}",
                self.0,
                self.top(),
                self.bottom()
            ));
        }
        None
    }

    #[must_use]
    pub fn is_well_formed(self) -> bool {
        self.violation().is_none()
    }
}

/// A UI element referenced by a rater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UiElementRef {
    /// Text describing the on-screen element.
    pub text: String,

    pub bounds: Bounds,

    /// Depth-first index into the screenshot's view hierarchy, or `-1` for
    /// rater-drawn elements.
    #[schemars(range(min = -1))]
    pub vh_index: i64,
}

impl UiElementRef {
    #[must_use]
    pub const fn is_rater_drawn(&self) -> bool {
        self.vh_index == RATER_DRAWN_VH_INDEX
    }
}

/// One rater's answer to a full ScreenQA question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GroundTruthAnnotation {
    pub full_answer: String,
    pub ui_elements: Vec<UiElementRef>,
}

/// A question about one screenshot in the full ScreenQA dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionAnswerEntry {
    pub image_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,

    pub question: String,

    /// One annotation per rater.
    #[schemars(length(min = 1))]
    pub ground_truth: Vec<GroundTruthAnnotation>,
}

/// A question with a flat list of short answers (ScreenQA-Short, ComplexQA).
///
/// ComplexQA currently ships one answer per entry; longer lists are valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ShortAnswerEntry {
    pub image_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,

    pub question: String,

    #[schemars(length(min = 1))]
    pub ground_truth: Vec<String>,
}

/// A screenshot of the external Rico corpus, identified only by `image_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    pub image_id: String,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_accessors_follow_wire_order() {
        let b = Bounds::new(10, 20, 110, 70);
        assert_eq!(b.left(), 10);
        assert_eq!(b.top(), 20);
        assert_eq!(b.right(), 110);
        assert_eq!(b.bottom(), 70);
        assert_eq!(b.area(), 100 * 50);
    }

    #[test]
    fn area_of_huge_rectangle_does_not_overflow() {
        let side = 1_i64 << 32;
        assert_eq!(Bounds::new(0, 0, side, side).area(), 1_i128 << 64);
    }

    #[test]
    fn degenerate_rectangle_is_well_formed() {
        assert!(Bounds::new(5, 5, 5, 5).is_well_formed());
    }

    #[test]
    fn inverted_bounds_are_reported() {
        let msg = Bounds::new(50, 0, 10, 10).violation().unwrap();
        assert!(msg.contains("left 50 greater than right 10"), "{msg}");

        let msg = Bounds::new(0, 40, 10, 10).violation().unwrap();
        assert!(msg.contains("top 40 greater than bottom 10"), "{msg}");
    }

    #[test]
    fn negative_coordinate_is_reported() {
        let msg = Bounds::new(-1, 0, 10, 10).violation().unwrap();
        assert!(msg.contains("negative coordinate -1"), "{msg}");
    }

    #[test]
    fn bounds_serialize_as_plain_array() {
        let json = serde_json::to_string(&Bounds::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json, "[1,2,3,4]");
    }

    #[test]
    fn rater_drawn_flag() {
        let el = UiElementRef {
            text: "drawn".into(),
            bounds: Bounds::new(0, 0, 1, 1),
            vh_index: RATER_DRAWN_VH_INDEX,
        };
        assert!(el.is_rater_drawn());
    }

    #[test]
    fn optional_dimensions_are_omitted() {
        let entry = ShortAnswerEntry {
            image_id: "123".into(),
            image_width: None,
            image_height: None,
            question: "q?".into(),
            ground_truth: vec!["a".into()],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("image_width").is_none());
        assert!(json.get("image_height").is_none());
    }
}
