//! Model predictions to be scored against a reference dataset.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::records::Bounds;

/// A UI element named by a model. Which fields are needed depends on the
/// task: SQA-UIC reads `vh_index`, SQA-UIC-BB reads `bounds` (and `text` for
/// the content-aware F1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PredictedElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = -1))]
    pub vh_index: Option<i64>,
}

/// A model's output for one `(image_id, question)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Prediction {
    pub image_id: String,

    pub question: String,

    /// Short answer. `None` is scored as the no-answer sentinel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    #[serde(default)]
    pub ui_elements: Vec<PredictedElement>,
}

impl Prediction {
    /// Predicted view-hierarchy indices, skipping elements without one and
    /// rater-drawn sentinels.
    pub fn vh_indices(&self) -> impl Iterator<Item = i64> + '_ {
        self.ui_elements
            .iter()
            .filter_map(|el| el.vh_index)
            .filter(|idx| *idx >= 0)
    }
}
