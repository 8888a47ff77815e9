//! Validated in-memory record sets.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::enums::Variant;
use crate::prediction::Prediction;
use crate::records::{QuestionAnswerEntry, Screenshot, ShortAnswerEntry};

/// Alignment key between predictions and references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    pub image_id: String,
    pub question: String,
}

impl EntryKey {
    #[must_use]
    pub fn new(image_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            question: question.into(),
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image_id={} question={:?}", self.image_id, self.question)
    }
}

/// Anything addressed by `(image_id, question)`.
pub trait QaRecord {
    fn image_id(&self) -> &str;
    fn question(&self) -> &str;

    fn dimensions(&self) -> (Option<u32>, Option<u32>) {
        (None, None)
    }

    fn key(&self) -> EntryKey {
        EntryKey::new(self.image_id(), self.question())
    }
}

impl QaRecord for QuestionAnswerEntry {
    fn image_id(&self) -> &str {
        &self.image_id
    }

    fn question(&self) -> &str {
        &self.question
    }

    fn dimensions(&self) -> (Option<u32>, Option<u32>) {
        (self.image_width, self.image_height)
    }
}

impl QaRecord for ShortAnswerEntry {
    fn image_id(&self) -> &str {
        &self.image_id
    }

    fn question(&self) -> &str {
        &self.question
    }

    fn dimensions(&self) -> (Option<u32>, Option<u32>) {
        (self.image_width, self.image_height)
    }
}

impl QaRecord for Prediction {
    fn image_id(&self) -> &str {
        &self.image_id
    }

    fn question(&self) -> &str {
        &self.question
    }
}

/// A validated dataset file, tagged with its variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    Full(Vec<QuestionAnswerEntry>),
    Short(Vec<ShortAnswerEntry>),
    Complex(Vec<ShortAnswerEntry>),
}

impl Dataset {
    #[must_use]
    pub const fn variant(&self) -> Variant {
        match self {
            Self::Full(_) => Variant::Full,
            Self::Short(_) => Variant::Short,
            Self::Complex(_) => Variant::Complex,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Full(entries) => entries.len(),
            Self::Short(entries) | Self::Complex(entries) => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry keys in document order.
    #[must_use]
    pub fn keys(&self) -> Vec<EntryKey> {
        match self {
            Self::Full(entries) => entries.iter().map(QaRecord::key).collect(),
            Self::Short(entries) | Self::Complex(entries) => {
                entries.iter().map(QaRecord::key).collect()
            }
        }
    }

    /// Distinct screenshots in order of first appearance. Dimensions come
    /// from the first entry of each screenshot that carries them.
    #[must_use]
    pub fn screenshots(&self) -> Vec<Screenshot> {
        match self {
            Self::Full(entries) => group_screenshots(entries),
            Self::Short(entries) | Self::Complex(entries) => group_screenshots(entries),
        }
    }

    /// Serialize back to the wire shape.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Self::Full(entries) => serde_json::to_value(entries),
            Self::Short(entries) | Self::Complex(entries) => serde_json::to_value(entries),
        }
    }
}

fn group_screenshots<T: QaRecord>(entries: &[T]) -> Vec<Screenshot> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut screenshots: Vec<Screenshot> = Vec::new();

    for entry in entries {
        let (width, height) = entry.dimensions();
        if let Some(&pos) = positions.get(entry.image_id()) {
            let shot = &mut screenshots[pos];
            if shot.image_width.is_none() && shot.image_height.is_none() {
                shot.image_width = width;
                shot.image_height = height;
            }
        } else {
            positions.insert(entry.image_id(), screenshots.len());
            screenshots.push(Screenshot {
                image_id: entry.image_id().to_string(),
                image_width: width,
                image_height: height,
            });
        }
    }

    screenshots
}
