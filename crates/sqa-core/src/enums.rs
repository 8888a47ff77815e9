//! Dataset variants and scoring tasks.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ParseEnumError;

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Which of the three published dataset shapes a file follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Full ScreenQA: per-rater full answers with UI element references.
    Full,
    /// ScreenQA-Short: flat short-answer lists.
    Short,
    /// ComplexQA: same shape as ScreenQA-Short.
    Complex,
}

impl Variant {
    pub const ALL: [Self; 3] = [Self::Full, Self::Short, Self::Complex];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Short => "short",
            Self::Complex => "complex",
        }
    }

    /// Name of the registered JSON Schema for this variant.
    #[must_use]
    pub const fn schema_name(self) -> &'static str {
        match self {
            Self::Full => "full_qa",
            Self::Short => "short_qa",
            Self::Complex => "complex_qa",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "variant",
                value: s.to_string(),
                expected: "full, short, complex",
            })
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// The three ScreenQA scoring tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    /// Short-answer text similarity.
    SqaS,
    /// UI element identification by view-hierarchy index.
    SqaUic,
    /// UI element identification by bounding-box overlap.
    SqaUicBb,
}

impl Task {
    pub const ALL: [Self; 3] = [Self::SqaS, Self::SqaUic, Self::SqaUicBb];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SqaS => "sqa-s",
            Self::SqaUic => "sqa-uic",
            Self::SqaUicBb => "sqa-uic-bb",
        }
    }

    /// Whether the task reads `ui_elements` and so needs full ScreenQA
    /// references.
    #[must_use]
    pub const fn needs_ui_elements(self) -> bool {
        matches!(self, Self::SqaUic | Self::SqaUicBb)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "task",
                value: s.to_string(),
                expected: "sqa-s, sqa-uic, sqa-uic-bb",
            })
    }
}
