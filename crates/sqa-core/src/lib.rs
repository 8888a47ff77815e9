//! # sqa-core
//!
//! Core types shared across the ScreenQA toolkit crates:
//! - Record structs for the three dataset variants (full ScreenQA,
//!   ScreenQA-Short, ComplexQA) and for model predictions
//! - `Dataset`, the validated in-memory record set tagged with its variant
//! - `Variant` and `Task` enums
//! - Cross-cutting error types (`ValidationError`, `LookupError`)
//!
//! All wire structs derive `Serialize`, `Deserialize`, and `JsonSchema`. The
//! field names are the published dataset contract and must not be renamed.

pub mod dataset;
pub mod enums;
pub mod errors;
pub mod prediction;
pub mod records;

pub use dataset::{Dataset, EntryKey, QaRecord};
pub use enums::{Task, Variant};
pub use errors::{LookupError, ValidationError, ValidationIssue};
pub use prediction::{PredictedElement, Prediction};
pub use records::{
    Bounds, GroundTruthAnnotation, QuestionAnswerEntry, Screenshot, ShortAnswerEntry, UiElementRef,
};
