//! Metric engine error types.

use sqa_core::{EntryKey, LookupError, Task, Variant};
use thiserror::Error;

/// Errors from scoring a prediction file.
#[derive(Debug, Error)]
pub enum MetricError {
    /// Predictions whose key matches no reference entry.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The task needs references the dataset variant does not carry.
    #[error("task {task} requires full references, got the {variant} variant")]
    UnsupportedVariant { task: Task, variant: Variant },

    /// A record reached the engine in a state validation should have rejected.
    #[error("cannot score {key}: {reason}")]
    Computation { key: EntryKey, reason: String },

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("failed to build scoring thread pool: {0}")]
    ThreadPool(String),
}
