//! Per-entry and corpus-level results.

use serde::Serialize;
use sqa_core::{EntryKey, Task};

/// Scores for one entry, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryMetrics {
    pub exact_match: f64,

    /// Token F1 (SQA-S), index-set F1 (SQA-UIC), or content-aware F1@IoU
    /// (SQA-UIC-BB).
    pub f1: f64,

    /// BBox-F1@IoU; SQA-UIC-BB only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox_f1: Option<f64>,
}

impl EntryMetrics {
    /// Score given to a reference entry with no prediction.
    #[must_use]
    pub const fn zero(task: Task) -> Self {
        Self {
            exact_match: 0.0,
            f1: 0.0,
            bbox_f1: match task {
                Task::SqaUicBb => Some(0.0),
                Task::SqaS | Task::SqaUic => None,
            },
        }
    }

    /// The headline number for `task`.
    #[must_use]
    pub fn primary(&self, task: Task) -> f64 {
        match task {
            Task::SqaS | Task::SqaUic => self.f1,
            Task::SqaUicBb => self.bbox_f1.unwrap_or(0.0),
        }
    }
}

/// Outcome for one reference entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryScore {
    pub index: usize,

    #[serde(flatten)]
    pub key: EntryKey,

    /// Whether a prediction was supplied for this entry.
    pub predicted: bool,

    /// `None` when the entry has nothing to score under the task (SQA-UIC
    /// entries whose raters all drew their elements by hand).
    pub metrics: Option<EntryMetrics>,
}

/// Corpus-level means over all scored entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusReport {
    pub task: Task,

    /// Primary score: F1 for SQA-S and SQA-UIC, BBox-F1@IoU for SQA-UIC-BB.
    pub score: f64,

    pub exact_match: f64,
    pub f1: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox_f1: Option<f64>,

    /// Reference entries in the dataset.
    pub entries: usize,

    /// Entries included in the means.
    pub scored: usize,

    /// Reference entries that received a prediction.
    pub matched_predictions: usize,

    /// Scored entries without a prediction (each contributes 0).
    pub missing_predictions: usize,

    /// Entries excluded from the means.
    pub skipped: usize,
}

impl CorpusReport {
    /// Reduce entry scores to unweighted means. Sums run sequentially in
    /// entry order so the result does not depend on how entries were
    /// scheduled.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_entries(task: Task, entries: &[EntryScore]) -> Self {
        let mut scored = 0_usize;
        let mut missing_predictions = 0_usize;
        let mut matched_predictions = 0_usize;
        let mut exact_match = 0.0_f64;
        let mut f1 = 0.0_f64;
        let mut bbox_f1 = 0.0_f64;

        for entry in entries {
            if entry.predicted {
                matched_predictions += 1;
            }
            let Some(metrics) = entry.metrics else {
                continue;
            };
            scored += 1;
            if !entry.predicted {
                missing_predictions += 1;
            }
            exact_match += metrics.exact_match;
            f1 += metrics.f1;
            bbox_f1 += metrics.bbox_f1.unwrap_or(0.0);
        }

        let mean = |sum: f64| {
            if scored == 0 {
                0.0
            } else {
                sum / scored as f64
            }
        };

        let bbox_f1 = matches!(task, Task::SqaUicBb).then(|| mean(bbox_f1));
        let f1 = mean(f1);
        let score = match task {
            Task::SqaS | Task::SqaUic => f1,
            Task::SqaUicBb => bbox_f1.unwrap_or(0.0),
        };

        Self {
            task,
            score,
            exact_match: mean(exact_match),
            f1,
            bbox_f1,
            entries: entries.len(),
            scored,
            matched_predictions,
            missing_predictions,
            skipped: entries.len() - scored,
        }
    }
}

/// Full result of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub report: CorpusReport,
    pub entries: Vec<EntryScore>,
}
