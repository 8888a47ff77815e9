//! # sqa-metrics
//!
//! Scoring of model predictions against ScreenQA references.
//!
//! - `sqa_s`: short-answer text similarity (SQuAD-normalized exact match and
//!   token F1)
//! - `uic`: UI element identification by view-hierarchy index
//! - `uic_bb`: UI element identification by bounding-box overlap, matched
//!   one-to-one with an optimal assignment
//! - `Evaluator`: aligns predictions with references, scores every entry
//!   (optionally on a rayon pool), and reduces to corpus means
//!
//! Element comparisons (index sets, box lists) share one degenerate rule: two
//! empty sides score 1, exactly one empty side scores 0. Token F1 has no such
//! rule and scores 0 whenever no token is shared. Entry scores take the best
//! rater; corpus scores are unweighted means over entries in reference order.

pub mod assignment;
mod engine;
mod error;
pub mod geometry;
pub mod normalize;
pub mod overlap;
mod report;
pub mod sqa_s;
pub mod uic;
pub mod uic_bb;

pub use engine::{CancellationFlag, Evaluator, evaluate};
pub use error::MetricError;
pub use report::{CorpusReport, EntryMetrics, EntryScore, Evaluation};
