//! Corpus evaluation: align predictions with references, score every entry,
//! and reduce to corpus means.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use sqa_config::MetricsConfig;
use sqa_core::{
    Bounds, Dataset, EntryKey, LookupError, Prediction, QaRecord, QuestionAnswerEntry, Task,
};

use crate::error::MetricError;
use crate::report::{CorpusReport, EntryMetrics, EntryScore, Evaluation};
use crate::sqa_s::score_answer;
use crate::uic::{rater_index_sets, score_indices};
use crate::uic_bb::{predicted_boxes, rater_boxes, score_boxes};

/// Cooperative stop signal, checked before each entry is scored. Clones share
/// the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Scores prediction files under a fixed metrics configuration.
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: MetricsConfig,
    cancel: Option<CancellationFlag>,
}

type Aligned<'p> = HashMap<EntryKey, &'p Prediction>;

impl Evaluator {
    #[must_use]
    pub const fn new(config: MetricsConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Score `predictions` against `references` under `task`.
    ///
    /// # Errors
    ///
    /// - `MetricError::Lookup` if any prediction has no reference entry
    /// - `MetricError::UnsupportedVariant` for SQA-UIC tasks on non-full
    ///   references
    /// - `MetricError::Computation` if a malformed rectangle reaches SQA-UIC-BB
    /// - `MetricError::Cancelled` if the cancellation flag is raised mid-run
    /// - `MetricError::ThreadPool` if the worker pool cannot be built
    pub fn evaluate(
        &self,
        task: Task,
        references: &Dataset,
        predictions: &[Prediction],
    ) -> Result<Evaluation, MetricError> {
        if task.needs_ui_elements() && !matches!(references, Dataset::Full(_)) {
            return Err(MetricError::UnsupportedVariant {
                task,
                variant: references.variant(),
            });
        }

        let aligned = align(references, predictions)?;

        let entries = match references {
            Dataset::Full(entries) => match task {
                Task::SqaS => self.score_all(entries, &aligned, |entry, prediction| {
                    let answers: Vec<&str> = entry
                        .ground_truth
                        .iter()
                        .map(|g| g.full_answer.as_str())
                        .collect();
                    Ok(Some(self.score_text(prediction, &answers)))
                })?,
                Task::SqaUic => self.score_all(entries, &aligned, |entry, prediction| {
                    Ok(score_uic(entry, prediction))
                })?,
                Task::SqaUicBb => self.score_all(entries, &aligned, |entry, prediction| {
                    self.score_uic_bb(entry, prediction).map(Some)
                })?,
            },
            Dataset::Short(entries) | Dataset::Complex(entries) => {
                self.score_all(entries, &aligned, |entry, prediction| {
                    let answers: Vec<&str> =
                        entry.ground_truth.iter().map(String::as_str).collect();
                    Ok(Some(self.score_text(prediction, &answers)))
                })?
            }
        };

        let report = CorpusReport::from_entries(task, &entries);
        if report.missing_predictions > 0 {
            tracing::warn!(
                task = %task,
                missing = report.missing_predictions,
                "reference entries without a prediction scored 0"
            );
        }
        if report.skipped > 0 {
            tracing::warn!(
                task = %task,
                skipped = report.skipped,
                "entries with no usable rater excluded from the means"
            );
        }
        tracing::info!(
            task = %task,
            entries = report.entries,
            scored = report.scored,
            score = report.score,
            exact_match = report.exact_match,
            f1 = report.f1,
            "evaluation complete"
        );

        Ok(Evaluation { report, entries })
    }

    fn score_all<T, F>(
        &self,
        entries: &[T],
        aligned: &Aligned<'_>,
        score: F,
    ) -> Result<Vec<EntryScore>, MetricError>
    where
        T: QaRecord + Sync,
        F: Fn(&T, Option<&Prediction>) -> Result<Option<EntryMetrics>, MetricError> + Sync,
    {
        let run = |(index, entry): (usize, &T)| -> Result<EntryScore, MetricError> {
            if self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled) {
                return Err(MetricError::Cancelled);
            }
            let key = entry.key();
            let prediction = aligned.get(&key).copied();
            let metrics = score(entry, prediction)?;
            Ok(EntryScore {
                index,
                key,
                predicted: prediction.is_some(),
                metrics,
            })
        };

        if !self.config.parallel {
            return entries.iter().enumerate().map(run).collect();
        }

        let pool = self.thread_pool()?;
        pool.install(|| entries.par_iter().enumerate().map(run).collect())
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool, MetricError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if self.config.threads > 0 {
            builder = builder.num_threads(self.config.threads);
        }
        builder
            .build()
            .map_err(|error| MetricError::ThreadPool(error.to_string()))
    }

    fn score_text(&self, prediction: Option<&Prediction>, answers: &[&str]) -> EntryMetrics {
        let Some(prediction) = prediction else {
            return EntryMetrics::zero(Task::SqaS);
        };
        let no_answer = self.config.no_answer.as_str();
        let answer = prediction.answer.as_deref().unwrap_or(no_answer);
        score_answer(answer, answers, no_answer)
    }

    fn score_uic_bb(
        &self,
        entry: &QuestionAnswerEntry,
        prediction: Option<&Prediction>,
    ) -> Result<EntryMetrics, MetricError> {
        let reference_bounds = entry
            .ground_truth
            .iter()
            .flat_map(|g| &g.ui_elements)
            .map(|el| el.bounds);
        check_bounds(entry, reference_bounds)?;

        let Some(prediction) = prediction else {
            return Ok(EntryMetrics::zero(Task::SqaUicBb));
        };
        check_bounds(
            entry,
            prediction.ui_elements.iter().filter_map(|el| el.bounds),
        )?;

        let raters = rater_boxes(&entry.ground_truth);
        let predicted = predicted_boxes(&prediction.ui_elements);
        Ok(score_boxes(&predicted, &raters, self.config.iou_threshold))
    }
}

/// `None` when no rater of the entry is usable for SQA-UIC.
fn score_uic(
    entry: &QuestionAnswerEntry,
    prediction: Option<&Prediction>,
) -> Option<EntryMetrics> {
    let raters = rater_index_sets(&entry.ground_truth);
    if raters.is_empty() {
        return None;
    }
    let Some(prediction) = prediction else {
        return Some(EntryMetrics::zero(Task::SqaUic));
    };
    let predicted: BTreeSet<i64> = prediction.vh_indices().collect();
    score_indices(&predicted, &raters)
}

fn check_bounds(
    entry: &QuestionAnswerEntry,
    bounds: impl IntoIterator<Item = Bounds>,
) -> Result<(), MetricError> {
    for b in bounds {
        if let Some(reason) = b.violation() {
            return Err(MetricError::Computation {
                key: entry.key(),
                reason: format!("malformed bounds {:?}: {reason}", b.0),
            });
        }
    }
    Ok(())
}

/// Map each reference key to its prediction. Fails with every prediction key
/// that has no reference, in prediction order. The first prediction for a
/// key wins.
fn align<'p>(
    references: &Dataset,
    predictions: &'p [Prediction],
) -> Result<Aligned<'p>, LookupError> {
    let known: HashSet<EntryKey> = references.keys().into_iter().collect();
    let mut aligned: Aligned<'p> = HashMap::with_capacity(predictions.len());
    let mut unmatched = Vec::new();

    for prediction in predictions {
        let key = prediction.key();
        if known.contains(&key) {
            aligned.entry(key).or_insert(prediction);
        } else {
            unmatched.push(key);
        }
    }

    if unmatched.is_empty() {
        Ok(aligned)
    } else {
        Err(LookupError { unmatched })
    }
}

/// Score with a one-off [`Evaluator`].
///
/// # Errors
///
/// See [`Evaluator::evaluate`].
pub fn evaluate(
    task: Task,
    references: &Dataset,
    predictions: &[Prediction],
    config: &MetricsConfig,
) -> Result<Evaluation, MetricError> {
    Evaluator::new(config.clone()).evaluate(task, references, predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqa_core::ShortAnswerEntry;

    fn short(image_id: &str, answer: &str) -> ShortAnswerEntry {
        ShortAnswerEntry {
            image_id: image_id.into(),
            image_width: None,
            image_height: None,
            question: "q".into(),
            ground_truth: vec![answer.into()],
        }
    }

    fn prediction(image_id: &str, answer: Option<&str>) -> Prediction {
        Prediction {
            image_id: image_id.into(),
            question: "q".into(),
            answer: answer.map(Into::into),
            ui_elements: Vec::new(),
        }
    }

    #[test]
    fn align_reports_every_unmatched_key_in_order() {
        let refs = Dataset::Short(vec![short("1", "a")]);
        let preds = vec![
            prediction("9", None),
            prediction("1", None),
            prediction("5", None),
        ];
        let err = align(&refs, &preds).unwrap_err();
        assert_eq!(
            err.unmatched,
            vec![EntryKey::new("9", "q"), EntryKey::new("5", "q")]
        );
    }

    #[test]
    fn missing_answer_is_scored_as_no_answer() {
        let refs = Dataset::Short(vec![short("1", "<no answer>")]);
        let preds = vec![prediction("1", None)];
        let eval = evaluate(Task::SqaS, &refs, &preds, &MetricsConfig::default()).unwrap();
        assert!((eval.report.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cancelled_flag_stops_the_run() {
        let refs = Dataset::Short(vec![short("1", "a"), short("2", "b")]);
        let flag = CancellationFlag::new();
        flag.cancel();
        let evaluator = Evaluator::new(MetricsConfig::default()).with_cancellation(flag.clone());
        let err = evaluator.evaluate(Task::SqaS, &refs, &[]).unwrap_err();
        assert!(matches!(err, MetricError::Cancelled));
        assert!(flag.is_cancelled());
    }

    #[test]
    fn unsupported_variant_for_uic_on_short_references() {
        let refs = Dataset::Short(vec![short("1", "a")]);
        for task in [Task::SqaUic, Task::SqaUicBb] {
            let err = evaluate(task, &refs, &[], &MetricsConfig::default()).unwrap_err();
            assert!(matches!(err, MetricError::UnsupportedVariant { .. }));
        }
    }
}
