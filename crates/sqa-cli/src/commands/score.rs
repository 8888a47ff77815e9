use anyhow::Context;
use serde::Serialize;
use sqa_config::{MetricsConfig, ScreenQaConfig};
use sqa_metrics::{CorpusReport, EntryScore, Evaluation, Evaluator};
use sqa_schema::{load_dataset, load_predictions};

use crate::cli::{GlobalFlags, OutputFormat, ScoreArgs};
use crate::output::{format_score, output, table};

#[derive(Debug, Serialize)]
struct ScoreOutput<'a> {
    report: &'a CorpusReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    entries: Option<&'a [EntryScore]>,
}

/// Handle `sqa score`.
pub fn handle(
    args: &ScoreArgs,
    config: &ScreenQaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let task = args.task.unwrap_or(config.general.default_task);
    let variant = args.variant.unwrap_or(config.general.default_variant);
    let metrics = metrics_config(args, &config.metrics)?;

    let references = load_dataset(&args.references, variant)?;
    let predictions = load_predictions(&args.predictions)?;

    let evaluation = Evaluator::new(metrics)
        .evaluate(task, &references, &predictions)
        .with_context(|| {
            format!(
                "failed to score {} against {}",
                args.predictions.display(),
                args.references.display()
            )
        })?;

    match flags.format {
        OutputFormat::Table => {
            println!("{}", render_tables(&evaluation, args.per_entry));
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output(
            &ScoreOutput {
                report: &evaluation.report,
                entries: args.per_entry.then_some(evaluation.entries.as_slice()),
            },
            flags.format,
        ),
    }
}

/// Config values overridden by command-line flags, re-validated.
fn metrics_config(args: &ScoreArgs, base: &MetricsConfig) -> anyhow::Result<MetricsConfig> {
    let mut metrics = base.clone();
    if let Some(threshold) = args.iou_threshold {
        metrics.iou_threshold = threshold;
    }
    if let Some(threads) = args.threads {
        metrics.threads = threads;
    }
    if args.sequential {
        metrics.parallel = false;
    }
    metrics.validate().context("invalid metric settings")?;
    Ok(metrics)
}

fn render_tables(evaluation: &Evaluation, per_entry: bool) -> String {
    let summary = table(&["metric", "value"], &report_rows(&evaluation.report));
    if !per_entry {
        return summary;
    }
    let entries = table(
        &["index", "image_id", "question", "predicted", "exact_match", "f1", "bbox_f1"],
        &entry_rows(&evaluation.entries),
    );
    format!("{summary}\n\n{entries}")
}

/// Report rows with the primary score first.
fn report_rows(report: &CorpusReport) -> Vec<Vec<String>> {
    let mut rows = vec![
        vec!["score".to_string(), format_score(report.score)],
        vec!["task".to_string(), report.task.to_string()],
        vec!["exact_match".to_string(), format_score(report.exact_match)],
        vec!["f1".to_string(), format_score(report.f1)],
    ];
    if let Some(bbox_f1) = report.bbox_f1 {
        rows.push(vec!["bbox_f1".to_string(), format_score(bbox_f1)]);
    }
    for (name, count) in [
        ("entries", report.entries),
        ("scored", report.scored),
        ("matched_predictions", report.matched_predictions),
        ("missing_predictions", report.missing_predictions),
        ("skipped", report.skipped),
    ] {
        rows.push(vec![name.to_string(), count.to_string()]);
    }
    rows
}

fn entry_rows(entries: &[EntryScore]) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            let (exact_match, f1, bbox_f1) = entry.metrics.map_or_else(
                || ("skipped".to_string(), "-".to_string(), "-".to_string()),
                |m| {
                    (
                        format_score(m.exact_match),
                        format_score(m.f1),
                        m.bbox_f1.map_or_else(|| "-".to_string(), format_score),
                    )
                },
            );
            vec![
                entry.index.to_string(),
                entry.key.image_id.clone(),
                entry.key.question.clone(),
                entry.predicted.to_string(),
                exact_match,
                f1,
                bbox_f1,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use sqa_core::{EntryKey, Task};
    use sqa_metrics::EntryMetrics;

    use super::*;

    fn args() -> ScoreArgs {
        ScoreArgs {
            references: PathBuf::from("refs.json"),
            predictions: PathBuf::from("preds.json"),
            task: None,
            variant: None,
            iou_threshold: None,
            threads: None,
            sequential: false,
            per_entry: false,
        }
    }

    #[test]
    fn flags_override_config() {
        let args = ScoreArgs {
            iou_threshold: Some(0.5),
            threads: Some(2),
            sequential: true,
            ..args()
        };
        let metrics = metrics_config(&args, &MetricsConfig::default()).unwrap();
        assert!((metrics.iou_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(metrics.threads, 2);
        assert!(!metrics.parallel);
    }

    #[test]
    fn out_of_range_threshold_flag_is_rejected() {
        let args = ScoreArgs {
            iou_threshold: Some(1.5),
            ..args()
        };
        let error = metrics_config(&args, &MetricsConfig::default()).unwrap_err();
        assert!(format!("{error:#}").contains("metrics.iou_threshold"));
    }

    fn evaluation(task: Task, metrics: Option<EntryMetrics>) -> Evaluation {
        let entries = vec![EntryScore {
            index: 0,
            key: EntryKey::new("42", "Which tab?"),
            predicted: true,
            metrics,
        }];
        Evaluation {
            report: CorpusReport::from_entries(task, &entries),
            entries,
        }
    }

    #[test]
    fn primary_score_is_the_first_row() {
        let eval = evaluation(
            Task::SqaUicBb,
            Some(EntryMetrics {
                exact_match: 0.0,
                f1: 0.5,
                bbox_f1: Some(0.75),
            }),
        );
        let rows = report_rows(&eval.report);
        assert_eq!(rows[0], vec!["score".to_string(), "0.7500".to_string()]);
        assert!(rows.iter().any(|row| row[0] == "bbox_f1"));
    }

    #[test]
    fn skipped_entries_render_as_skipped() {
        let eval = evaluation(Task::SqaUic, None);
        let rows = entry_rows(&eval.entries);
        assert_eq!(rows[0][1], "42");
        assert_eq!(rows[0][4], "skipped");
        assert_eq!(rows[0][6], "-");
    }

    #[test]
    fn json_output_omits_entries_unless_requested() {
        let eval = evaluation(Task::SqaS, Some(EntryMetrics::zero(Task::SqaS)));
        let value = serde_json::to_value(ScoreOutput {
            report: &eval.report,
            entries: None,
        })
        .unwrap();
        assert!(value.get("entries").is_none());
        assert_eq!(value["report"]["task"], "sqa-s");
    }
}
