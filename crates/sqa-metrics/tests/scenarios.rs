//! End-to-end scoring of validated documents.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use sqa_config::MetricsConfig;
use sqa_core::{
    Bounds, Dataset, EntryKey, GroundTruthAnnotation, Prediction, QuestionAnswerEntry, Task,
    UiElementRef, Variant,
};
use sqa_metrics::{Evaluator, MetricError, evaluate};
use sqa_schema::{validate_dataset, validate_predictions};

fn references(variant: Variant, document: &Value) -> Dataset {
    validate_dataset(variant, document).expect("reference document should validate")
}

fn predictions(document: &Value) -> Vec<Prediction> {
    validate_predictions(document).expect("prediction document should validate")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

fn full_entry(image_id: &str, question: &str, raters: Value) -> Value {
    json!({
        "image_id": image_id,
        "question": question,
        "ground_truth": raters,
    })
}

#[test]
fn matching_short_answer_scores_one() {
    let refs = references(
        Variant::Full,
        &json!([full_entry(
            "1",
            "Is wifi on?",
            json!([{"full_answer": "yes", "ui_elements": []}])
        )]),
    );
    let preds = predictions(&json!([
        {"image_id": "1", "question": "Is wifi on?", "answer": "yes"}
    ]));

    let eval = evaluate(Task::SqaS, &refs, &preds, &MetricsConfig::default()).unwrap();
    assert!(close(eval.report.score, 1.0));
    assert!(close(eval.report.exact_match, 1.0));
    assert_eq!(eval.report.scored, 1);
}

#[test]
fn short_variant_uses_answer_list() {
    let refs = references(
        Variant::Short,
        &json!([{
            "image_id": "7",
            "question": "Which tab?",
            "ground_truth": ["Settings", "the settings tab"]
        }]),
    );
    let preds = predictions(&json!([
        {"image_id": "7", "question": "Which tab?", "answer": "Settings tab"}
    ]));

    let eval = evaluate(Task::SqaS, &refs, &preds, &MetricsConfig::default()).unwrap();
    assert!(close(eval.report.exact_match, 1.0));
}

#[test]
fn superset_of_indices_scores_point_eight() {
    let refs = references(
        Variant::Full,
        &json!([full_entry(
            "1",
            "q",
            json!([{"full_answer": "a", "ui_elements": [
                {"text": "x", "bounds": [0, 0, 10, 10], "vh_index": 3},
                {"text": "y", "bounds": [0, 20, 10, 30], "vh_index": 7}
            ]}])
        )]),
    );
    let preds = predictions(&json!([
        {"image_id": "1", "question": "q", "ui_elements": [
            {"vh_index": 3}, {"vh_index": 7}, {"vh_index": 9}
        ]}
    ]));

    let eval = evaluate(Task::SqaUic, &refs, &preds, &MetricsConfig::default()).unwrap();
    assert!(close(eval.report.f1, 0.8));
    assert!(close(eval.report.exact_match, 0.0));
}

#[test]
fn drawn_elements_count_for_boxes_but_not_indices() {
    let refs = references(
        Variant::Full,
        &json!([full_entry(
            "1",
            "q",
            json!([{"full_answer": "a", "ui_elements": [
                {"text": "Wi-Fi", "bounds": [0, 0, 100, 50], "vh_index": 5},
                {"text": "On", "bounds": [200, 0, 300, 50], "vh_index": -1}
            ]}])
        )]),
    );
    let both = predictions(&json!([
        {"image_id": "1", "question": "q", "ui_elements": [
            {"text": "Wi-Fi", "bounds": [0, 0, 100, 50], "vh_index": 5},
            {"text": "On", "bounds": [200, 0, 300, 50]}
        ]}
    ]));
    let first_only = predictions(&json!([
        {"image_id": "1", "question": "q", "ui_elements": [
            {"text": "Wi-Fi", "bounds": [0, 0, 100, 50], "vh_index": 5}
        ]}
    ]));
    let config = MetricsConfig::default();

    let uic = evaluate(Task::SqaUic, &refs, &first_only, &config).unwrap();
    assert!(close(uic.report.f1, 1.0));
    assert!(close(uic.report.exact_match, 1.0));

    let bb = evaluate(Task::SqaUicBb, &refs, &both, &config).unwrap();
    assert_eq!(bb.report.bbox_f1, Some(1.0));
    assert!(close(bb.report.exact_match, 1.0));

    let bb = evaluate(Task::SqaUicBb, &refs, &first_only, &config).unwrap();
    assert!(close(bb.report.score, 2.0 / 3.0));
}

#[test]
fn entry_with_only_drawn_raters_is_skipped_for_indices() {
    let refs = references(
        Variant::Full,
        &json!([
            full_entry(
                "1",
                "q",
                json!([{"full_answer": "a", "ui_elements": [
                    {"text": "x", "bounds": [0, 0, 10, 10], "vh_index": -1}
                ]}])
            ),
            full_entry(
                "2",
                "q",
                json!([{"full_answer": "a", "ui_elements": [
                    {"text": "x", "bounds": [0, 0, 10, 10], "vh_index": 4}
                ]}])
            ),
        ]),
    );
    let preds = predictions(&json!([
        {"image_id": "1", "question": "q", "ui_elements": [{"vh_index": 8}]},
        {"image_id": "2", "question": "q", "ui_elements": [{"vh_index": 4}]}
    ]));

    let eval = evaluate(Task::SqaUic, &refs, &preds, &MetricsConfig::default()).unwrap();
    assert_eq!(eval.report.skipped, 1);
    assert_eq!(eval.report.scored, 1);
    assert!(close(eval.report.f1, 1.0));
    assert_eq!(eval.entries[0].metrics, None);
}

#[test]
fn missing_prediction_scores_zero_and_counts() {
    let refs = references(
        Variant::Short,
        &json!([
            {"image_id": "1", "question": "q", "ground_truth": ["red"]},
            {"image_id": "2", "question": "q", "ground_truth": ["blue"]}
        ]),
    );
    let preds = predictions(&json!([
        {"image_id": "1", "question": "q", "answer": "red"}
    ]));

    let eval = evaluate(Task::SqaS, &refs, &preds, &MetricsConfig::default()).unwrap();
    assert_eq!(eval.report.missing_predictions, 1);
    assert_eq!(eval.report.matched_predictions, 1);
    assert!(close(eval.report.score, 0.5));
    assert!(!eval.entries[1].predicted);
    assert!(close(eval.entries[1].metrics.unwrap().f1, 0.0));
}

#[test]
fn prediction_without_reference_is_a_lookup_error() {
    let refs = references(
        Variant::Short,
        &json!([{"image_id": "1", "question": "q", "ground_truth": ["red"]}]),
    );
    let preds = predictions(&json!([
        {"image_id": "1", "question": "q", "answer": "red"},
        {"image_id": "1", "question": "other", "answer": "red"}
    ]));

    let err = evaluate(Task::SqaS, &refs, &preds, &MetricsConfig::default()).unwrap_err();
    match err {
        MetricError::Lookup(lookup) => {
            assert_eq!(lookup.unmatched, vec![EntryKey::new("1", "other")]);
        }
        other => panic!("expected lookup error, got {other:?}"),
    }
}

#[test]
fn complex_references_reject_element_tasks() {
    let refs = references(
        Variant::Complex,
        &json!([{"image_id": "1", "question": "q", "ground_truth": ["a"]}]),
    );
    let err = evaluate(Task::SqaUicBb, &refs, &[], &MetricsConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        MetricError::UnsupportedVariant {
            task: Task::SqaUicBb,
            variant: Variant::Complex
        }
    ));
}

#[test]
fn malformed_bounds_reaching_the_engine_is_a_computation_error() {
    // Built directly, bypassing validation.
    let refs = Dataset::Full(vec![QuestionAnswerEntry {
        image_id: "1".into(),
        image_width: None,
        image_height: None,
        question: "q".into(),
        ground_truth: vec![GroundTruthAnnotation {
            full_answer: "a".into(),
            ui_elements: vec![UiElementRef {
                text: "x".into(),
                bounds: Bounds::new(50, 0, 10, 10),
                vh_index: 0,
            }],
        }],
    }]);

    let err = evaluate(Task::SqaUicBb, &refs, &[], &MetricsConfig::default()).unwrap_err();
    assert!(matches!(err, MetricError::Computation { .. }));
    assert!(err.to_string().contains("image_id=1"));
}

#[test]
fn huge_validated_boxes_score_without_overflow() {
    let side: i64 = 1 << 32;
    let refs = references(
        Variant::Full,
        &json!([full_entry(
            "1",
            "q",
            json!([{"full_answer": "a", "ui_elements": [
                {"text": "x", "bounds": [0, 0, side, side], "vh_index": 0}
            ]}])
        )]),
    );
    let preds = predictions(&json!([
        {"image_id": "1", "question": "q", "ui_elements": [
            {"text": "x", "bounds": [0, 0, side, side / 2]}
        ]}
    ]));

    let eval = evaluate(Task::SqaUicBb, &refs, &preds, &MetricsConfig::default()).unwrap();
    assert!(close(eval.report.score, 1.0));
    assert!(close(eval.report.f1, 1.0));
}

fn corpus(size: usize) -> (Dataset, Vec<Prediction>) {
    let entries: Vec<Value> = (0..size)
        .map(|i| {
            full_entry(
                &i.to_string(),
                "q",
                json!([
                    {"full_answer": format!("answer {i}"), "ui_elements": [
                        {"text": "a", "bounds": [0, 0, 100, 100], "vh_index": i},
                        {"text": "b", "bounds": [100, 0, 200, 100], "vh_index": i + 1}
                    ]},
                    {"full_answer": "<no answer>", "ui_elements": []}
                ]),
            )
        })
        .collect();
    let preds: Vec<Value> = (0..size)
        .filter(|i| i % 7 != 0)
        .map(|i| {
            let shift = i64::try_from(i % 60).unwrap();
            let answer = if i % 3 == 0 {
                "answer".to_string()
            } else {
                format!("answer {i}")
            };
            json!({
                "image_id": i.to_string(),
                "question": "q",
                "answer": answer,
                "ui_elements": [
                    {"text": "a", "bounds": [shift, 0, 100 + shift, 100], "vh_index": i},
                    {"text": "c", "bounds": [100, 0, 200, 100], "vh_index": i + 2}
                ]
            })
        })
        .collect();
    (
        references(Variant::Full, &Value::Array(entries)),
        predictions(&Value::Array(preds)),
    )
}

#[rstest]
#[case(Task::SqaS, 1)]
#[case(Task::SqaS, 4)]
#[case(Task::SqaUic, 3)]
#[case(Task::SqaUicBb, 1)]
#[case(Task::SqaUicBb, 8)]
fn parallel_and_sequential_runs_agree(#[case] task: Task, #[case] threads: usize) {
    let (refs, preds) = corpus(200);

    let sequential = MetricsConfig {
        parallel: false,
        ..MetricsConfig::default()
    };
    let parallel = MetricsConfig {
        parallel: true,
        threads,
        ..MetricsConfig::default()
    };

    let a = Evaluator::new(sequential).evaluate(task, &refs, &preds).unwrap();
    let b = Evaluator::new(parallel).evaluate(task, &refs, &preds).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.report.score.to_bits(), b.report.score.to_bits());
}

#[test]
fn iou_threshold_is_configurable() {
    let refs = references(
        Variant::Full,
        &json!([full_entry(
            "1",
            "q",
            json!([{"full_answer": "a", "ui_elements": [
                {"text": "x", "bounds": [0, 0, 100, 100], "vh_index": 0}
            ]}])
        )]),
    );
    // IoU = 1/3
    let preds = predictions(&json!([
        {"image_id": "1", "question": "q", "ui_elements": [
            {"text": "x", "bounds": [50, 0, 150, 100]}
        ]}
    ]));

    let loose = evaluate(Task::SqaUicBb, &refs, &preds, &MetricsConfig::default()).unwrap();
    assert!(close(loose.report.score, 1.0));

    let strict = MetricsConfig {
        iou_threshold: 0.5,
        ..MetricsConfig::default()
    };
    let strict = evaluate(Task::SqaUicBb, &refs, &preds, &strict).unwrap();
    assert!(close(strict.report.score, 0.0));
}
