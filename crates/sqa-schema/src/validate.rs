//! Eager document validators.
//!
//! Every validator walks the whole document and returns either all parsed
//! entries or a single `ValidationError` holding every issue found.

use std::collections::HashMap;
use std::sync::LazyLock;

use jsonschema::error::ValidationErrorKind;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqa_core::records::RATER_DRAWN_VH_INDEX;
use sqa_core::{
    Dataset, EntryKey, Prediction, QaRecord, QuestionAnswerEntry, ShortAnswerEntry,
    ValidationError, ValidationIssue, Variant,
};
use tracing::debug;

use crate::registry::{PREDICTION_SCHEMA, SchemaRegistry};

static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::new);

/// Label used until a loader replaces it with the file path.
const DOCUMENT_LABEL: &str = "document";

/// Validate a full ScreenQA document.
///
/// # Errors
///
/// Returns every structural and bounds-ordering issue in the document.
pub fn validate_full_qa(document: &Value) -> Result<Vec<QuestionAnswerEntry>, ValidationError> {
    validate_entries(Variant::Full.schema_name(), document, check_full_entry)
}

/// Validate a ScreenQA-Short document.
///
/// # Errors
///
/// Returns every structural issue in the document.
pub fn validate_short_qa(document: &Value) -> Result<Vec<ShortAnswerEntry>, ValidationError> {
    validate_entries(Variant::Short.schema_name(), document, |_, _, _| {})
}

/// Validate a ComplexQA document. Same shape as ScreenQA-Short; single-answer
/// lists are ordinary lists.
///
/// # Errors
///
/// Returns every structural issue in the document.
pub fn validate_complex_qa(document: &Value) -> Result<Vec<ShortAnswerEntry>, ValidationError> {
    validate_entries(Variant::Complex.schema_name(), document, |_, _, _| {})
}

/// Validate a document of the given variant into a tagged `Dataset`.
///
/// # Errors
///
/// See the per-variant validators.
pub fn validate_dataset(variant: Variant, document: &Value) -> Result<Dataset, ValidationError> {
    match variant {
        Variant::Full => validate_full_qa(document).map(Dataset::Full),
        Variant::Short => validate_short_qa(document).map(Dataset::Short),
        Variant::Complex => validate_complex_qa(document).map(Dataset::Complex),
    }
}

/// Validate a prediction document. Besides the structural and bounds checks,
/// each `(image_id, question)` pair may appear only once.
///
/// # Errors
///
/// Returns every issue in the document, including each duplicate key.
pub fn validate_predictions(document: &Value) -> Result<Vec<Prediction>, ValidationError> {
    let mut first_seen: HashMap<EntryKey, usize> = HashMap::new();

    validate_entries(
        PREDICTION_SCHEMA,
        document,
        |index, prediction: &Prediction, issues| {
            for (e, element) in prediction.ui_elements.iter().enumerate() {
                if let Some(bounds) = element.bounds {
                    if let Some(message) = bounds.violation() {
                        issues.push(ValidationIssue::at_entry(
                            index,
                            format!("/ui_elements/{e}/bounds"),
                            message,
                        ));
                    }
                }
                if element.vh_index.is_some_and(|idx| idx < RATER_DRAWN_VH_INDEX) {
                    issues.push(ValidationIssue::at_entry(
                        index,
                        format!("/ui_elements/{e}/vh_index"),
                        "vh_index must be -1 or non-negative",
                    ));
                }
            }

            if let Some(first) = first_seen.get(&prediction.key()) {
                issues.push(ValidationIssue::at_entry(
                    index,
                    "",
                    format!(
                        "duplicate prediction for {} (first at entry {first})",
                        prediction.key()
                    ),
                ));
            } else {
                first_seen.insert(prediction.key(), index);
            }
        },
    )
}

fn check_full_entry(index: usize, entry: &QuestionAnswerEntry, issues: &mut Vec<ValidationIssue>) {
    for (g, annotation) in entry.ground_truth.iter().enumerate() {
        for (e, element) in annotation.ui_elements.iter().enumerate() {
            if let Some(message) = element.bounds.violation() {
                issues.push(ValidationIssue::at_entry(
                    index,
                    format!("/ground_truth/{g}/ui_elements/{e}/bounds"),
                    message,
                ));
            }
            if element.vh_index < RATER_DRAWN_VH_INDEX {
                issues.push(ValidationIssue::at_entry(
                    index,
                    format!("/ground_truth/{g}/ui_elements/{e}/vh_index"),
                    format!(
                        "vh_index {} must be -1 or non-negative",
                        element.vh_index
                    ),
                ));
            }
        }
    }
}

fn validate_entries<T, F>(
    schema_name: &str,
    document: &Value,
    mut check: F,
) -> Result<Vec<T>, ValidationError>
where
    T: DeserializeOwned,
    F: FnMut(usize, &T, &mut Vec<ValidationIssue>),
{
    let Some(items) = document.as_array() else {
        return Err(ValidationError::new(
            DOCUMENT_LABEL,
            vec![ValidationIssue::document(format!(
                "expected a top-level array, found {}",
                json_type(document)
            ))],
        ));
    };

    let validator = REGISTRY.validator(schema_name).map_err(|e| {
        ValidationError::new(DOCUMENT_LABEL, vec![ValidationIssue::document(e.to_string())])
    })?;

    let mut issues = Vec::new();
    let mut entries = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let before = issues.len();
        issues.extend(
            validator
                .iter_errors(item)
                .map(|error| structural_issue(index, &error)),
        );
        if issues.len() > before {
            continue;
        }

        match T::deserialize(item) {
            Ok(entry) => {
                check(index, &entry, &mut issues);
                entries.push(entry);
            }
            Err(error) => issues.push(ValidationIssue::at_entry(index, "", error.to_string())),
        }
    }

    debug!(
        schema = schema_name,
        entries = items.len(),
        issues = issues.len(),
        "validated document"
    );

    ValidationError::check(DOCUMENT_LABEL, issues, entries)
}

/// Convert a `jsonschema` error into an issue. Missing-property errors point
/// at the parent object, so the property name is appended to the path.
fn structural_issue(index: usize, error: &jsonschema::ValidationError<'_>) -> ValidationIssue {
    let mut path = error.instance_path.to_string();
    if let ValidationErrorKind::Required { property } = &error.kind {
        if let Some(name) = property.as_str() {
            path.push('/');
            path.push_str(name);
        }
    }
    ValidationIssue::at_entry(index, path, error.to_string())
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
