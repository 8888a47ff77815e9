//! File loaders: read, parse, and validate in one step.

use std::path::Path;

use serde_json::Value;
use sqa_core::{Dataset, Prediction, ValidationError, Variant};
use tracing::debug;

use crate::error::LoadError;
use crate::validate::{validate_dataset, validate_predictions};

/// Read and parse a JSON file without validating it.
///
/// # Errors
///
/// Returns `LoadError::Io` if the file cannot be read and `LoadError::Json`
/// if it is not valid JSON.
pub fn read_document(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a dataset file of the given variant.
///
/// # Errors
///
/// Returns `LoadError::Validation` labelled with `path` when any entry is
/// malformed, or the I/O and JSON errors of [`read_document`].
pub fn load_dataset(path: &Path, variant: Variant) -> Result<Dataset, LoadError> {
    let document = read_document(path)?;
    let dataset = validate_dataset(variant, &document).map_err(|e| relabel(e, path))?;
    debug!(
        path = %path.display(),
        %variant,
        entries = dataset.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Load a prediction file.
///
/// # Errors
///
/// See [`load_dataset`].
pub fn load_predictions(path: &Path) -> Result<Vec<Prediction>, LoadError> {
    let document = read_document(path)?;
    let predictions = validate_predictions(&document).map_err(|e| relabel(e, path))?;
    debug!(
        path = %path.display(),
        predictions = predictions.len(),
        "loaded predictions"
    );
    Ok(predictions)
}

fn relabel(mut error: ValidationError, path: &Path) -> ValidationError {
    error.document = path.display().to_string();
    error
}
