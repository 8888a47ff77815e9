use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use sqa_config::ScreenQaConfig;
use sqa_core::Variant;
use sqa_schema::{PREDICTION_SCHEMA, load_dataset, load_predictions};

use crate::cli::{GlobalFlags, ValidateArgs};
use crate::output::output;

#[derive(Debug, Serialize)]
struct ValidateSummary {
    file: String,
    schema: &'static str,
    entries: usize,
    screenshots: usize,
    valid: bool,
}

/// Handle `sqa validate`.
pub fn handle(
    args: &ValidateArgs,
    config: &ScreenQaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let summary = if args.predictions {
        summarize_predictions(&args.file)?
    } else {
        let variant = args.variant.unwrap_or(config.general.default_variant);
        summarize_dataset(&args.file, variant)?
    };
    output(&summary, flags.format)
}

fn summarize_dataset(path: &Path, variant: Variant) -> anyhow::Result<ValidateSummary> {
    let dataset = load_dataset(path, variant)?;
    Ok(ValidateSummary {
        file: path.display().to_string(),
        schema: variant.schema_name(),
        entries: dataset.len(),
        screenshots: dataset.screenshots().len(),
        valid: true,
    })
}

fn summarize_predictions(path: &Path) -> anyhow::Result<ValidateSummary> {
    let predictions = load_predictions(path)?;
    let screenshots = predictions
        .iter()
        .map(|p| p.image_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    Ok(ValidateSummary {
        file: path.display().to_string(),
        schema: PREDICTION_SCHEMA,
        entries: predictions.len(),
        screenshots,
        valid: true,
    })
}
