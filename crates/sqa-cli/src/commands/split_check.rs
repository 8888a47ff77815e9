use serde::Serialize;
use sqa_config::ScreenQaConfig;
use sqa_core::{Dataset, Variant};
use sqa_schema::{Split, check_split_partition, load_dataset};

use crate::cli::{GlobalFlags, SplitCheckArgs};
use crate::output::output;

#[derive(Debug, Serialize)]
struct SplitRow {
    split: Split,
    file: String,
    entries: usize,
    screenshots: usize,
}

/// Handle `sqa split-check`.
pub fn handle(
    args: &SplitCheckArgs,
    config: &ScreenQaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let variant = args.variant.unwrap_or(config.general.default_variant);
    let rows = check(args, variant)?;
    output(&rows, flags.format)
}

fn check(args: &SplitCheckArgs, variant: Variant) -> anyhow::Result<Vec<SplitRow>> {
    let train = load_dataset(&args.train, variant)?;
    let validation = load_dataset(&args.validation, variant)?;
    let test = load_dataset(&args.test, variant)?;

    check_split_partition(&train, &validation, &test)?;

    let row = |split: Split, path: &std::path::Path, dataset: &Dataset| SplitRow {
        split,
        file: path.display().to_string(),
        entries: dataset.len(),
        screenshots: dataset.screenshots().len(),
    };
    Ok(vec![
        row(Split::Train, &args.train, &train),
        row(Split::Validation, &args.validation, &validation),
        row(Split::Test, &args.test, &test),
    ])
}
