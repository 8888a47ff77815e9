use std::path::PathBuf;

use clap::{Args, Subcommand};
use sqa_core::{Task, Variant};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate a dataset or prediction file.
    Validate(ValidateArgs),
    /// Check that train, validation and test splits share no screenshot.
    SplitCheck(SplitCheckArgs),
    /// Score a prediction file against a reference dataset.
    Score(ScoreArgs),
    /// Print a registered JSON Schema.
    Schema(SchemaArgs),
}

/// Arguments for `sqa validate`.
#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    pub file: PathBuf,

    /// Dataset variant: full, short, complex (defaults to config)
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Validate as a prediction file instead of a dataset
    #[arg(long, conflicts_with = "variant")]
    pub predictions: bool,
}

/// Arguments for `sqa split-check`.
#[derive(Clone, Debug, Args)]
pub struct SplitCheckArgs {
    #[arg(long)]
    pub train: PathBuf,

    #[arg(long)]
    pub validation: PathBuf,

    #[arg(long)]
    pub test: PathBuf,

    /// Dataset variant: full, short, complex (defaults to config)
    #[arg(long)]
    pub variant: Option<Variant>,
}

/// Arguments for `sqa score`.
#[derive(Clone, Debug, Args)]
pub struct ScoreArgs {
    #[arg(long)]
    pub references: PathBuf,

    #[arg(long)]
    pub predictions: PathBuf,

    /// Task: sqa-s, sqa-uic, sqa-uic-bb (defaults to config)
    #[arg(long)]
    pub task: Option<Task>,

    /// Reference variant: full, short, complex (defaults to config)
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Minimum IoU for a box match (SQA-UIC-BB)
    #[arg(long)]
    pub iou_threshold: Option<f64>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Score on the calling thread only
    #[arg(long)]
    pub sequential: bool,

    /// Include per-entry scores
    #[arg(long)]
    pub per_entry: bool,
}

/// Arguments for `sqa schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name (see --list)
    #[arg(required_unless_present = "list", conflicts_with = "list")]
    pub name: Option<String>,

    /// List registered schema names
    #[arg(long)]
    pub list: bool,
}
