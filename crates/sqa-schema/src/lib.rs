//! # sqa-schema
//!
//! Schema & Validator layer for the ScreenQA dataset files.
//!
//! This crate provides:
//! - `SchemaRegistry`: JSON Schemas for every wire record, generated from the
//!   `sqa-core` types with `schemars`
//! - Eager validators (`validate_full_qa`, `validate_short_qa`,
//!   `validate_complex_qa`, `validate_predictions`) that collect every issue
//!   in a document before failing
//! - `check_split_partition` for the train/validation/test disjointness check
//! - File loaders that combine reading, parsing, and validation
//!
//! ## Architecture
//!
//! Validation runs in two passes per entry. The structural pass checks the
//! entry against its registered schema with `jsonschema`. Entries that pass
//! are deserialized and checked for invariants JSON Schema cannot express
//! (bounds ordering, duplicate prediction keys).

mod error;
mod loader;
mod registry;
mod split;
mod validate;

pub use error::{LoadError, SchemaError};
pub use loader::{load_dataset, load_predictions, read_document};
pub use registry::{PREDICTION_SCHEMA, SchemaRegistry};
pub use split::{Split, check_split_partition};
pub use validate::{
    validate_complex_qa, validate_dataset, validate_full_qa, validate_predictions,
    validate_short_qa,
};
