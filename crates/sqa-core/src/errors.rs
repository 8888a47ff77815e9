//! Cross-cutting error types for the ScreenQA toolkit.
//!
//! Crate-specific errors (`LoadError`, `MetricError`, `ConfigError`) live in
//! their own crates and wrap these where needed. The CLI converges all of
//! them into `anyhow::Error`.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::dataset::EntryKey;

/// One problem found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Position of the offending entry in the top-level list. `None` when the
    /// problem concerns the document as a whole.
    pub index: Option<usize>,

    /// JSON pointer to the offending field, relative to the entry.
    pub path: String,

    pub message: String,
}

impl ValidationIssue {
    #[must_use]
    pub fn at_entry(index: usize, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            path: path.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn document(message: impl Into<String>) -> Self {
        Self {
            index: None,
            path: String::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        match self.index {
            Some(index) => write!(f, "entry {index} at {path}: {}", self.message),
            None => write!(f, "document at {path}: {}", self.message),
        }
    }
}

/// A malformed document. Carries every issue found, never just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{document}: {} validation issue(s){}", .issues.len(), render_issues(.issues))]
pub struct ValidationError {
    /// Label of the validated document (file path, split name, ...).
    pub document: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    #[must_use]
    pub fn new(document: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        Self {
            document: document.into(),
            issues,
        }
    }

    /// Return `Ok(value)` when no issues were collected.
    ///
    /// # Errors
    ///
    /// Returns the accumulated `ValidationError` if `issues` is non-empty.
    pub fn check<T>(
        document: impl Into<String>,
        issues: Vec<ValidationIssue>,
        value: T,
    ) -> Result<T, Self> {
        if issues.is_empty() {
            Ok(value)
        } else {
            Err(Self::new(document, issues))
        }
    }

    /// Indices of all entries that have at least one issue, ascending.
    #[must_use]
    pub fn entry_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.issues.iter().filter_map(|i| i.index).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().fold(String::new(), |mut out, issue| {
        out.push_str("\n  - ");
        out.push_str(&issue.to_string());
        out
    })
}

/// Predictions that do not correspond to any reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} prediction(s) have no matching reference entry: {}", .unmatched.len(), render_keys(.unmatched))]
pub struct LookupError {
    pub unmatched: Vec<EntryKey>,
}

fn render_keys(keys: &[EntryKey]) -> String {
    const SHOWN: usize = 5;
    let mut rendered = keys
        .iter()
        .take(SHOWN)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if keys.len() > SHOWN {
        rendered.push_str(&format!("; ... and {} more", keys.len() - SHOWN));
    }
    rendered
}

/// Unrecognized variant or task name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
