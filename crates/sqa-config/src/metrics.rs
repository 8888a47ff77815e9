//! Metric computation settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// IoU threshold used for the published SQA-UIC-BB numbers.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.1;

/// Sentinel answer meaning "the screenshot does not answer the question".
pub const DEFAULT_NO_ANSWER: &str = "<no answer>";

const fn default_iou_threshold() -> f64 {
    DEFAULT_IOU_THRESHOLD
}

fn default_no_answer() -> String {
    DEFAULT_NO_ANSWER.to_string()
}

const fn default_parallel() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Minimum intersection-over-union for two boxes to count as a match.
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,

    /// Answer string treated as the no-answer sentinel by SQA-S.
    #[serde(default = "default_no_answer")]
    pub no_answer: String,

    /// Score entries on a worker pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Worker count when `parallel` is set. `0` lets rayon decide.
    #[serde(default)]
    pub threads: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            iou_threshold: default_iou_threshold(),
            no_answer: default_no_answer(),
            parallel: default_parallel(),
            threads: 0,
        }
    }
}

impl MetricsConfig {
    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a threshold outside `[0, 1]`
    /// (or NaN) and for an empty no-answer sentinel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "metrics.iou_threshold".into(),
                reason: format!("{} is outside [0, 1]", self.iou_threshold),
            });
        }
        if self.no_answer.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "metrics.no_answer".into(),
                reason: "sentinel must not be empty".into(),
            });
        }
        Ok(())
    }
}
