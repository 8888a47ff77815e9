//! # sqa-config
//!
//! Layered configuration loading for the ScreenQA toolkit using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SCREENQA_*` prefix, `__` as separator)
//! 2. Project-level `.screenqa/config.toml`
//! 3. User-level `~/.config/screenqa/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SCREENQA_METRICS__IOU_THRESHOLD` -> `metrics.iou_threshold`,
//! `SCREENQA_GENERAL__DEFAULT_TASK` -> `general.default_task`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sqa_config::ScreenQaConfig;
//!
//! let config = ScreenQaConfig::load_with_dotenv().expect("config");
//! println!("IoU threshold: {}", config.metrics.iou_threshold);
//! ```

mod error;
mod general;
mod metrics;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use metrics::{DEFAULT_IOU_THRESHOLD, DEFAULT_NO_ANSWER, MetricsConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".screenqa/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScreenQaConfig {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl ScreenQaConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse or extract,
    /// and `ConfigError::InvalidValue` if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load with an extra TOML file layered above the discovered files but
    /// below environment variables (the CLI's `--config` flag).
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_file(path: &Path) -> Result<Self, ConfigError> {
        let figment = Self::file_layers()
            .merge(Toml::file(path))
            .merge(Self::env_layer());
        Self::from_figment(figment)
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.metrics.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::file_layers().merge(Self::env_layer())
    }

    fn file_layers() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    fn env_layer() -> Env {
        Env::prefixed("SCREENQA_").split("__")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("screenqa").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqa_core::{Task, Variant};

    #[test]
    fn default_config_loads() {
        let config = ScreenQaConfig::default();
        assert!(config.metrics.parallel);
        assert_eq!(config.general.default_variant, Variant::Full);
        assert_eq!(config.general.default_task, Task::SqaS);
    }

    #[test]
    fn figment_builds_without_files() {
        let config = ScreenQaConfig::from_figment(Figment::from(Serialized::defaults(
            ScreenQaConfig::default(),
        )))
        .expect("should extract defaults");
        assert!((config.metrics.iou_threshold - DEFAULT_IOU_THRESHOLD).abs() < f64::EPSILON);
        assert_eq!(config.metrics.no_answer, DEFAULT_NO_ANSWER);
    }
}
