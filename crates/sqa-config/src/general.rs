//! General application configuration.

use serde::{Deserialize, Serialize};
use sqa_core::{Task, Variant};

const fn default_variant() -> Variant {
    Variant::Full
}

const fn default_task() -> Task {
    Task::SqaS
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Dataset variant assumed when a command is not given `--variant`.
    #[serde(default = "default_variant")]
    pub default_variant: Variant,

    /// Task scored when `sqa score` is not given `--task`.
    #[serde(default = "default_task")]
    pub default_task: Task,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_variant: default_variant(),
            default_task: default_task(),
        }
    }
}
