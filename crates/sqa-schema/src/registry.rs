//! Central schema registry for the ScreenQA wire records.
//!
//! The `SchemaRegistry` builds one JSON Schema per top-level list element at
//! construction time using [`schemars::schema_for!`]. A dataset file is a
//! JSON array of such elements.

use std::collections::HashMap;

use schemars::schema_for;
use sqa_core::Variant;

use crate::error::SchemaError;

/// Name of the prediction record schema.
pub const PREDICTION_SCHEMA: &str = "prediction";

/// Store of the entry schemas, keyed by name.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (should be
/// infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a registry holding the full, short, complex, and prediction
    /// entry schemas.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on a `schemars`-generated
    /// schema, which `schemars` output never triggers in practice.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        register!(
            schemas,
            Variant::Full.schema_name(),
            sqa_core::QuestionAnswerEntry
        );
        register!(
            schemas,
            Variant::Short.schema_name(),
            sqa_core::ShortAnswerEntry
        );
        register!(
            schemas,
            Variant::Complex.schema_name(),
            sqa_core::ShortAnswerEntry
        );
        register!(schemas, PREDICTION_SCHEMA, sqa_core::Prediction);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Compile a named schema into a reusable validator.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the name is unknown, or
    /// `SchemaError::Generation` if the schema does not compile.
    pub fn validator(&self, name: &str) -> Result<jsonschema::Validator, SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        jsonschema::validator_for(schema).map_err(|e| SchemaError::Generation(format!("{e}")))
    }

    /// Check a single entry against a named schema, returning the rendered
    /// messages (empty when valid).
    ///
    /// # Errors
    ///
    /// See [`Self::validator`].
    pub fn validate(
        &self,
        name: &str,
        instance: &serde_json::Value,
    ) -> Result<Vec<String>, SchemaError> {
        let validator = self.validator(name)?;
        Ok(validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect())
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
