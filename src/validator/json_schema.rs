//! JSON Schema strategy backed by the `jsonschema` crate.

use jsonschema::{Draft, Validator};
use serde_json::Value;

use super::schema::{Schema, SchemaFactory};

/// Compiles publication schemas as JSON Schema documents.
///
/// ```ignore
/// let factory = FactoryConfig::new()
///     .schema_factory(JsonSchemaFactory::new())
///     .registry(registry)
///     .build()?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JsonSchemaFactory {
    draft: Draft,
}

impl Default for JsonSchemaFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSchemaFactory {
    /// Draft 2020-12.
    pub fn new() -> Self {
        Self {
            draft: Draft::Draft202012,
        }
    }

    /// Use a specific draft.
    pub fn with_draft(draft: Draft) -> Self {
        Self { draft }
    }
}

impl SchemaFactory for JsonSchemaFactory {
    fn build(&self, schema: &Value) -> Result<Box<dyn Schema>, String> {
        let validator = jsonschema::options()
            .with_draft(self.draft)
            .build(schema)
            .map_err(|err| format!("invalid schema: {}", err))?;
        Ok(Box::new(JsonSchema { validator }))
    }
}

/// A compiled JSON Schema.
pub struct JsonSchema {
    validator: Validator,
}

impl Schema for JsonSchema {
    fn validate(&self, document: &Value) -> Result<(), Vec<String>> {
        let messages: Vec<String> = self
            .validator
            .iter_errors(document)
            .map(|err| err.to_string())
            .collect();
        if messages.is_empty() {
            Ok(())
        } else {
            Err(messages)
        }
    }
}
