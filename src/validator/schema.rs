//! Schema-construction strategy seam.

use serde_json::Value;

/// A compiled schema that checks one document.
pub trait Schema: Send + Sync {
    /// Validate `document`, returning every violation message on failure.
    fn validate(&self, document: &Value) -> Result<(), Vec<String>>;
}

impl<F> Schema for F
where
    F: Fn(&Value) -> Result<(), Vec<String>> + Send + Sync,
{
    fn validate(&self, document: &Value) -> Result<(), Vec<String>> {
        self(document)
    }
}

/// Builds a [`Schema`] from a schema description.
///
/// Invoked once per publication, at construction time.
pub trait SchemaFactory: Send + Sync {
    fn build(&self, schema: &Value) -> Result<Box<dyn Schema>, String>;
}

impl<F> SchemaFactory for F
where
    F: Fn(&Value) -> Result<Box<dyn Schema>, String> + Send + Sync,
{
    fn build(&self, schema: &Value) -> Result<Box<dyn Schema>, String> {
        self(schema)
    }
}
