//! Validator resolution.
//!
//! Each publication gets exactly one [`Validator`], decided at construction:
//!
//! 1. an explicit `validate` override wins outright;
//! 2. otherwise a declared schema is compiled once by the configured
//!    [`SchemaFactory`] and checked on every call;
//! 3. otherwise every call is accepted.

#[cfg(feature = "json-schema")]
mod json_schema;
mod schema;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FactoryError;
use crate::publication::PublicationError;

#[cfg(feature = "json-schema")]
pub use json_schema::{JsonSchema, JsonSchemaFactory};
#[cfg(feature = "json-schema")]
pub use jsonschema::Draft;
pub use schema::{Schema, SchemaFactory};

/// Explicit validation override: inspects the raw call arguments.
pub type ValidateFn = Arc<dyn Fn(&[Value]) -> Result<(), PublicationError> + Send + Sync>;

/// The resolved argument validator of one publication.
pub enum Validator {
    Override(ValidateFn),
    Schema(Box<dyn Schema>),
    AcceptAll,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Override(_) => f.write_str("Validator::Override"),
            Validator::Schema(_) => f.write_str("Validator::Schema"),
            Validator::AcceptAll => f.write_str("Validator::AcceptAll"),
        }
    }
}

impl Validator {
    /// Pick the validator for `publication`. The schema factory runs at most once.
    pub(crate) fn resolve(
        publication: &str,
        validate: Option<ValidateFn>,
        schema: Option<&Value>,
        factory: Option<&dyn SchemaFactory>,
    ) -> Result<Self, FactoryError> {
        if let Some(validate) = validate {
            debug!(publication = %publication, "using explicit validate override");
            return Ok(Validator::Override(validate));
        }

        match (schema, factory) {
            (Some(schema), Some(factory)) => {
                let compiled =
                    factory
                        .build(schema)
                        .map_err(|reason| FactoryError::SchemaConstruction {
                            publication: publication.to_string(),
                            reason,
                        })?;
                debug!(publication = %publication, "compiled argument schema");
                Ok(Validator::Schema(compiled))
            }
            (Some(_), None) => {
                warn!(
                    publication = %publication,
                    "schema declared but no schema factory configured; arguments are not validated"
                );
                Ok(Validator::AcceptAll)
            }
            (None, _) => Ok(Validator::AcceptAll),
        }
    }

    /// Check the call arguments.
    ///
    /// Schemas see the first argument (`null` when there is none).
    pub fn validate(&self, args: &[Value]) -> Result<(), PublicationError> {
        match self {
            Validator::Override(validate) => validate(args),
            Validator::Schema(schema) => {
                let document = args.first().unwrap_or(&Value::Null);
                schema
                    .validate(document)
                    .map_err(|messages| PublicationError::Validation(messages.join("; ")))
            }
            Validator::AcceptAll => Ok(()),
        }
    }
}
