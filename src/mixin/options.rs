//! The options mapping mixins operate on.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::publication::{Invocation, Produced, PublicationError, RunFn};
use crate::registry::Registry;
use crate::validator::ValidateFn;

/// Merged publication options, threaded through the mixin pipeline.
///
/// Holds `name`, `validate`, `run`, the endpoint's mixin labels and the
/// registry override, plus every extra field from the publication spec.
/// `fields` must remain a JSON object after each mixin.
#[derive(Clone)]
pub struct PublicationOptions {
    pub name: String,
    pub validate: Option<ValidateFn>,
    pub run: RunFn,
    /// Labels of the endpoint-level mixins, in declaration order.
    pub mixins: Vec<Option<String>>,
    pub registry: Option<Arc<dyn Registry>>,
    /// Opaque extra fields, consumed only by mixins.
    pub fields: Value,
}

impl fmt::Debug for PublicationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicationOptions")
            .field("name", &self.name)
            .field("validate", &self.validate.is_some())
            .field("mixins", &self.mixins)
            .field("registry", &self.registry.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}

impl PublicationOptions {
    pub fn new(name: impl Into<String>, run: RunFn) -> Self {
        Self {
            name: name.into(),
            validate: None,
            run,
            mixins: Vec::new(),
            registry: None,
            fields: Value::Object(Map::new()),
        }
    }

    /// Read an extra field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        if !self.fields.is_object() {
            self.fields = Value::Object(Map::new());
        }
        if let Value::Object(fields) = &mut self.fields {
            fields.insert(key.into(), value);
        }
        self
    }

    /// Replace the validation override.
    pub fn with_validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&[Value]) -> Result<(), PublicationError> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// Wrap the producing function. The wrapper receives the previous `run`.
    ///
    /// ```ignore
    /// options.wrap_run(|inv, inner| {
    ///     inv.require_user()?;
    ///     inner(inv)
    /// })
    /// ```
    pub fn wrap_run<F>(mut self, wrapper: F) -> Self
    where
        F: Fn(&Invocation<'_>, &RunFn) -> Result<Produced, PublicationError>
            + Send
            + Sync
            + 'static,
    {
        let inner = Arc::clone(&self.run);
        self.run = Arc::new(move |inv: &Invocation<'_>| wrapper(inv, &inner));
        self
    }
}
