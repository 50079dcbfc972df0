//! Per-publication specification.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::mixin::Mixin;
use crate::publication::{ErrorTransform, Invocation, Produced, PublicationError, RunFn};
use crate::registry::Registry;
use crate::validator::ValidateFn;

/// Everything needed to build one publication. Consumed by
/// [`PublicationFactory::create`](super::PublicationFactory::create).
///
/// ## Example
///
/// ```ignore
/// let spec = PublicationSpec::new("todos.inList", |inv| {
///     let params = inv.arg::<InListParams>(0)?;
///     Ok(Cursor::new("todos").selector(json!({ "listId": params.list_id })))
/// })
/// .schema(json!({ "type": "object", "required": ["listId"] }))
/// .mixin(mixin::builtin::logged_in());
/// ```
pub struct PublicationSpec {
    pub(crate) name: String,
    pub(crate) schema: Option<Value>,
    pub(crate) validate: Option<ValidateFn>,
    pub(crate) run: RunFn,
    pub(crate) mixins: Vec<Mixin>,
    pub(crate) registry: Option<Arc<dyn Registry>>,
    pub(crate) on_error: Option<ErrorTransform>,
    pub(crate) fields: Map<String, Value>,
}

impl PublicationSpec {
    /// Start a spec from a name and a producing function.
    ///
    /// `run` may return anything convertible into [`Produced`]: a
    /// [`Cursor`](crate::Cursor), a `Vec<Cursor>`, an `Option` of those,
    /// `()`, or a raw `serde_json::Value`.
    pub fn new<F, R>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<R, PublicationError> + Send + Sync + 'static,
        R: Into<Produced>,
    {
        let run: RunFn = Arc::new(move |inv: &Invocation<'_>| run(inv).map(Into::into));
        Self {
            name: name.into(),
            schema: None,
            validate: None,
            run,
            mixins: Vec::new(),
            registry: None,
            on_error: None,
            fields: Map::new(),
        }
    }

    /// Declare the argument schema, compiled by the factory's schema strategy.
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Validate arguments with a custom function instead of a schema.
    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&[Value]) -> Result<(), PublicationError> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// Append an endpoint-level mixin.
    pub fn mixin(mut self, mixin: Mixin) -> Self {
        self.mixins.push(mixin);
        self
    }

    pub fn mixins(mut self, mixins: impl IntoIterator<Item = Mixin>) -> Self {
        self.mixins.extend(mixins);
        self
    }

    /// Register into this registry instead of the factory default.
    pub fn registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Override the factory's error transform for this publication.
    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&PublicationError) -> Option<PublicationError> + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Attach an extra field for mixins to consume.
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
