//! Abstract factory configuration.

use std::sync::Arc;

use tracing::debug;

use super::PublicationFactory;
use crate::error::FactoryError;
use crate::mixin::Mixin;
use crate::publication::{ErrorTransform, PublicationError};
use crate::registry::Registry;
use crate::validator::SchemaFactory;

/// Defaults shared by every publication a factory builds.
///
/// ## Example
///
/// ```ignore
/// let factory = FactoryConfig::new()
///     .schema_factory(JsonSchemaFactory::new())
///     .mixin(mixin::builtin::traced())
///     .on_error(|err| match err {
///         PublicationError::Failed(_) => Some(PublicationError::client("server-error", "try again later")),
///         _ => None,
///     })
///     .registry(registry.clone())
///     .build()?;
/// ```
#[derive(Clone, Default)]
pub struct FactoryConfig {
    pub(crate) schema_factory: Option<Arc<dyn SchemaFactory>>,
    pub(crate) mixins: Vec<Mixin>,
    pub(crate) on_error: Option<ErrorTransform>,
    pub(crate) registry: Option<Arc<dyn Registry>>,
}

impl FactoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy used to compile declared schemas. When set, every
    /// publication without a `validate` override must declare a schema.
    pub fn schema_factory(mut self, factory: impl SchemaFactory + 'static) -> Self {
        self.schema_factory = Some(Arc::new(factory));
        self
    }

    /// Append a default mixin. Defaults run after endpoint mixins.
    pub fn mixin(mut self, mixin: Mixin) -> Self {
        self.mixins.push(mixin);
        self
    }

    pub fn mixins(mut self, mixins: impl IntoIterator<Item = Mixin>) -> Self {
        self.mixins.extend(mixins);
        self
    }

    /// Default error transform. Returning `None` delivers the original error.
    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&PublicationError) -> Option<PublicationError> + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Default target registry.
    pub fn registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Shorthand for [`create_abstract_factory`].
    pub fn build(self) -> Result<PublicationFactory, FactoryError> {
        create_abstract_factory(self)
    }
}

/// Check the configuration and produce a publication factory.
pub fn create_abstract_factory(config: FactoryConfig) -> Result<PublicationFactory, FactoryError> {
    if let Some(registry) = &config.registry {
        if !registry.is_accepting() {
            return Err(FactoryError::InvalidConfiguration(
                "default registry is not accepting publications".into(),
            ));
        }
    }
    debug!(
        default_mixins = config.mixins.len(),
        schema_factory = config.schema_factory.is_some(),
        "created publication factory"
    );
    Ok(PublicationFactory { config })
}
