//! Publication factories.
//!
//! Two levels: a [`FactoryConfig`] holds the defaults (schema strategy,
//! mixins, error transform, registry) and builds a [`PublicationFactory`];
//! the publication factory turns each [`PublicationSpec`] into a registered
//! [`PublicationHandler`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use validated_publication::{FactoryConfig, InMemoryRegistry, JsonSchemaFactory, PublicationSpec, Cursor};
//! use serde_json::json;
//!
//! let registry = Arc::new(InMemoryRegistry::new());
//! let factory = FactoryConfig::new()
//!     .schema_factory(JsonSchemaFactory::new())
//!     .registry(registry.clone())
//!     .build()?;
//!
//! factory.create(
//!     PublicationSpec::new("lists.public", |_inv| Ok(Cursor::new("lists")))
//!         .schema(json!({ "type": "null" })),
//! )?;
//! ```
//!
//! ## Publication Convention
//!
//! Publication modules can follow this layout and be registered in bulk
//! with [`register_publications!`](crate::register_publications):
//!
//! ```ignore
//! // src/publications/lists_public.rs
//!
//! pub const NAME: &str = "lists.public";
//!
//! pub fn schema() -> Option<Value> {
//!     Some(json!({ "type": "null" }))
//! }
//!
//! pub fn run(inv: &Invocation<'_>) -> Result<Cursor, PublicationError> {
//!     Ok(Cursor::new("lists").selector(json!({ "userId": null })))
//! }
//! ```

mod config;
mod spec;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::FactoryError;
use crate::mixin::{apply_mixins, Mixin, PublicationOptions};
use crate::publication::PublicationHandler;
use crate::registry::Registry;
use crate::validator::Validator;

pub use config::{create_abstract_factory, FactoryConfig};
pub use spec::PublicationSpec;

/// Builds validated publications from specs, with shared defaults.
///
/// Construct publications sequentially (typically at startup): the
/// duplicate check and the registration are not atomic.
pub struct PublicationFactory {
    config: FactoryConfig,
}

impl PublicationFactory {
    /// Build, register and return the handler for `spec`.
    ///
    /// Fails without registering anything when the spec is malformed, the
    /// name is taken, a mixin breaks its contract, or the schema cannot be
    /// compiled.
    pub fn create(&self, spec: PublicationSpec) -> Result<Arc<PublicationHandler>, FactoryError> {
        let PublicationSpec {
            name,
            schema,
            validate,
            run,
            mixins,
            registry,
            on_error,
            fields,
        } = spec;

        if name.trim().is_empty() {
            return Err(FactoryError::InvalidConfiguration(
                "publication name must be a non-empty string".into(),
            ));
        }
        if let Some(registry) = &registry {
            ensure_accepting(registry.as_ref(), &name)?;
        }

        // Fail fast on the declared name before doing any other work.
        let declared_registry = registry.as_ref().or(self.config.registry.as_ref());
        if let Some(target) = declared_registry {
            if target.is_published(&name) {
                return Err(FactoryError::DuplicatePublication(name));
            }
        }

        if self.config.schema_factory.is_some() && validate.is_none() && schema.is_none() {
            return Err(FactoryError::InvalidConfiguration(format!(
                "publication \"{}\" must declare a schema or a validate function",
                name
            )));
        }

        let ordered: Vec<Mixin> = mixins
            .iter()
            .chain(self.config.mixins.iter())
            .cloned()
            .collect();
        let options = PublicationOptions {
            name: name.clone(),
            validate,
            run,
            mixins: mixins
                .iter()
                .map(|mixin| mixin.label().map(str::to_string))
                .collect(),
            registry,
            fields: Value::Object(fields),
        };
        let PublicationOptions {
            name,
            validate,
            run,
            registry,
            ..
        } = apply_mixins(options, &ordered, &name)?;

        if name.trim().is_empty() {
            return Err(FactoryError::InvalidConfiguration(
                "mixins left the publication without a name".into(),
            ));
        }

        let registry = self.resolve_registry(registry, &name)?;
        if registry.is_published(&name) {
            return Err(FactoryError::DuplicatePublication(name));
        }

        let validator = Validator::resolve(
            &name,
            validate,
            schema.as_ref(),
            self.config.schema_factory.as_deref(),
        )?;
        let on_error = on_error.or_else(|| self.config.on_error.clone());
        debug!(publication = %name, validator = ?validator, custom_on_error = on_error.is_some(), "building handler");

        let handler = Arc::new(PublicationHandler::new(
            name.clone(),
            validator,
            run,
            on_error,
            Arc::downgrade(&registry),
        ));

        registry.publish(&name, Arc::clone(&handler))?;
        if !registry.is_published(&name) {
            return Err(FactoryError::RegistrationFailed(name));
        }

        info!(publication = %name, "registered publication");
        Ok(handler)
    }

    /// The endpoint override if any, otherwise the factory default.
    fn resolve_registry(
        &self,
        registry: Option<Arc<dyn Registry>>,
        name: &str,
    ) -> Result<Arc<dyn Registry>, FactoryError> {
        match registry {
            Some(registry) => {
                ensure_accepting(registry.as_ref(), name)?;
                Ok(registry)
            }
            None => self.config.registry.clone().ok_or_else(|| {
                FactoryError::InvalidConfiguration(format!(
                    "no registry configured for publication \"{}\"",
                    name
                ))
            }),
        }
    }

    /// Default mixins, in the order they run after endpoint mixins.
    pub fn default_mixins(&self) -> &[Mixin] {
        &self.config.mixins
    }
}

fn ensure_accepting(registry: &dyn Registry, name: &str) -> Result<(), FactoryError> {
    if registry.is_accepting() {
        Ok(())
    } else {
        Err(FactoryError::InvalidConfiguration(format!(
            "registry for publication \"{}\" is not accepting publications",
            name
        )))
    }
}

/// Register publication modules that follow the publication convention.
///
/// Each module must export:
/// - `NAME: &str`: the publication name
/// - `schema() -> Option<Value>`: the argument schema, if any
/// - `run(inv) -> Result<R, PublicationError>`: the producing function
///
/// Evaluates to `Result<Vec<Arc<PublicationHandler>>, FactoryError>` and
/// stops at the first failure.
///
/// # Example
/// ```ignore
/// let handlers = validated_publication::register_publications!(
///     factory,
///     publications::lists_public,
///     publications::todos_in_list,
/// )?;
/// ```
#[macro_export]
macro_rules! register_publications {
    ($factory:expr, $( $($seg:ident)::+ ),+ $(,)?) => {{
        let factory: &$crate::PublicationFactory = &$factory;
        (|| -> ::std::result::Result<
            ::std::vec::Vec<::std::sync::Arc<$crate::PublicationHandler>>,
            $crate::FactoryError,
        > {
            let mut handlers = ::std::vec::Vec::new();
            $(
                let mut spec = $crate::PublicationSpec::new($($seg)::+::NAME, $($seg)::+::run);
                if let ::std::option::Option::Some(schema) = $($seg)::+::schema() {
                    spec = spec.schema(schema);
                }
                handlers.push(factory.create(spec)?);
            )+
            ::std::result::Result::Ok(handlers)
        })()
    }};
}
