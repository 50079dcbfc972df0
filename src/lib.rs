//! validated_publication: build validated, named publication handlers for a
//! data-sync registry.
//!
//! ```text
//! FactoryConfig ──build──▶ PublicationFactory ──create(spec)──▶ PublicationHandler
//!   schema factory            mixins (endpoint, then defaults)      validate args
//!   default mixins            validator resolution                  run
//!   error transform           duplicate check + registration        adapt result
//!   registry                                                        contain failures
//! ```

mod error;
pub mod factory;
pub mod mixin;
pub mod publication;
pub mod registry;
pub mod validator;

pub use error::FactoryError;
pub use factory::{create_abstract_factory, FactoryConfig, PublicationFactory, PublicationSpec};
pub use mixin::{apply_mixins, Mixin, PublicationOptions};
pub use publication::{
    Cursor, ErrorTransform, Invocation, Produced, PublicationError, PublicationHandler, Published,
    RunFn, Subscription,
};
pub use registry::{
    InMemoryRegistry, InMemorySubscription, Registry, RegistryError, SubscribeRequest,
};
#[cfg(feature = "json-schema")]
pub use validator::{JsonSchema, JsonSchemaFactory};
pub use validator::{Schema, SchemaFactory, ValidateFn, Validator};
