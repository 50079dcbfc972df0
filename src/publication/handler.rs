//! The runtime publication handler.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use serde_json::Value;
use tracing::{error, warn};

use super::error::PublicationError;
use super::invocation::{Invocation, Subscription};
use super::result::{Produced, Published};
use crate::registry::Registry;
use crate::validator::Validator;

/// A producing function, already adapted to return [`Produced`].
pub type RunFn = Arc<dyn Fn(&Invocation<'_>) -> Result<Produced, PublicationError> + Send + Sync>;

/// Maps a call failure to a replacement. `None` keeps the original.
pub type ErrorTransform =
    Arc<dyn Fn(&PublicationError) -> Option<PublicationError> + Send + Sync>;

/// A validated publication, registered by name.
///
/// Immutable once built. Every call validates the arguments, runs the
/// producing function and adapts its result; failures never leave
/// [`call`](Self::call), they are delivered through the subscription.
pub struct PublicationHandler {
    name: String,
    validator: Validator,
    run: RunFn,
    on_error: Option<ErrorTransform>,
    registry: Weak<dyn Registry>,
}

impl fmt::Debug for PublicationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicationHandler")
            .field("name", &self.name)
            .field("validator", &self.validator)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl PublicationHandler {
    pub(crate) fn new(
        name: String,
        validator: Validator,
        run: RunFn,
        on_error: Option<ErrorTransform>,
        registry: Weak<dyn Registry>,
    ) -> Self {
        Self {
            name,
            validator,
            run,
            on_error,
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Whether the target registry still lists this publication.
    pub fn is_registered(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.is_published(&self.name))
            .unwrap_or(false)
    }

    /// Serve one subscription call.
    ///
    /// Returns the data to deliver. When the producing function yields
    /// nothing, `subscription.ready()` is signalled instead; when anything
    /// fails, the (transformed) error goes to `subscription.error(..)`.
    pub fn call(&self, subscription: &dyn Subscription, args: &[Value]) -> Option<Published> {
        let invocation = Invocation::new(&self.name, args, subscription);

        match self.invoke(&invocation) {
            Ok(Some(published)) => Some(published),
            Ok(None) => {
                subscription.ready();
                None
            }
            Err(err) => {
                warn!(publication = %self.name, code = err.code(), error = %err, "publication call failed");
                subscription.error(self.transform(err));
                None
            }
        }
    }

    fn invoke(&self, invocation: &Invocation<'_>) -> Result<Option<Published>, PublicationError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(
            || -> Result<Option<Published>, PublicationError> {
                self.validator.validate(invocation.args())?;
                (self.run)(invocation)?.into_delivery()
            },
        ));

        outcome.unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!(publication = %self.name, panic = %message, "publication panicked");
            Err(PublicationError::Panicked(message))
        })
    }

    fn transform(&self, err: PublicationError) -> PublicationError {
        let Some(on_error) = &self.on_error else {
            return err;
        };
        match panic::catch_unwind(AssertUnwindSafe(|| on_error(&err))) {
            Ok(Some(replacement)) => replacement,
            Ok(None) => err,
            Err(payload) => {
                error!(
                    publication = %self.name,
                    panic = %panic_message(payload.as_ref()),
                    "error transform panicked; delivering original error"
                );
                err
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
