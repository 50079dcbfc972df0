//! In-memory registry and subscription for testing and single-process hosts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;
use tracing::debug;

use super::{Registry, RegistryError, SubscribeRequest};
use crate::publication::{PublicationError, PublicationHandler, Published, Subscription};

/// Thread-safe publication table.
///
/// ## Example
///
/// ```ignore
/// let registry = Arc::new(InMemoryRegistry::new());
/// let factory = FactoryConfig::new().registry(registry.clone()).build()?;
/// factory.create(PublicationSpec::new("lists.public", |_| Ok(Cursor::new("lists"))))?;
///
/// let sub = InMemorySubscription::new();
/// let published = registry.subscribe("lists.public", &sub, &[])?;
/// ```
#[derive(Default)]
pub struct InMemoryRegistry {
    handlers: RwLock<HashMap<String, Arc<PublicationHandler>>>,
    sealed: AtomicBool,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a registered handler.
    pub fn handler(&self, name: &str) -> Option<Arc<PublicationHandler>> {
        self.handlers.read().ok()?.get(name).cloned()
    }

    /// List registered publication names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.handlers.read() {
            Ok(handlers) => handlers.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    /// Stop accepting new publications (typically once startup is done).
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::SeqCst);
    }

    /// Serve one subscription call against the named publication.
    ///
    /// Returns the delivered data, if any. Ready and error signals go to
    /// `subscription`.
    pub fn subscribe(
        &self,
        name: &str,
        subscription: &dyn Subscription,
        args: &[Value],
    ) -> Result<Option<Published>, RegistryError> {
        let handler = self
            .handler(name)
            .ok_or_else(|| RegistryError::UnknownPublication(name.to_string()))?;
        debug!(publication = %name, args = args.len(), "dispatching subscription");
        Ok(handler.call(subscription, args))
    }

    /// Serve a decoded `sub` message.
    pub fn subscribe_request(
        &self,
        request: &SubscribeRequest,
        subscription: &dyn Subscription,
    ) -> Result<Option<Published>, RegistryError> {
        self.subscribe(&request.name, subscription, &request.params)
    }
}

impl Registry for InMemoryRegistry {
    fn publish(&self, name: &str, handler: Arc<PublicationHandler>) -> Result<(), RegistryError> {
        if !self.is_accepting() {
            return Err(RegistryError::NotAccepting(name.to_string()));
        }
        self.handlers
            .write()
            .map_err(|_| RegistryError::LockPoisoned("publish"))?
            .insert(name.to_string(), handler);
        Ok(())
    }

    fn is_published(&self, name: &str) -> bool {
        self.handlers
            .read()
            .map(|handlers| handlers.contains_key(name))
            .unwrap_or(false)
    }

    fn is_accepting(&self) -> bool {
        !self.sealed.load(Ordering::SeqCst)
    }
}

/// Subscription double that records every signal it receives.
#[derive(Default)]
pub struct InMemorySubscription {
    user_id: Option<String>,
    ready: AtomicUsize,
    errors: Mutex<Vec<PublicationError>>,
}

impl InMemorySubscription {
    /// An anonymous subscription.
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscription made by a logged-in user.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Number of times `ready` was signalled.
    pub fn ready_count(&self) -> usize {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn is_ready(&self) -> bool {
        self.ready_count() > 0
    }

    /// Errors delivered so far, oldest first.
    pub fn errors(&self) -> Vec<PublicationError> {
        self.errors
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_default()
    }

    /// The most recently delivered error.
    pub fn last_error(&self) -> Option<PublicationError> {
        self.errors().pop()
    }
}

impl Subscription for InMemorySubscription {
    fn ready(&self) {
        self.ready.fetch_add(1, Ordering::SeqCst);
    }

    fn error(&self, error: PublicationError) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(error);
        }
    }

    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}
