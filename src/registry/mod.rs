//! Registry: the publish/subscribe host publications are registered into.
//!
//! The hosting framework owns the real registry; [`Registry`] is the seam this
//! crate talks to. [`InMemoryRegistry`] is included for tests and
//! single-process hosts.
//!
//! ```text
//! ┌────────────────────┐  publish(name, handler)   ┌─────────────────────┐
//! │ PublicationFactory │ ─────────────────────────▶│      Registry       │
//! └────────────────────┘  is_published(name)       │  name → handler     │
//!                                                  └─────────────────────┘
//!                                                            │ subscribe
//!                                                            ▼
//!                                                  handler.call(sub, args)
//! ```

mod error;
mod in_memory;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::publication::PublicationHandler;

pub use error::RegistryError;
pub use in_memory::{InMemoryRegistry, InMemorySubscription};

/// The hosting publish/subscribe registry.
pub trait Registry: Send + Sync {
    /// Register `handler` under `name`.
    fn publish(&self, name: &str, handler: Arc<PublicationHandler>) -> Result<(), RegistryError>;

    /// Whether a handler is registered under `name`.
    fn is_published(&self, name: &str) -> bool;

    /// Capability check: can this registry take new publications?
    fn is_accepting(&self) -> bool {
        true
    }
}

/// An inbound subscription request.
///
/// Matches the sync protocol's `sub` message:
/// ```json
/// { "msg": "sub", "id": "sub-1", "name": "todos.inList", "params": [{ "listId": "l1" }] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Subscription id chosen by the client.
    pub id: String,
    /// Publication name.
    pub name: String,
    /// Positional call arguments.
    #[serde(default)]
    pub params: Vec<Value>,
}
