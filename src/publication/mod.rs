//! Publication handlers: the runtime side of a validated publication.
//!
//! A [`PublicationHandler`] is what the registry invokes for each
//! subscription. It runs three steps per call:
//!
//! 1. validate the raw arguments with the resolved [`Validator`](crate::Validator);
//! 2. run the producing function with an [`Invocation`];
//! 3. adapt the returned value through [`Produced`].
//!
//! Data is handed back to the registry, "nothing" marks the subscription
//! ready, and every failure (including panics) is passed through the error
//! transform and delivered with [`Subscription::error`].
//!
//! ## Example
//!
//! ```ignore
//! let sub = InMemorySubscription::for_user("u1");
//! match handler.call(&sub, &[json!({ "listId": "l1" })]) {
//!     Some(published) => deliver(published),
//!     None => assert!(sub.is_ready() || sub.last_error().is_some()),
//! }
//! ```

mod error;
mod handler;
mod invocation;
mod result;

pub use error::PublicationError;
pub use handler::{ErrorTransform, PublicationHandler, RunFn};
pub use invocation::{Invocation, Subscription};
pub use result::{Cursor, Produced, Published};
