//! Per-call context passed to producing functions.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::PublicationError;

/// The call context supplied by the hosting registry for one subscription.
///
/// The handler signals "ready, nothing more to send" through `ready` and
/// delivers contained failures through `error`.
pub trait Subscription {
    /// Mark the subscription as fulfilled without data.
    fn ready(&self);

    /// Deliver a failure to the subscribing client.
    fn error(&self, error: PublicationError);

    /// Id of the logged-in user, if any.
    fn user_id(&self) -> Option<&str> {
        None
    }
}

/// What a producing function sees while it runs.
///
/// ## Example
///
/// ```ignore
/// fn run(inv: &Invocation<'_>) -> Result<Cursor, PublicationError> {
///     let params = inv.arg::<ListParams>(0)?;
///     Ok(Cursor::new("todos").selector(json!({ "listId": params.list_id })))
/// }
/// ```
pub struct Invocation<'a> {
    publication: &'a str,
    args: &'a [Value],
    subscription: &'a dyn Subscription,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        publication: &'a str,
        args: &'a [Value],
        subscription: &'a dyn Subscription,
    ) -> Self {
        Self {
            publication,
            args,
            subscription,
        }
    }

    /// Decode the argument at `index` into a typed value.
    ///
    /// A missing argument decodes from `null`, so `Option<T>` works for
    /// optional parameters.
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> Result<T, PublicationError> {
        let raw = self.args.get(index).cloned().unwrap_or(Value::Null);
        serde_json::from_value(raw).map_err(|e| PublicationError::Decode(e.to_string()))
    }

    /// Raw call arguments.
    pub fn args(&self) -> &[Value] {
        self.args
    }

    /// Name of the publication being served.
    pub fn publication(&self) -> &str {
        self.publication
    }

    /// The underlying subscription.
    pub fn subscription(&self) -> &dyn Subscription {
        self.subscription
    }

    pub fn user_id(&self) -> Option<&str> {
        self.subscription.user_id()
    }

    /// The user id, or `Unauthorized` when nobody is logged in.
    pub fn require_user(&self) -> Result<&str, PublicationError> {
        self.user_id()
            .ok_or_else(|| PublicationError::Unauthorized("login required".into()))
    }
}
