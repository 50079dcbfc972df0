//! Stock mixins.

use serde_json::{Map, Value};
use tracing::{debug, debug_span};

use super::{Mixin, PublicationOptions};
use crate::publication::Produced;

/// Reject subscriptions that carry no user id, before `run` executes.
pub fn logged_in() -> Mixin {
    Mixin::named("logged_in", |options: PublicationOptions| {
        Some(options.wrap_run(|inv, inner| {
            inv.require_user()?;
            inner(inv)
        }))
    })
}

/// Trace every call of the producing function.
pub fn traced() -> Mixin {
    Mixin::named("traced", |options: PublicationOptions| {
        Some(options.wrap_run(|inv, inner| {
            let span = debug_span!("publication", name = %inv.publication());
            let _entered = span.enter();
            let result = inner(inv);
            match &result {
                Ok(Produced::Empty) => debug!("produced nothing"),
                Ok(Produced::Data(published)) => {
                    debug!(cursors = published.cursors().len(), "produced cursors")
                }
                Ok(Produced::Unsupported(_)) => debug!("produced an unsupported value"),
                Err(err) => debug!(error = %err, "run failed"),
            }
            result
        }))
    })
}

/// Fill in extra fields the publication spec left out.
pub fn defaults(defaults: Map<String, Value>) -> Mixin {
    Mixin::named("defaults", move |options: PublicationOptions| {
        let mut options = options;
        for (key, value) in &defaults {
            if options.field(key).is_none() {
                options = options.with_field(key.clone(), value.clone());
            }
        }
        Some(options)
    })
}
