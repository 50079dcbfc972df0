//! Publication factory integration tests.

mod mixins;

#[cfg(feature = "json-schema")]
mod validation;
