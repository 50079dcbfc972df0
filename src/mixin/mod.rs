//! Mixins: construction-time transformations over publication options.
//!
//! A mixin takes the current [`PublicationOptions`] and returns the next
//! ones. The factory folds endpoint-level mixins first, then the abstract
//! factory's defaults; every mixin runs. Returning `None`, or leaving
//! `fields` as anything but a JSON object, aborts construction with
//! [`FactoryError::MixinContractViolation`].
//!
//! ## Example
//!
//! ```ignore
//! let paginated = Mixin::named("paginated", |options| {
//!     let limit = options.field("limit").cloned().unwrap_or(json!(20));
//!     Some(options.with_field("limit", limit))
//! });
//! ```

pub mod builtin;
mod options;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::FactoryError;

pub use options::PublicationOptions;

type MixinFn = dyn Fn(PublicationOptions) -> Option<PublicationOptions> + Send + Sync;

/// A labelled options transformation.
#[derive(Clone)]
pub struct Mixin {
    label: Option<String>,
    apply: Arc<MixinFn>,
}

impl fmt::Debug for Mixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixin").field("label", &self.label).finish()
    }
}

impl Mixin {
    /// An anonymous mixin.
    pub fn new<F>(apply: F) -> Self
    where
        F: Fn(PublicationOptions) -> Option<PublicationOptions> + Send + Sync + 'static,
    {
        Self {
            label: None,
            apply: Arc::new(apply),
        }
    }

    /// A mixin whose label shows up in construction errors.
    pub fn named<F>(label: impl Into<String>, apply: F) -> Self
    where
        F: Fn(PublicationOptions) -> Option<PublicationOptions> + Send + Sync + 'static,
    {
        Self {
            label: Some(label.into()),
            apply: Arc::new(apply),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn apply(&self, options: PublicationOptions) -> Option<PublicationOptions> {
        (self.apply)(options)
    }
}

/// Fold `mixins` over `options`, left to right.
pub fn apply_mixins(
    options: PublicationOptions,
    mixins: &[Mixin],
    publication: &str,
) -> Result<PublicationOptions, FactoryError> {
    mixins.iter().try_fold(options, |options, mixin| {
        let violation = || FactoryError::MixinContractViolation {
            mixin: mixin.label.clone(),
            publication: publication.to_string(),
        };
        let next = mixin.apply(options).ok_or_else(violation)?;
        if !next.fields.is_object() {
            return Err(violation());
        }
        debug!(
            publication = %publication,
            mixin = mixin.label().unwrap_or("anonymous"),
            "applied mixin"
        );
        Ok(next)
    })
}
