//! Construction-time errors.

use std::error::Error;
use std::fmt;

use crate::registry::RegistryError;

/// Raised while building a publication. A publication that fails with any
/// of these is never registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// The factory or publication setup is malformed.
    InvalidConfiguration(String),
    /// A publication with this name is already registered.
    DuplicatePublication(String),
    /// A mixin returned something other than a field mapping.
    MixinContractViolation {
        mixin: Option<String>,
        publication: String,
    },
    /// The schema factory could not compile the declared schema.
    SchemaConstruction { publication: String, reason: String },
    /// Publishing succeeded but the registry does not list the handler.
    RegistrationFailed(String),
    /// The registry rejected the publish call.
    Registry(RegistryError),
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            FactoryError::DuplicatePublication(name) => {
                write!(f, "cannot define publication \"{}\": already registered", name)
            }
            FactoryError::MixinContractViolation { mixin, publication } => write!(
                f,
                "{} did not return an options mapping while building publication \"{}\"",
                mixin
                    .as_deref()
                    .map(|label| format!("mixin \"{}\"", label))
                    .unwrap_or_else(|| "a mixin".to_string()),
                publication
            ),
            FactoryError::SchemaConstruction {
                publication,
                reason,
            } => write!(
                f,
                "schema for publication \"{}\" could not be built: {}",
                publication, reason
            ),
            FactoryError::RegistrationFailed(name) => write!(
                f,
                "publication \"{}\" was published but is missing from the registry",
                name
            ),
            FactoryError::Registry(e) => write!(f, "registry error: {}", e),
        }
    }
}

impl Error for FactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FactoryError::Registry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for FactoryError {
    fn from(err: RegistryError) -> Self {
        FactoryError::Registry(err)
    }
}
