use std::error::Error;
use std::fmt;

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No publication registered under this name.
    UnknownPublication(String),
    /// The registry no longer accepts new publications.
    NotAccepting(String),
    /// The handler table lock was poisoned.
    LockPoisoned(&'static str),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownPublication(name) => write!(f, "unknown publication: {}", name),
            RegistryError::NotAccepting(name) => {
                write!(f, "registry is sealed, cannot publish {}", name)
            }
            RegistryError::LockPoisoned(operation) => {
                write!(f, "registry lock poisoned during {}", operation)
            }
        }
    }
}

impl Error for RegistryError {}
