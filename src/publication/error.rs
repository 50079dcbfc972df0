//! Call-time error types for publication handlers.

use std::error::Error;
use std::fmt;

/// Error raised while serving a single subscription call.
///
/// These never escape a [`PublicationHandler`](super::PublicationHandler):
/// the handler routes them through the error transform and delivers the
/// result to the subscription's `error` channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationError {
    /// The resolved validator rejected the call arguments.
    Validation(String),
    /// An argument could not be decoded into the requested type.
    Decode(String),
    /// The caller is not allowed to subscribe.
    Unauthorized(String),
    /// The producing function reported a failure.
    Failed(String),
    /// The producing function returned something that is not a cursor.
    UnsupportedResult(String),
    /// The producing function (or validator) panicked.
    Panicked(String),
    /// Client-safe error, usually built by an error transform.
    Client { code: String, reason: String },
}

impl PublicationError {
    /// Shorthand for a producing-function failure.
    pub fn failed(message: impl Into<String>) -> Self {
        PublicationError::Failed(message.into())
    }

    /// Build a client-facing error with an explicit code.
    pub fn client(code: impl Into<String>, reason: impl Into<String>) -> Self {
        PublicationError::Client {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code delivered to subscribers.
    pub fn code(&self) -> &str {
        match self {
            PublicationError::Validation(_) => "validation-error",
            PublicationError::Decode(_) => "decode-error",
            PublicationError::Unauthorized(_) => "not-authorized",
            PublicationError::Failed(_) => "publication-failed",
            PublicationError::UnsupportedResult(_) => "unsupported-result",
            PublicationError::Panicked(_) => "internal-error",
            PublicationError::Client { code, .. } => code,
        }
    }

    /// The bare message, without the code prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            PublicationError::Validation(msg)
            | PublicationError::Decode(msg)
            | PublicationError::Unauthorized(msg)
            | PublicationError::Failed(msg)
            | PublicationError::UnsupportedResult(msg)
            | PublicationError::Panicked(msg) => msg,
            PublicationError::Client { reason, .. } => reason,
        }
    }
}

impl fmt::Display for PublicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicationError::Validation(msg) => write!(f, "validation failed: {}", msg),
            PublicationError::Decode(msg) => write!(f, "decode failed: {}", msg),
            PublicationError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            PublicationError::Failed(msg) => write!(f, "publication failed: {}", msg),
            PublicationError::UnsupportedResult(kind) => {
                write!(f, "publication returned unsupported value: {}", kind)
            }
            PublicationError::Panicked(msg) => write!(f, "publication panicked: {}", msg),
            PublicationError::Client { code, reason } => write!(f, "{} [{}]", reason, code),
        }
    }
}

impl Error for PublicationError {}

impl From<serde_json::Error> for PublicationError {
    fn from(err: serde_json::Error) -> Self {
        PublicationError::Decode(err.to_string())
    }
}
