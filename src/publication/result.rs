//! Result adaptation for producing functions.
//!
//! A producing function may hand back a cursor, several cursors, nothing at
//! all, or some value the registry cannot deliver. [`Produced`] makes that
//! explicit; the `From` impls below are the adapter the handler applies to
//! whatever `run` returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::PublicationError;

/// A live-query description the registry knows how to observe and deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    /// Collection the query runs against.
    pub collection: String,
    /// Query selector (`{}` matches everything).
    pub selector: Value,
    /// Optional field projection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
}

impl Cursor {
    /// A cursor over the whole collection.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            selector: Value::Object(Default::default()),
            fields: None,
        }
    }

    /// Restrict the cursor with a selector.
    pub fn selector(mut self, selector: Value) -> Self {
        self.selector = selector;
        self
    }

    /// Project the delivered fields.
    pub fn fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// The registry's native publication result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Published {
    Cursor(Cursor),
    Cursors(Vec<Cursor>),
}

impl Published {
    /// The native empty result: no cursors, nothing to observe.
    pub fn empty() -> Self {
        Published::Cursors(Vec::new())
    }

    /// All cursors carried by this result.
    pub fn cursors(&self) -> &[Cursor] {
        match self {
            Published::Cursor(cursor) => std::slice::from_ref(cursor),
            Published::Cursors(cursors) => cursors,
        }
    }
}

/// What a producing function handed back, before delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum Produced {
    /// Nothing to deliver; the subscription is marked ready.
    Empty,
    /// A native result, returned to the registry unchanged.
    Data(Published),
    /// Not deliverable. Treated as a contract violation.
    Unsupported(Value),
}

impl Produced {
    /// Resolve into a deliverable value or a contained failure.
    pub(crate) fn into_delivery(self) -> Result<Option<Published>, PublicationError> {
        match self {
            Produced::Empty => Ok(None),
            Produced::Data(published) => Ok(Some(published)),
            Produced::Unsupported(value) => Err(PublicationError::UnsupportedResult(
                value_kind(&value).to_string(),
            )),
        }
    }
}

impl From<()> for Produced {
    fn from(_: ()) -> Self {
        Produced::Empty
    }
}

impl From<Published> for Produced {
    fn from(published: Published) -> Self {
        Produced::Data(published)
    }
}

impl From<Cursor> for Produced {
    fn from(cursor: Cursor) -> Self {
        Produced::Data(Published::Cursor(cursor))
    }
}

impl From<Vec<Cursor>> for Produced {
    fn from(cursors: Vec<Cursor>) -> Self {
        Produced::Data(Published::Cursors(cursors))
    }
}

impl From<Value> for Produced {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Produced::Empty,
            other => Produced::Unsupported(other),
        }
    }
}

impl<T: Into<Produced>> From<Option<T>> for Produced {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Produced::Empty,
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
