//! Records are the items listed by the directory.

use serde::Serialize;

use crate::{Error, Map, Value};

/// The name of the field holding a record's unique identifier.
pub const ID_FIELD: &str = "id";

/// A single listable item, such as a hackathon event or a developer profile.
///
/// A record is a map of named fields plus a unique ID, which is also kept
/// under the `id` field so that it can be searched, sorted and serialized
/// like any other field.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: Value,
    fields: Map<String, Value>,
}

impl Record {
    /// Constructor. Any `id` entry in `fields` is replaced by `id`.
    pub fn new<V: Into<Value>>(id: V, mut fields: Map<String, Value>) -> Self {
        let id = id.into();
        fields.insert(ID_FIELD.to_string(), id.clone());
        Self { id, fields }
    }

    /// Builder-style helper to set a field.
    pub fn with<K, V>(mut self, field: K, value: V) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let field = field.as_ref();
        let value = value.into();
        if field == ID_FIELD {
            self.id = value.clone();
        }
        self.fields.insert(field.to_string(), value);
        self
    }

    /// Converts a map value into a record. The map must carry an `id` field.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Map(fields) => {
                let id = fields.get(ID_FIELD).cloned().ok_or(Error::MissingRecordId)?;
                Ok(Self { id, fields })
            }
            other => Err(Error::RecordNotAMap(other.get_type())),
        }
    }

    pub fn id(&self) -> &Value {
        &self.id
    }

    /// Get a reference to the value of the given field, if present.
    pub fn get<K: AsRef<str>>(&self, field: K) -> Option<&Value> {
        self.fields.get(field.as_ref())
    }

    /// Convenience accessor for string fields.
    pub fn get_str<K: AsRef<str>>(&self, field: K) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.fields.serialize(serializer)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Map(r.fields)
    }
}
